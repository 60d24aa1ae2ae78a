//! Text formatting for task and log lines.
//!
//! Planner revisions disagreed on truncation caps (33 to 62 characters) and on the
//! order of the work/importance markers, so those knobs live in a [`FormatProfile`]
//! rather than being hard-coded.

use crate::constants::{
    DEFAULT_LOG_LINE_CAP, DEFAULT_MAX_LOGS, DEFAULT_MAX_TASKS, DEFAULT_TAG_COLOR,
    DEFAULT_TASK_TITLE_CAP, ELLIPSIS, HIGHLIGHT_GLYPH, IMPORTANT_MARKER, LOG_TIME_FORMAT,
    TAG_HIGHLIGHT, TAG_MAIN_TASK, TAG_WORK, TASK_TIME_FORMAT, WORK_MARKER,
};
use crate::data::Task;
use crate::errors::AppError;
use chrono::{DateTime, FixedOffset};
use std::str::FromStr;

/// Order in which the work and importance markers are prefixed to a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerOrder {
    /// `^!title`
    #[default]
    WorkFirst,
    /// `!^title`
    ImportantFirst,
}

impl FromStr for MarkerOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "^!" => Ok(MarkerOrder::WorkFirst),
            "!^" => Ok(MarkerOrder::ImportantFirst),
            other => Err(AppError::Config(format!(
                "Marker order must be '^!' or '!^', got '{}'",
                other
            ))),
        }
    }
}

/// Formatting knobs for the task and log sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatProfile {
    /// Longest task title body before the ellipsis.
    pub task_title_cap: usize,
    /// Longest log line before the ellipsis.
    pub log_line_cap: usize,
    pub max_tasks: usize,
    pub max_logs: usize,
    pub marker_order: MarkerOrder,
}

impl Default for FormatProfile {
    fn default() -> Self {
        FormatProfile {
            task_title_cap: DEFAULT_TASK_TITLE_CAP,
            log_line_cap: DEFAULT_LOG_LINE_CAP,
            max_tasks: DEFAULT_MAX_TASKS,
            max_logs: DEFAULT_MAX_LOGS,
            marker_order: MarkerOrder::default(),
        }
    }
}

/// Shortens `text` to `cap` characters followed by an ellipsis.
///
/// Text whose length reaches the cap is cut; with `trim` set, whitespace left at the
/// cut is dropped before the ellipsis. Lengths are counted in characters.
///
/// # Examples
///
/// ```
/// use bitacora::data::format::truncate;
///
/// assert_eq!(truncate("Short title", 54, true), "Short title");
/// assert_eq!(truncate("abcdef ghij", 7, true), "abcdef...");
/// ```
pub fn truncate(text: &str, cap: usize, trim: bool) -> String {
    if text.chars().count() < cap {
        return text.to_string();
    }

    let head: String = text.chars().take(cap).collect();
    let head = if trim { head.trim() } else { head.as_str() };
    format!("{}{}", head, ELLIPSIS)
}

/// Builds the marker prefix for a task: `^` for work, `!` for main tasks.
pub fn task_markers(task: &Task, order: MarkerOrder) -> String {
    let work = task.has_tag(TAG_WORK).then_some(WORK_MARKER);
    let important = task.has_tag(TAG_MAIN_TASK).then_some(IMPORTANT_MARKER);

    let (first, second) = match order {
        MarkerOrder::WorkFirst => (work, important),
        MarkerOrder::ImportantFirst => (important, work),
    };
    first.into_iter().chain(second).collect()
}

/// Formats a task title for the task sheet: trimmed, truncated, then prefixed with markers.
pub fn format_task_title(task: &Task, profile: &FormatProfile) -> String {
    let title = truncate(task.title.trim(), profile.task_title_cap, true);
    format!("{}{}", task_markers(task, profile.marker_order), title)
}

/// Color for a task's swatch.
///
/// Tags are checked in order and the first one with an entry wins.
pub fn tag_color(tags: &[String]) -> &'static str {
    tags.iter()
        .find_map(|tag| color_for_tag(tag))
        .unwrap_or(DEFAULT_TAG_COLOR)
}

fn color_for_tag(tag: &str) -> Option<&'static str> {
    let color = match tag {
        "task-active" => "#d6e9ce",
        "work" => "#99cdf6",
        "habit" => "#ffeaa9",
        "routine" | "task-routine" => "#f7dd8b",
        "scrum-ceremony" => "#7b96c5",
        "task-pasive" => "#addba5",
        "event" => "#c595f4",
        "reminder" => "#ccd2e0",
        _ => return None,
    };
    Some(color)
}

/// Due time as shown on the task sheet ("09:30am").
pub fn format_task_time(due: Option<&DateTime<FixedOffset>>) -> String {
    due.map(|due| due.format(TASK_TIME_FORMAT).to_string().to_lowercase())
        .unwrap_or_default()
}

/// Formats one log line: "<time> <title>", the highlight glyph when tagged, then the cap.
pub fn format_log_line(log: &Task, cap: usize) -> String {
    let time = log
        .created_date
        .format(LOG_TIME_FORMAT)
        .to_string()
        .to_lowercase();
    let mut line = format!("{} {}", time, log.title).trim().to_string();

    if log.has_tag(TAG_HIGHLIGHT) {
        line = format!("{}{}", HIGHLIGHT_GLYPH, line);
    }

    truncate(&line, cap, false)
}
