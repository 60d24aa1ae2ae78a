//! Fetching and shaping everything a page displays.
//!
//! [`DataProcessor`] sits between the remote services and the page assembler: it asks
//! the services for raw snapshots, filters them to the requested day and turns them
//! into display-ready text. Service errors are propagated untouched.

use crate::ai::{recap_summary_prompt, ChatModel};
use crate::constants::{
    DATE_FORMAT_ISO, HIDDEN_TASK_TAGS, JOURNAL_RECAP_KEYWORD, JOURNAL_RECAP_OFFSET,
    JOURNAL_REFLECTION_KEYWORD, JOURNAL_REFLECTION_OFFSET, TAG_MAIN_TASK,
};
use crate::data::format::{format_log_line, format_task_time, format_task_title, tag_color};
use crate::data::journal::section_lines;
use crate::data::{ActiveTaskModel, FormatProfile, PersonalStats, Task, TaskColumn};
use crate::errors::{AIError, AppError, AppResult};
use crate::services::{NotesService, TaskService};
use chrono::NaiveDate;
use std::cell::OnceCell;
use tracing::{debug, info};

/// Turns service data into page content for a given day.
pub struct DataProcessor<'a> {
    tasks: &'a dyn TaskService,
    notes: &'a dyn NotesService,
    chat: Option<&'a dyn ChatModel>,
    profile: FormatProfile,
    /// Active tasks, fetched at most once per processor.
    active_tasks: OnceCell<Vec<Task>>,
}

impl<'a> DataProcessor<'a> {
    pub fn new(
        tasks: &'a dyn TaskService,
        notes: &'a dyn NotesService,
        chat: Option<&'a dyn ChatModel>,
        profile: FormatProfile,
    ) -> Self {
        Self {
            tasks,
            notes,
            chat,
            profile,
            active_tasks: OnceCell::new(),
        }
    }

    fn cached_active_tasks(&self) -> AppResult<&[Task]> {
        match self.active_tasks.get() {
            Some(tasks) => Ok(tasks.as_slice()),
            None => {
                let fetched = self.tasks.active_tasks()?;
                debug!("Fetched {} active tasks", fetched.len());
                Ok(self.active_tasks.get_or_init(|| fetched).as_slice())
            }
        }
    }

    /// Tasks due on `date`, chronologically, without routines and habits.
    pub fn get_day_active_tasks(&self, date: NaiveDate) -> AppResult<Vec<ActiveTaskModel>> {
        info!("Getting active tasks for date {}", date);

        let mut day_tasks: Vec<&Task> = self
            .cached_active_tasks()?
            .iter()
            .filter(|task| task.due_date.is_some_and(|due| due.date_naive() == date))
            .filter(|task| !HIDDEN_TASK_TAGS.iter().any(|tag| task.has_tag(tag)))
            .collect();
        day_tasks.sort_by_key(|task| task.due_date);

        Ok(day_tasks
            .into_iter()
            .take(self.profile.max_tasks)
            .map(|task| self.to_model(task))
            .collect())
    }

    fn to_model(&self, task: &Task) -> ActiveTaskModel {
        let column = task.column_id.as_deref().and_then(TaskColumn::from_id);
        if column.is_none() {
            debug!("Task {} has no board column", task.id);
        }

        ActiveTaskModel {
            title: format_task_title(task, &self.profile),
            date: format_task_time(task.due_date.as_ref()),
            color: tag_color(&task.tags).to_string(),
            column,
            important: task.has_tag(TAG_MAIN_TASK),
        }
    }

    /// Log lines created on `date`, oldest first.
    pub fn get_day_logs(&self, date: NaiveDate) -> AppResult<Vec<String>> {
        info!("Getting logs for date {}", date);

        let mut logs: Vec<Task> = self
            .tasks
            .logs()?
            .into_iter()
            .filter(|log| log.created_date.date_naive() == date)
            .collect();
        logs.sort_by_key(|log| log.created_date);

        Ok(logs
            .iter()
            .take(self.profile.max_logs)
            .map(|log| format_log_line(log, self.profile.log_line_cap))
            .collect())
    }

    /// Stats recorded for `date`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Journal` when the notes service has no row for the day.
    pub fn get_day_stats(&self, date: NaiveDate) -> AppResult<PersonalStats> {
        info!("Getting stats for date {}", date);

        let rows = self.notes.stats_between(date, date)?;
        rows.iter()
            .find(|row| row.date == date)
            .or(rows.first())
            .copied()
            .ok_or_else(|| AppError::Journal(format!("No stats recorded for {}", date)))
    }

    pub fn get_day_journal_url(&self, date: NaiveDate) -> AppResult<String> {
        info!("Getting journal url for date {}", date);
        self.notes.journal_url(date)
    }

    /// The night reflection of `date`, without its two prompt lines.
    pub fn get_day_journal(&self, date: NaiveDate) -> AppResult<Vec<String>> {
        info!("Getting journal for date {}", date);
        self.journal_section(date, JOURNAL_REFLECTION_KEYWORD, JOURNAL_REFLECTION_OFFSET)
    }

    /// The day logs section of the journal of `date`.
    pub fn get_day_recap(&self, date: NaiveDate) -> AppResult<Vec<String>> {
        info!("Getting recap for date {}", date);
        self.journal_section(date, JOURNAL_RECAP_KEYWORD, JOURNAL_RECAP_OFFSET)
    }

    fn journal_section(&self, date: NaiveDate, keyword: &str, offset: usize) -> AppResult<Vec<String>> {
        let content = self.notes.journal_content(date)?;
        section_lines(&content, keyword, offset).ok_or_else(|| {
            AppError::Journal(format!(
                "Journal for {} has no '{}' section",
                date, keyword
            ))
        })
    }

    /// Asks the chat model for a first-person prose recap of `logs`.
    ///
    /// # Errors
    ///
    /// Returns `AIError::MissingApiKey` when no chat model is configured, or whatever
    /// the model call fails with.
    pub fn generate_recap_summary(&self, logs: &[String]) -> AppResult<String> {
        info!("Generating recap summary from {} log lines", logs.len());
        let chat = self.chat.ok_or(AIError::MissingApiKey)?;
        chat.complete(&recap_summary_prompt(&logs.join("\n")))
    }

    /// Stores `summary` as a note page and returns the page URL.
    pub fn save_recap_note(&self, date: NaiveDate, summary: &str) -> AppResult<String> {
        let title = format!("Recap {}", date.format(DATE_FORMAT_ISO));
        let paragraphs: Vec<String> = summary
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(str::to_string)
            .collect();
        self.notes.create_note_page(&title, &paragraphs)
    }

    /// Records a highlighted log entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Input` for blank text.
    pub fn add_highlight_log(&self, text: &str) -> AppResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Input("Highlight text cannot be empty".to_string()));
        }
        self.tasks.add_highlight_log(text)
    }
}
