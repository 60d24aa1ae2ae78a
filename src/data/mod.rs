//! Planner data: service snapshots, display records and the processing that links them.
//!
//! - `format`: truncation, markers, tag colors and time formatting
//! - `journal`: the nested journal tree and the section search over it
//! - `processor`: `DataProcessor`, which fetches and formats everything a page shows

pub mod format;
pub mod journal;
pub mod processor;

pub use format::{FormatProfile, MarkerOrder};
pub use journal::{JournalNode, Section};
pub use processor::DataProcessor;

use chrono::{DateTime, FixedOffset, NaiveDate};

/// A task or log snapshot from the task service.
///
/// Timestamps are already localized to the zone the task was scheduled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub created_date: DateTime<FixedOffset>,
    /// Tags in the order the service returns them.
    pub tags: Vec<String>,
    pub column_id: Option<String>,
}

impl Task {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Board region a task is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskColumn {
    WorkGreat,
    WorkAmazing,
    PersonalGreat,
    PersonalAmazing,
}

impl TaskColumn {
    /// All columns, in board order.
    pub const ALL: [TaskColumn; 4] = [
        TaskColumn::WorkGreat,
        TaskColumn::WorkAmazing,
        TaskColumn::PersonalGreat,
        TaskColumn::PersonalAmazing,
    ];

    /// The task service's column id for this region.
    pub fn id(self) -> &'static str {
        match self {
            TaskColumn::WorkGreat => "6616e230658e744f56832163",
            TaskColumn::WorkAmazing => "6616e235658e744f56832168",
            TaskColumn::PersonalGreat => "6616e224658e744f56832157",
            TaskColumn::PersonalAmazing => "6616e22a658e744f5683215c",
        }
    }

    /// Looks a column up by service id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.id() == id)
    }
}

/// Display record for one task on the task sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTaskModel {
    /// Truncated title with its markers.
    pub title: String,
    /// Due time, e.g. "09:30am"; empty when the task has no due date.
    pub date: String,
    /// `#rrggbb` swatch color.
    pub color: String,
    pub column: Option<TaskColumn>,
    /// Tagged `main-task`; drawn bold.
    pub important: bool,
}

/// Daily time aggregates from the notes service, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PersonalStats {
    pub date: NaiveDate,
    pub work_time: f64,
    pub focus_time: f64,
    pub sleep_time: f64,
    pub leisure_time: f64,
}
