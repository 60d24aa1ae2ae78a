//! Remote services the planner pulls its data from.
//!
//! The planner only needs a narrow slice of each service, captured by the
//! [`TaskService`] and [`NotesService`] traits so the pipeline can be exercised
//! against in-memory fakes.
//!
//! # Module Structure
//!
//! - `ticktick`: task service client (active tasks, logs, highlight logs)
//! - `notion`: notes service client (stats, journal pages, note pages)
//! - `weather`: hourly forecast client with a bounded timeout

pub mod notion;
pub mod ticktick;
pub mod weather;

pub use notion::NotionClient;
pub use ticktick::TickTickClient;
pub use weather::{DayForecast, HourlyForecast, WeatherClient, WeatherKind};

use crate::data::{JournalNode, PersonalStats, Task};
use crate::errors::{AppResult, ServiceError};
use chrono::NaiveDate;
use reqwest::blocking::Response;
use reqwest::StatusCode;

/// The task-tracking service.
pub trait TaskService {
    /// Lists every task that is not completed.
    fn active_tasks(&self) -> AppResult<Vec<Task>>;

    /// Lists the log entries.
    fn logs(&self) -> AppResult<Vec<Task>>;

    /// Records a log entry tagged `highlight`.
    fn add_highlight_log(&self, title: &str) -> AppResult<()>;
}

/// The notes service holding stats and the daily journal.
pub trait NotesService {
    /// Stats rows for every day in `start..=end`.
    fn stats_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<PersonalStats>>;

    /// URL of the journal page for `date`; empty when there is none.
    fn journal_url(&self, date: NaiveDate) -> AppResult<String>;

    /// Content of the journal page for `date` as a nested tree.
    fn journal_content(&self, date: NaiveDate) -> AppResult<Vec<JournalNode>>;

    /// Creates a note page and returns its URL.
    fn create_note_page(&self, title: &str, paragraphs: &[String]) -> AppResult<String>;
}

/// Turns a non-success HTTP status into a [`ServiceError`].
pub(crate) fn ensure_success(service: &'static str, response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ServiceError::Unauthorized {
            service,
            status: status.as_u16(),
        }
        .into());
    }

    let error_text = response.text().unwrap_or_default();
    Err(ServiceError::InvalidResponse {
        service,
        message: format!("HTTP {}: {}", status, error_text),
    }
    .into())
}

/// Maps a transport failure onto [`ServiceError::Unreachable`].
pub(crate) fn unreachable(service: &'static str) -> impl Fn(reqwest::Error) -> ServiceError {
    move |source| ServiceError::Unreachable { service, source }
}
