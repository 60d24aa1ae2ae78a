//! Task service HTTP client.
//!
//! Talks to the TickTick v2 web API: a password sign-on yields a session token that is
//! sent as the `t` cookie on every later request. Logs are the tasks of a dedicated
//! project, so the same batch listing serves both the task and the log sheets.

use crate::config::TickTickSettings;
use crate::constants::{ENV_VAR_TICKTICK_PASS, ENV_VAR_TICKTICK_USER, TAG_HIGHLIGHT};
use crate::data::Task;
use crate::errors::{AppResult, ServiceError};
use crate::services::{ensure_success, unreachable, TaskService};
use chrono::offset::Offset;
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};

const SERVICE: &str = "ticktick";
const TICKTICK_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";
/// Status of a task that is neither completed nor abandoned.
const STATUS_ACTIVE: i32 = 0;

#[derive(Debug, Serialize)]
struct SignOnRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignOnResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchCheck {
    sync_task_bean: SyncTaskBean,
}

#[derive(Debug, Deserialize)]
struct SyncTaskBean {
    #[serde(default)]
    update: Vec<RawTask>,
}

/// A task as the v2 API returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    id: String,
    project_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    created_time: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    column_id: Option<String>,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    status: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewTask<'a> {
    title: &'a str,
    project_id: &'a str,
    tags: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct BatchAdd<'a> {
    add: Vec<NewTask<'a>>,
}

/// Client for the task service.
pub struct TickTickClient {
    base_url: String,
    client: Client,
    token: String,
    logs_project_id: Option<String>,
    default_timezone: Tz,
}

impl TickTickClient {
    /// Signs on with the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TT_USER` or `TT_PASS` is not set
    /// - The service is not reachable
    /// - The credentials are rejected
    pub fn login(settings: &TickTickSettings, default_timezone: Tz) -> AppResult<Self> {
        let username = settings.username.as_deref().ok_or(ServiceError::MissingCredentials {
            service: SERVICE,
            variable: ENV_VAR_TICKTICK_USER,
        })?;
        let password = settings.password.as_deref().ok_or(ServiceError::MissingCredentials {
            service: SERVICE,
            variable: ENV_VAR_TICKTICK_PASS,
        })?;

        info!("Signing on to the task service");
        let client = Client::new();
        let url = format!(
            "{}/api/v2/user/signon?wc=true&remember=true",
            settings.base_url
        );
        let response = client
            .post(&url)
            .json(&SignOnRequest { username, password })
            .send()
            .map_err(unreachable(SERVICE))?;
        let response = ensure_success(SERVICE, response)?;

        let sign_on: SignOnResponse = response.json().map_err(|e| ServiceError::InvalidResponse {
            service: SERVICE,
            message: format!("Failed to parse sign-on response: {}", e),
        })?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            client,
            token: sign_on.token,
            logs_project_id: settings.logs_project_id.clone(),
            default_timezone,
        })
    }

    fn cookie(&self) -> String {
        format!("t={}", self.token)
    }

    fn logs_project(&self) -> AppResult<&str> {
        self.logs_project_id.as_deref().ok_or_else(|| {
            ServiceError::NotConfigured {
                service: SERVICE,
                message: "set BITACORA_TICKTICK_LOGS_PROJECT to the logs project id".to_string(),
            }
            .into()
        })
    }

    fn batch_check(&self) -> AppResult<Vec<RawTask>> {
        let url = format!("{}/api/v2/batch/check/0", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(COOKIE, self.cookie())
            .send()
            .map_err(unreachable(SERVICE))?;
        let response = ensure_success(SERVICE, response)?;

        let check: BatchCheck = response.json().map_err(|e| ServiceError::InvalidResponse {
            service: SERVICE,
            message: format!("Failed to parse task listing: {}", e),
        })?;

        debug!("Task listing returned {} tasks", check.sync_task_bean.update.len());
        Ok(check
            .sync_task_bean
            .update
            .into_iter()
            .filter(|task| task.status == STATUS_ACTIVE)
            .collect())
    }

    fn to_tasks(&self, raw: Vec<RawTask>) -> Vec<Task> {
        raw.into_iter()
            .filter_map(|task| convert_task(task, self.default_timezone))
            .collect()
    }
}

impl TaskService for TickTickClient {
    fn active_tasks(&self) -> AppResult<Vec<Task>> {
        let logs_project = self.logs_project_id.as_deref();
        let raw = self
            .batch_check()?
            .into_iter()
            .filter(|task| Some(task.project_id.as_str()) != logs_project)
            .collect();
        Ok(self.to_tasks(raw))
    }

    fn logs(&self) -> AppResult<Vec<Task>> {
        let logs_project = self.logs_project()?.to_string();
        let raw = self
            .batch_check()?
            .into_iter()
            .filter(|task| task.project_id == logs_project)
            .collect();
        Ok(self.to_tasks(raw))
    }

    fn add_highlight_log(&self, title: &str) -> AppResult<()> {
        let project_id = self.logs_project()?;
        info!("Adding highlight log");

        let url = format!("{}/api/v2/batch/task", self.base_url);
        let body = BatchAdd {
            add: vec![NewTask {
                title,
                project_id,
                tags: vec![TAG_HIGHLIGHT],
            }],
        };
        let response = self
            .client
            .post(&url)
            .header(COOKIE, self.cookie())
            .json(&body)
            .send()
            .map_err(unreachable(SERVICE))?;
        ensure_success(SERVICE, response)?;
        Ok(())
    }
}

/// Parses a v2 timestamp (`2024-04-15T14:30:00.000+0000`), falling back to RFC 3339.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, TICKTICK_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Re-expresses a timestamp in the zone the task was scheduled in.
fn localize(timestamp: DateTime<FixedOffset>, zone: Tz) -> DateTime<FixedOffset> {
    let local = timestamp.with_timezone(&zone);
    let offset = local.offset().fix();
    local.with_timezone(&offset)
}

fn convert_task(raw: RawTask, default_timezone: Tz) -> Option<Task> {
    let zone = raw
        .time_zone
        .as_deref()
        .and_then(|name| Tz::from_str(name).ok())
        .unwrap_or(default_timezone);

    let due_date = raw
        .due_date
        .as_deref()
        .or(raw.start_date.as_deref())
        .and_then(parse_timestamp)
        .map(|due| localize(due, zone));

    let Some(created) = raw.created_time.as_deref().and_then(parse_timestamp) else {
        warn!("Skipping task {} without a readable creation time", raw.id);
        return None;
    };

    Some(Task {
        id: raw.id,
        project_id: raw.project_id,
        title: raw.title,
        due_date,
        created_date: localize(created, zone),
        tags: raw.tags,
        column_id: raw.column_id,
    })
}
