//! Configuration management for the bitacora application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. It covers the folders the pages are read from and
//! written to, the timezone that anchors "now", the remote service endpoints and
//! credentials, and the formatting profile used for task and log lines.
//!
//! # Environment Variables
//!
//! - `TT_USER` / `TT_PASS`: task service credentials
//! - `NT_AUTH`: notes service integration token
//! - `OPENAI_API_KEY`: chat completion API key
//! - `BITACORA_*`: folders, timezone, endpoints and formatting overrides
//!   (see [`crate::constants`] for the full list)

use crate::constants::*;
use crate::dates::parse_timezone;
use crate::data::format::{FormatProfile, MarkerOrder};
use crate::errors::{AppError, AppResult};
use chrono_tz::Tz;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Task service endpoint and credentials.
#[derive(Clone)]
pub struct TickTickSettings {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Project whose tasks are the day's logs.
    pub logs_project_id: Option<String>,
}

/// Notes service endpoint, token and database ids.
#[derive(Clone)]
pub struct NotionSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub stats_database_id: Option<String>,
    pub journal_database_id: Option<String>,
    pub notes_database_id: Option<String>,
}

/// Chat completion endpoint, key and model.
#[derive(Clone)]
pub struct OpenAISettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Weather service endpoint, location and fetch timeout.
#[derive(Debug, Clone)]
pub struct WeatherSettings {
    pub base_url: String,
    pub location: String,
    pub timeout: Duration,
}

/// Configuration for the bitacora application.
///
/// # Examples
///
/// Loading configuration from a custom lookup (handy in tests):
/// ```
/// use bitacora::Config;
/// use std::collections::HashMap;
///
/// let vars: HashMap<&str, &str> = [("BITACORA_TIMEZONE", "UTC")].into_iter().collect();
/// let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
/// assert_eq!(config.timezone, chrono_tz::UTC);
/// ```
#[derive(Clone)]
pub struct Config {
    /// Folder holding the page templates and the `weather_icons/` folder.
    pub templates_dir: PathBuf,
    /// Folder holding `RobotoMono-Regular.ttf` and `RobotoMono-Bold.ttf`.
    pub fonts_dir: PathBuf,
    /// Folder the PDF files are written to.
    pub output_dir: PathBuf,
    /// Folder holding the carry-forward pages of previous days.
    pub old_pages_dir: PathBuf,
    /// Plain-text file printed on the thoughts page.
    pub thoughts_file: PathBuf,
    /// Zone that anchors "now".
    pub timezone: Tz,
    pub weather: WeatherSettings,
    pub ticktick: TickTickSettings,
    pub notion: NotionSettings,
    pub openai: OpenAISettings,
    /// Truncation caps, list caps and marker order.
    pub format: FormatProfile,
}

fn redact(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => REDACTED_PLACEHOLDER,
        None => "None",
    }
}

/// Placeholder string for redacted information in debug output.
const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("templates_dir", &self.templates_dir)
            .field("fonts_dir", &self.fonts_dir)
            .field("output_dir", &self.output_dir)
            .field("old_pages_dir", &self.old_pages_dir)
            .field("thoughts_file", &self.thoughts_file)
            .field("timezone", &self.timezone)
            .field("weather", &self.weather)
            .field("ticktick_username", &redact(&self.ticktick.username))
            .field("ticktick_password", &redact(&self.ticktick.password))
            .field("notion_token", &redact(&self.notion.token))
            .field("openai_api_key", &redact(&self.openai.api_key))
            .field("format", &self.format)
            .finish()
    }
}

impl Default for Config {
    /// Creates a new Config with default values and no credentials.
    fn default() -> Self {
        Config {
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            fonts_dir: PathBuf::from(DEFAULT_FONTS_DIR),
            output_dir: PathBuf::from("."),
            old_pages_dir: PathBuf::from(DEFAULT_OLD_PAGES_DIR),
            thoughts_file: PathBuf::from(DEFAULT_THOUGHTS_FILE),
            timezone: chrono_tz::America::Bogota,
            weather: WeatherSettings {
                base_url: DEFAULT_WEATHER_URL.to_string(),
                location: DEFAULT_WEATHER_LOCATION.to_string(),
                timeout: Duration::from_secs(DEFAULT_WEATHER_TIMEOUT_SECS),
            },
            ticktick: TickTickSettings {
                base_url: DEFAULT_TICKTICK_URL.to_string(),
                username: None,
                password: None,
                logs_project_id: None,
            },
            notion: NotionSettings {
                base_url: DEFAULT_NOTION_URL.to_string(),
                token: None,
                stats_database_id: None,
                journal_database_id: None,
                notes_database_id: None,
            },
            openai: OpenAISettings {
                base_url: DEFAULT_OPENAI_URL.to_string(),
                api_key: None,
                model: DEFAULT_CHAT_MODEL.to_string(),
            },
            format: FormatProfile::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a path cannot be expanded, the timezone is unknown,
    /// or a numeric setting does not parse.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Config::default();

        let path = |key: &str, fallback: PathBuf| -> AppResult<PathBuf> {
            match get(key) {
                Some(raw) => expand_path(&raw),
                None => Ok(fallback),
            }
        };

        let timezone = match get(ENV_VAR_TIMEZONE) {
            Some(raw) => parse_timezone(&raw)?,
            None => defaults.timezone,
        };

        let weather_timeout = match get(ENV_VAR_WEATHER_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(parse_number(ENV_VAR_WEATHER_TIMEOUT_SECS, &raw)?),
            None => defaults.weather.timeout,
        };

        let mut format = defaults.format.clone();
        if let Some(raw) = get(ENV_VAR_TASK_TITLE_CAP) {
            format.task_title_cap = parse_number(ENV_VAR_TASK_TITLE_CAP, &raw)?;
        }
        if let Some(raw) = get(ENV_VAR_LOG_LINE_CAP) {
            format.log_line_cap = parse_number(ENV_VAR_LOG_LINE_CAP, &raw)?;
        }
        if let Some(raw) = get(ENV_VAR_MAX_TASKS) {
            format.max_tasks = parse_number(ENV_VAR_MAX_TASKS, &raw)?;
        }
        if let Some(raw) = get(ENV_VAR_MAX_LOGS) {
            format.max_logs = parse_number(ENV_VAR_MAX_LOGS, &raw)?;
        }
        if let Some(raw) = get(ENV_VAR_MARKER_ORDER) {
            format.marker_order = MarkerOrder::from_str(&raw)?;
        }

        let config = Config {
            templates_dir: path(ENV_VAR_TEMPLATES_DIR, defaults.templates_dir)?,
            fonts_dir: path(ENV_VAR_FONTS_DIR, defaults.fonts_dir)?,
            output_dir: path(ENV_VAR_OUTPUT_DIR, defaults.output_dir)?,
            old_pages_dir: path(ENV_VAR_OLD_PAGES_DIR, defaults.old_pages_dir)?,
            thoughts_file: path(ENV_VAR_THOUGHTS_FILE, defaults.thoughts_file)?,
            timezone,
            weather: WeatherSettings {
                base_url: get(ENV_VAR_WEATHER_URL).unwrap_or(defaults.weather.base_url),
                location: get(ENV_VAR_WEATHER_LOCATION).unwrap_or(defaults.weather.location),
                timeout: weather_timeout,
            },
            ticktick: TickTickSettings {
                base_url: get(ENV_VAR_TICKTICK_URL).unwrap_or(defaults.ticktick.base_url),
                username: get(ENV_VAR_TICKTICK_USER),
                password: get(ENV_VAR_TICKTICK_PASS),
                logs_project_id: get(ENV_VAR_TICKTICK_LOGS_PROJECT),
            },
            notion: NotionSettings {
                base_url: get(ENV_VAR_NOTION_URL).unwrap_or(defaults.notion.base_url),
                token: get(ENV_VAR_NOTION_AUTH),
                stats_database_id: get(ENV_VAR_NOTION_STATS_DB),
                journal_database_id: get(ENV_VAR_NOTION_JOURNAL_DB),
                notes_database_id: get(ENV_VAR_NOTION_NOTES_DB),
            },
            openai: OpenAISettings {
                base_url: get(ENV_VAR_OPENAI_URL).unwrap_or(defaults.openai.base_url),
                api_key: get(ENV_VAR_OPENAI_API_KEY),
                model: get(ENV_VAR_OPENAI_MODEL).unwrap_or(defaults.openai.model),
            },
            format,
        };

        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a folder path is empty, a cap or list size is
    /// zero, or the weather timeout is zero.
    pub fn validate(&self) -> AppResult<()> {
        let folders = [
            ("templates directory", &self.templates_dir),
            ("fonts directory", &self.fonts_dir),
            ("output directory", &self.output_dir),
            ("old pages directory", &self.old_pages_dir),
            ("thoughts file", &self.thoughts_file),
        ];
        for (name, path) in folders {
            if path.as_os_str().is_empty() {
                return Err(AppError::Config(format!("The {} path is empty", name)));
            }
        }

        if self.format.task_title_cap == 0 || self.format.log_line_cap == 0 {
            return Err(AppError::Config(
                "Truncation caps must be greater than zero".to_string(),
            ));
        }

        if self.format.max_tasks == 0 || self.format.max_logs == 0 {
            return Err(AppError::Config(
                "Task and log list sizes must be greater than zero".to_string(),
            ));
        }

        if self.weather.timeout.is_zero() {
            return Err(AppError::Config(
                "Weather timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Expands `~` and environment variable references in a path setting.
fn expand_path(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.parse::<T>()
        .map_err(|_| AppError::Config(format!("{} must be a whole number, got '{}'", key, raw)))
}
