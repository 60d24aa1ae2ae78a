//! Constants used throughout the application.
//!
//! This module contains all constants used in the bitacora application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "bitacora";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Printable planner pages stamped with your tasks, logs and journal";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Credentials
/// Task service username.
pub const ENV_VAR_TICKTICK_USER: &str = "TT_USER";
/// Task service password.
pub const ENV_VAR_TICKTICK_PASS: &str = "TT_PASS";
/// Notes service integration token.
pub const ENV_VAR_NOTION_AUTH: &str = "NT_AUTH";
/// Language model API key.
pub const ENV_VAR_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

// Configuration Keys & Environment Variables
pub const ENV_VAR_TEMPLATES_DIR: &str = "BITACORA_TEMPLATES_DIR";
pub const ENV_VAR_FONTS_DIR: &str = "BITACORA_FONTS_DIR";
pub const ENV_VAR_OUTPUT_DIR: &str = "BITACORA_OUTPUT_DIR";
pub const ENV_VAR_OLD_PAGES_DIR: &str = "BITACORA_OLD_PAGES_DIR";
pub const ENV_VAR_THOUGHTS_FILE: &str = "BITACORA_THOUGHTS_FILE";
pub const ENV_VAR_TIMEZONE: &str = "BITACORA_TIMEZONE";
pub const ENV_VAR_WEATHER_LOCATION: &str = "BITACORA_WEATHER_LOCATION";
pub const ENV_VAR_WEATHER_TIMEOUT_SECS: &str = "BITACORA_WEATHER_TIMEOUT_SECS";
pub const ENV_VAR_WEATHER_URL: &str = "BITACORA_WEATHER_URL";
pub const ENV_VAR_TICKTICK_URL: &str = "BITACORA_TICKTICK_URL";
pub const ENV_VAR_TICKTICK_LOGS_PROJECT: &str = "BITACORA_TICKTICK_LOGS_PROJECT";
pub const ENV_VAR_NOTION_URL: &str = "BITACORA_NOTION_URL";
pub const ENV_VAR_NOTION_STATS_DB: &str = "BITACORA_NOTION_STATS_DB";
pub const ENV_VAR_NOTION_JOURNAL_DB: &str = "BITACORA_NOTION_JOURNAL_DB";
pub const ENV_VAR_NOTION_NOTES_DB: &str = "BITACORA_NOTION_NOTES_DB";
pub const ENV_VAR_OPENAI_URL: &str = "BITACORA_OPENAI_URL";
pub const ENV_VAR_OPENAI_MODEL: &str = "BITACORA_OPENAI_MODEL";
pub const ENV_VAR_TASK_TITLE_CAP: &str = "BITACORA_TASK_TITLE_CAP";
pub const ENV_VAR_LOG_LINE_CAP: &str = "BITACORA_LOG_LINE_CAP";
pub const ENV_VAR_MAX_TASKS: &str = "BITACORA_MAX_TASKS";
pub const ENV_VAR_MAX_LOGS: &str = "BITACORA_MAX_LOGS";
pub const ENV_VAR_MARKER_ORDER: &str = "BITACORA_MARKER_ORDER";

// Defaults
/// Default folder holding the page templates and weather icons.
pub const DEFAULT_TEMPLATES_DIR: &str = "designs";
/// Default folder holding the Roboto Mono font files.
pub const DEFAULT_FONTS_DIR: &str = "fonts";
/// Default folder for carry-forward pages.
pub const DEFAULT_OLD_PAGES_DIR: &str = "old_pages";
/// Default thoughts file printed on the back page.
pub const DEFAULT_THOUGHTS_FILE: &str = "thoughts.txt";
pub const DEFAULT_WEATHER_LOCATION: &str = "Quebec City";
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WEATHER_URL: &str = "https://wttr.in";
pub const DEFAULT_TICKTICK_URL: &str = "https://api.ticktick.com";
pub const DEFAULT_NOTION_URL: &str = "https://api.notion.com";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
/// Chat model used for day recaps.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";

// Formatting
pub const DEFAULT_TASK_TITLE_CAP: usize = 54;
pub const DEFAULT_LOG_LINE_CAP: usize = 62;
pub const DEFAULT_MAX_TASKS: usize = 20;
pub const DEFAULT_MAX_LOGS: usize = 20;
/// Suffix appended to truncated titles and log lines.
pub const ELLIPSIS: &str = "...";
/// Marker prefixed to tasks tagged `work`.
pub const WORK_MARKER: char = '^';
/// Marker prefixed to tasks tagged `main-task`.
pub const IMPORTANT_MARKER: char = '!';
/// Prefix glyph for highlighted log lines. The planner font maps it to a star.
pub const HIGHLIGHT_GLYPH: &str = " щ ";
/// Fallback color for tasks whose tags have no color entry.
pub const DEFAULT_TAG_COLOR: &str = "#98b0fc";
/// Tags whose tasks never reach the day sheet.
pub const HIDDEN_TASK_TAGS: &[&str] = &["routine", "habit"];

// Tags
pub const TAG_WORK: &str = "work";
pub const TAG_MAIN_TASK: &str = "main-task";
pub const TAG_HIGHLIGHT: &str = "highlight";

// Journal sections
pub const JOURNAL_REFLECTION_KEYWORD: &str = "night reflection";
pub const JOURNAL_REFLECTION_OFFSET: usize = 2;
pub const JOURNAL_RECAP_KEYWORD: &str = "day logs";
pub const JOURNAL_RECAP_OFFSET: usize = 0;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Due time on the task sheet, lowercased after formatting ("09:30am").
pub const TASK_TIME_FORMAT: &str = "%I:%M%p";
/// Creation time on the log sheet, lowercased after formatting ("09:30 am").
pub const LOG_TIME_FORMAT: &str = "%I:%M %p";
/// Date stamp used in output and carry-forward filenames ("15-apr-2024").
pub const FILENAME_DATE_FORMAT: &str = "%d-%b-%Y";

// Output
/// Resolution used when placing page rasters into PDF files.
pub const PDF_DPI: f32 = 700.0;
pub const DAILY_PAGES_PREFIX: &str = "bitacora-diaria";
pub const WEEKLY_PAGES_PREFIX: &str = "bitacora-semanal";
pub const OLD_TASK_PAGE_SUFFIX: &str = "old-task-page";
pub const OLD_THOUGHTS_PAGE_SUFFIX: &str = "old-thoughts-page";

// Thoughts page
pub const THOUGHTS_WRAP_WIDTH: usize = 58;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "bitacora";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
