//! Tracing subscriber setup.
//!
//! Logs go to stderr, as plain text or one JSON object per line. `RUST_LOG` wins over
//! the level given on the command line.

use crate::constants::{LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::errors::{AppError, AppResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LOG_FORMAT_TEXT => Ok(LogFormat::Text),
            LOG_FORMAT_JSON => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown log format '{}', expected '{}' or '{}'",
                other, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            ))),
        }
    }
}

/// Builds the level filter: `RUST_LOG` when set, otherwise `level`.
pub fn level_filter(level: &str) -> AppResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| AppError::Config(format!("Invalid log level '{}': {}", level, e)))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns `AppError::Config` for an unparsable level or when a subscriber is
/// already installed.
pub fn init(format: LogFormat, level: &str) -> AppResult<()> {
    let filter = level_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_invalid_level_is_config_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(matches!(
            level_filter("bitacora=loud"),
            Err(AppError::Config(_))
        ));
        assert!(level_filter("debug").is_ok());
    }
}
