//! Error handling utilities for the bitacora application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents errors raised while talking to the task or notes services.
///
/// # Examples
///
/// ```
/// use bitacora::errors::ServiceError;
///
/// let error = ServiceError::MissingCredentials {
///     service: "ticktick",
///     variable: "TT_USER",
/// };
/// assert!(format!("{}", error).contains("TT_USER"));
/// ```
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A credential environment variable is not set.
    #[error("Missing credentials for {service}: set the {variable} environment variable")]
    MissingCredentials {
        /// Service the credential belongs to
        service: &'static str,
        /// Environment variable expected to hold it
        variable: &'static str,
    },

    /// A required service setting (database id, project id) is not configured.
    #[error("{service} is not configured: {message}")]
    NotConfigured {
        service: &'static str,
        message: String,
    },

    /// The service could not be reached.
    #[error("Could not reach {service}: {source}")]
    Unreachable {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service rejected our credentials.
    #[error("{service} rejected the credentials (HTTP {status})")]
    Unauthorized { service: &'static str, status: u16 },

    /// The service answered with something we could not use.
    #[error("Invalid response from {service}: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },
}

/// Represents specific error cases that can occur during AI operations.
///
/// # Examples
///
/// ```
/// use bitacora::errors::AIError;
///
/// let error = AIError::ModelNotFound("gpt-4".to_string());
/// assert!(format!("{}", error).contains("gpt-4"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// No API key available for the chat model.
    #[error("Missing API key: set the OPENAI_API_KEY environment variable")]
    MissingApiKey,

    /// The chat completion API is not reachable.
    #[error("Chat completion API error: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// Requested model not known by the API.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Invalid or unexpected response from the chat completion API.
    #[error("Invalid response from chat completion API: {0}")]
    InvalidResponse(String),
}

/// Represents errors raised while composing page rasters.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A template or icon image could not be opened or decoded.
    #[error("Failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A font file could not be read or parsed.
    #[error("Failed to load font {path}: {message}")]
    Font { path: PathBuf, message: String },

    /// The QR payload could not be encoded.
    #[error("Failed to encode QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

/// Represents errors raised while writing or opening exported pages.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The PDF document could not be assembled or written.
    #[error("Failed to write PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    /// A PNG page could not be written.
    #[error("Failed to write PNG {path}: {source}")]
    Png {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The OS open command failed to launch.
    #[error("Failed to open '{path}' with '{command}': {source}")]
    Open {
        command: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the bitacora application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use bitacora::errors::AppError;
///
/// let error = AppError::Config("Missing templates directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing templates directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use bitacora::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed interactive input (e.g. a non-numeric day offset).
    #[error("Invalid input: {0}")]
    Input(String),

    /// Journal or stats content that does not have the expected shape.
    #[error("Journal error: {0}")]
    Journal(String),

    /// Errors from the task or notes services.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Errors related to AI operations.
    #[error("AI error: {0}")]
    AI(#[from] AIError),

    /// Errors while composing page images.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Errors while writing or opening output files.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use bitacora::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Journal("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
