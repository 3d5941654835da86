use thiserror::Error;

use crate::core::config::ConfigError;
use crate::sheet::SheetError;

/// Errors raised by remote file calls (getFile and file download)
///
/// Every variant is an expected, routine fault: the ingestion flow logs the
/// reason and answers the user, it never propagates these to the dispatcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request did not finish within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Telegram answered with a non-success HTTP status
    #[error("HTTP request failed with status: {0}")]
    Status(reqwest::StatusCode),

    /// Connection, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status)
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent error handling.
/// Uses `thiserror` for automatic error conversion and display formatting.
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Remote file errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet parsing errors
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Blocking task was cancelled or panicked
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
