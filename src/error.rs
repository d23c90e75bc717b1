//! Error types for freebie-alert.

use thiserror::Error;

/// Why a listing fetch failed.
///
/// Every variant ends the poll loop; they are kept apart so the log and the
/// caller can tell a slow forum from a missing one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The forum answered with a non-success status code.
    #[error("HTTP error: {0}")]
    Status(u16),

    /// Connection, TLS or body transfer failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The body was not a listing we understand.
    #[error("malformed listing: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Common error type for freebie-alert.
#[derive(Error, Debug)]
pub enum AlertError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Listing fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Message delivery error.
    #[error("delivery error: {0}")]
    Delivery(String),
}

/// Result type alias for freebie-alert operations.
pub type Result<T> = std::result::Result<T, AlertError>;

/// Process exit status for the outcome of a run.
///
/// Polling only ever stops on failure, so a returned [`FetchError`] exits
/// with 1, as does a delivery error. Bad configuration exits with 2.
pub fn exit_code(outcome: &Result<FetchError>) -> u8 {
    match outcome {
        Ok(_) => 1,
        Err(AlertError::Config(_)) | Err(AlertError::Io(_)) => 2,
        Err(AlertError::Fetch(_)) | Err(AlertError::Delivery(_)) => 1,
    }
}
