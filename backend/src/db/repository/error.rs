//! Error types for repository operations.

use chrono::NaiveDate;

use crate::models::SlotTime;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The `(owner, date, time)` uniqueness key was violated on insert.
    /// Callers surface this through the same channel as a scheduling overlap.
    #[error("Conflict: a slot on {date} at {time} already exists")]
    Conflict { date: NaiveDate, time: SlotTime },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<String> for RepositoryError {
    fn from(s: String) -> Self {
        RepositoryError::InternalError(s)
    }
}

impl From<&str> for RepositoryError {
    fn from(s: &str) -> Self {
        RepositoryError::InternalError(s.to_string())
    }
}
