//! Error types for the dutybot core.

use thiserror::Error;

/// Errors that can occur while loading or diffing a calendar feed.
#[derive(Error, Debug)]
pub enum DutyError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Roster error: {0}")]
    Roster(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DutyError {
    fn from(err: reqwest::Error) -> Self {
        DutyError::Fetch(err.to_string())
    }
}

impl From<csv::Error> for DutyError {
    fn from(err: csv::Error) -> Self {
        DutyError::Roster(err.to_string())
    }
}

/// Result type alias for dutybot core operations.
pub type DutyResult<T> = Result<T, DutyError>;
