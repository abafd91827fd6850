use thiserror::Error;

/// Error type shared by the calculator session, history store and persistence layer.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("History entry not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, SplitError>;

impl From<std::io::Error> for SplitError {
    fn from(err: std::io::Error) -> Self {
        SplitError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SplitError {
    fn from(err: serde_json::Error) -> Self {
        SplitError::Storage(err.to_string())
    }
}
