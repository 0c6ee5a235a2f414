//! Error types for the pong-rl crate

use thiserror::Error;

/// Main error type for the pong-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Q-table at '{path}' is corrupt: {message}")]
    CorruptTable { path: String, message: String },

    #[error("failed to {operation} '{path}': {source}")]
    StorageUnavailable {
        operation: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Q-value {value} for state {state}, action {action} is not finite")]
    NonFiniteQValue { state: u16, action: u8, value: f64 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("state id {value} is out of range (must be below {limit})")]
    InvalidStateId { value: u32, limit: u32 },

    #[error("action {value} is not one of 0 (up), 1 (down), 2 (stay)")]
    InvalidAction { value: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
