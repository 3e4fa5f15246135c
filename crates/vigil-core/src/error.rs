//! Error types for Vigil Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A malformed or missing identity component.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required tenant or resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backing store or network failure.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error originates from the backing store or the
    /// request's execution context rather than from the caller's input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Upstream(_) | Error::Cancelled | Error::DeadlineExceeded
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
