//! Error types for the curation core

use thiserror::Error;

/// Result type for curation core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Curation core errors
#[derive(Error, Debug)]
pub enum Error {
    /// Content not found (stale or invalid id from the caller)
    #[error("Content not found: {0}")]
    ContentNotFound(u64),

    /// Uniqueness violation (username, wallet, or token id)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Illegal lifecycle transition (e.g. token issuance on unapproved content)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Metrics registration error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the not-found class of errors.
    ///
    /// These are always caused by a caller passing a stale or invalid id;
    /// retrying is meaningless.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ContentNotFound(_))
    }
}
