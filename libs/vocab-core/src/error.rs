//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the scheduling core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid grade {0}, expected 0-3")]
    InvalidGrade(u8),

    #[error("unknown entry: {0}")]
    UnknownEntry(String),

    #[error("an attempt is already in progress")]
    AttemptInProgress,

    #[error("entry {0} has graded attempts but no score")]
    MissingScore(String),
}
