//! Storage error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid deck file {path}: {source}")]
    InvalidDeck {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("deck not found: {0}")]
    DeckNotFound(String),

    #[error("invalid deck id: {0}")]
    InvalidId(String),
}
