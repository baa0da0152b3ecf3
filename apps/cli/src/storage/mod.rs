//! Local deck files.

pub mod error;
pub mod json;

pub use error::StorageError;
pub use json::JsonDeckRepository;
