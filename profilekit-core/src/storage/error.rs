//! Error types for the profile storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by storage executors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Errors coming from the profile database.
    #[error("profile db error: {0}")]
    Db(String),

    /// Serialization/deserialization failures.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("storage lock error: {0}")]
    Lock(String),

    /// The database was written by a newer, unknown schema.
    #[error("unsupported schema version: {0}")]
    UnsupportedSchemaVersion(i64),
}
