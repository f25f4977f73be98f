//! Storage error types
//!
//! "Row absent on read" is not an error: reads return `Option`. `NotFound`
//! is reserved for writes that matched zero rows.

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Update or delete matched no row
    #[error("no record with id {0}")]
    NotFound(i64),

    /// Engine-level failure: connectivity, constraint, malformed query
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configured driver is not `sqlite` or `mysql`
    #[error("unsupported database driver '{0}' (expected sqlite or mysql)")]
    UnsupportedDriver(String),

    /// Engine returned an id that does not fit the record id type
    #[error("generated id {0} is out of range")]
    IdOutOfRange(u64),
}

impl StorageError {
    /// Returns true if the failure means "no such row"
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
