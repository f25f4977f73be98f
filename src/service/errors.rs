//! Service error types

use thiserror::Error;

use crate::repository::StorageError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request body failed field validation
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Referenced record does not exist
    #[error("record not found")]
    NotFound,

    /// Storage failed for a reason other than a missing row
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        if err.is_not_found() {
            ServiceError::NotFound
        } else {
            ServiceError::Storage(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_not_found() {
        let err = ServiceError::from(StorageError::NotFound(3));
        assert!(matches!(err, ServiceError::NotFound));
    }

    #[test]
    fn test_storage_fault_stays_storage() {
        let err = ServiceError::from(StorageError::Database(sqlx::Error::PoolClosed));
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn test_invalid_input_message() {
        let err = ServiceError::InvalidInput("content is required");
        assert_eq!(err.to_string(), "invalid input: content is required");
    }
}
