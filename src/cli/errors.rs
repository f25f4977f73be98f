//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;

use crate::http_server::ServerError;
use crate::repository::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or setting error
    ConfigError,
    /// Storage could not be opened or initialized
    StorageError,
    /// Runtime or server failed
    BootFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "HABIT_CLI_CONFIG_ERROR",
            Self::StorageError => "HABIT_CLI_STORAGE_ERROR",
            Self::BootFailed => "HABIT_CLI_BOOT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::UnsupportedDriver(_) => Self::config_error(e.to_string()),
            other => Self::new(CliErrorCode::StorageError, other.to_string()),
        }
    }
}

impl From<ServerError> for CliError {
    fn from(e: ServerError) -> Self {
        match e {
            ServerError::InvalidAddress(_) => Self::config_error(e.to_string()),
            other => Self::boot_failed(other.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("bad port");
        assert_eq!(err.to_string(), "HABIT_CLI_CONFIG_ERROR: bad port");
    }

    #[test]
    fn test_unsupported_driver_is_config_error() {
        let err = CliError::from(StorageError::UnsupportedDriver("pg".into()));
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_database_failure_is_storage_error() {
        let err = CliError::from(StorageError::Database(sqlx::Error::PoolClosed));
        assert_eq!(err.code_str(), "HABIT_CLI_STORAGE_ERROR");
    }
}
