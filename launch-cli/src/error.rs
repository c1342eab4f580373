//! Structured error types for the launch CLI
//!
//! Library failures are carried as-is in [`CliError::Launch`] so their
//! classification survives up to `main`.

use lib_launch::LaunchError;
use thiserror::Error;

/// Launch CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    // Launch library
    #[error("{0}")]
    Launch(#[from] LaunchError),

    // Configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown profile '{0}'")]
    UnknownProfile(String),

    // Arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {path}: {reason}")]
    FileReadFailed { path: String, reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    // I/O operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // Serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl From<String> for CliError {
    fn from(s: String) -> Self {
        CliError::Other(s)
    }
}

impl From<&str> for CliError {
    fn from(s: &str) -> Self {
        CliError::Other(s.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_error_message_passes_through() {
        let err: CliError = LaunchError::UserRejected.into();
        assert_eq!(err.to_string(), "Transaction was rejected by user");
    }

    #[test]
    fn test_file_read_error() {
        let err = CliError::FileReadFailed {
            path: "logo.png".to_string(),
            reason: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to read logo.png: not found");
    }
}
