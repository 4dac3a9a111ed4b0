//! Configuration store error types

use thiserror::Error;

use crate::fetch::FetchError;
use crate::storage::StorageError;

/// Errors that can occur in the configuration store
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration document could not be fetched
    #[error("Failed to fetch configuration: {0}")]
    Fetch(#[from] FetchError),

    /// The document is valid JSON but not an object
    #[error("Configuration document {path} must be a JSON object")]
    NotAnObject { path: String },

    /// Local storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored blob is not valid JSON
    #[error("Stored configuration is corrupt: {0}")]
    Corrupt(String),

    /// Nothing has been loaded into local storage yet
    #[error("Configuration has not been loaded")]
    NotLoaded,

    /// A value exists but does not have the requested shape
    #[error("Configuration key '{key}' has unexpected type: {error}")]
    InvalidValue { key: String, error: String },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConfigError::NotLoaded.to_string(),
            "Configuration has not been loaded"
        );

        let err = ConfigError::NotAnObject {
            path: "config.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Configuration document config.json must be a JSON object"
        );
    }

    #[test]
    fn test_fetch_error_conversion() {
        let err: ConfigError = FetchError::NotFound("config.json".to_string()).into();
        assert!(matches!(err, ConfigError::Fetch(_)));
    }
}
