//! Local storage error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in local key-value storage
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation on the backing file failed
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file holds something other than a string map
    #[error("Corrupt storage file {path:?}: {error}")]
    Corrupt { path: PathBuf, error: String },

    /// Serialization of the slot map failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
