//! Fetch error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching a document
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("GET {url} returned {status}")]
    Status { url: String, status: u16 },

    /// Reading from the site directory failed
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No document at this path
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Path escapes the site root
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// Document is not valid JSON for the expected shape
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Fetcher could not be constructed
    #[error("Fetcher setup failed: {0}")]
    Setup(String),
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
