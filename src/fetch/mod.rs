//! Document Fetching
//!
//! Every document the site reads (the configuration file, the project data
//! file) is retrieved through a [`Fetcher`]. Paths are relative to the site
//! root, e.g. `config.json` or `resources/data/images.json`.
//!
//! - [`HttpFetcher`]: GET relative to a base URL
//! - [`DirFetcher`]: read from a site directory on disk
//! - [`StaticFetcher`]: documents held in memory

mod dir;
mod error;
mod http;

pub use dir::DirFetcher;
pub use error::{FetchError, FetchResult};
pub use http::{HttpFetcher, DEFAULT_TIMEOUT_MS};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Retrieves site documents by relative path
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Human-readable location of the site root, for logs
    fn describe(&self) -> String;

    /// Fetch a document as text
    async fn fetch_text(&self, path: &str) -> FetchResult<String>;
}

/// Fetch a document and parse it as JSON
pub async fn fetch_json<T: DeserializeOwned>(fetcher: &dyn Fetcher, path: &str) -> FetchResult<T> {
    let text = fetcher.fetch_text(path).await?;
    serde_json::from_str(&text).map_err(|source| FetchError::Json {
        path: path.to_string(),
        source,
    })
}

/// Strip leading `/` and `./` so every fetcher sees the same relative path
pub(crate) fn normalize_path(path: &str) -> String {
    let mut path = path.trim();
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            break;
        }
    }
    path.to_string()
}

/// In-memory documents keyed by relative path
#[derive(Debug, Default)]
pub struct StaticFetcher {
    documents: RwLock<HashMap<String, String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, path: &str, body: impl Into<String>) -> Self {
        self.documents
            .get_mut()
            .insert(normalize_path(path), body.into());
        self
    }

    /// Add or replace a document
    pub async fn insert(&self, path: &str, body: impl Into<String>) {
        self.documents
            .write()
            .await
            .insert(normalize_path(path), body.into());
    }

    /// Remove a document
    pub async fn remove(&self, path: &str) {
        self.documents.write().await.remove(&normalize_path(path));
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn fetch_text(&self, path: &str) -> FetchResult<String> {
        let key = normalize_path(path);
        self.documents
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or(FetchError::NotFound(key))
    }
}
