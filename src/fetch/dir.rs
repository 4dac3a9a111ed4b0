//! Directory fetcher
//!
//! Serves documents from a site directory on disk. Paths are confined to the
//! directory: absolute paths and `..` components are rejected.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use super::{normalize_path, FetchError, FetchResult, Fetcher};

/// Reads documents from `<root>/<path>`
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Site root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> FetchResult<PathBuf> {
        let relative = normalize_path(path);
        let candidate = Path::new(&relative);

        let escapes = candidate
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if relative.is_empty() || escapes {
            return Err(FetchError::InvalidPath(path.to_string()));
        }

        Ok(self.root.join(candidate))
    }
}

#[async_trait]
impl Fetcher for DirFetcher {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn fetch_text(&self, path: &str) -> FetchResult<String> {
        let full = self.resolve(path)?;
        tracing::debug!(path = ?full, "Reading document");

        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(normalize_path(path)))
            }
            Err(source) => Err(FetchError::Io { path: full, source }),
        }
    }
}
