//! Project Data Service
//!
//! Loads the gallery's project records and answers lookups by name and tag.
//!
//! The loaded list is replaced wholesale on every load: the fetch completes
//! first, then the new list is swapped in with a single assignment, so readers
//! see either the old list or the new one.

mod types;

pub use types::{Image, Project};

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::{ConfigError, ConfigStore};
use crate::fetch::{self, FetchError, Fetcher};

/// Resources directory used when the configuration has no `path.resources`
pub const DEFAULT_RESOURCES_PATH: &str = "resources";

/// Project data file, relative to the resources directory
pub const PROJECTS_FILE: &str = "data/images.json";

/// Errors that can occur while loading projects
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Failed to fetch projects: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to resolve resources path: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for project operations
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Owns the in-memory project list
pub struct ProjectService {
    fetcher: Arc<dyn Fetcher>,
    config: Arc<ConfigStore>,
    projects: RwLock<Arc<Vec<Project>>>,
}

impl ProjectService {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: Arc<ConfigStore>) -> Self {
        Self {
            fetcher,
            config,
            projects: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Path of the project data file, from `path.resources`
    pub fn data_path(&self) -> ProjectResult<String> {
        let resources = match self.config.get_str("path.resources") {
            Ok(Some(path)) => path,
            Ok(None) | Err(ConfigError::NotLoaded) => DEFAULT_RESOURCES_PATH.to_string(),
            Err(e) => return Err(e.into()),
        };

        Ok(format!("{}/{}", resources.trim_end_matches('/'), PROJECTS_FILE))
    }

    /// Load projects from the configured resources directory
    ///
    /// Returns the number of records loaded.
    pub async fn load_projects(&self) -> ProjectResult<usize> {
        let path = self.data_path()?;
        self.load_projects_from(&path).await
    }

    /// Load projects from an explicit document path
    pub async fn load_projects_from(&self, path: &str) -> ProjectResult<usize> {
        let loaded: Vec<Project> = fetch::fetch_json(self.fetcher.as_ref(), path).await?;
        let count = loaded.len();

        *self.projects.write().await = Arc::new(loaded);

        tracing::info!(path = %path, count, "Projects loaded");
        Ok(count)
    }

    /// Current project list
    pub async fn projects(&self) -> Arc<Vec<Project>> {
        Arc::clone(&*self.projects.read().await)
    }

    /// Number of loaded projects
    pub async fn count(&self) -> usize {
        self.projects.read().await.len()
    }

    /// First project named `name`
    pub async fn get_project(&self, name: &str) -> Option<Project> {
        self.projects
            .read()
            .await
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
            .cloned()
    }

    /// Names of all loaded projects, skipping unnamed records
    pub async fn get_project_names(&self) -> Vec<String> {
        self.projects
            .read()
            .await
            .iter()
            .filter_map(|p| p.name.clone())
            .collect()
    }

    /// All projects tagged with `tag`
    pub async fn get_projects_by_tag(&self, tag: &str) -> Vec<Project> {
        self.projects
            .read()
            .await
            .iter()
            .filter(|p| p.has_tag(tag))
            .cloned()
            .collect()
    }

    /// Every distinct tag across all projects
    pub async fn get_project_tags(&self) -> BTreeSet<String> {
        self.projects
            .read()
            .await
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_PATH;
    use crate::fetch::StaticFetcher;
    use crate::storage::MemoryStorage;

    const PROJECTS: &str = r#"[
        {"name": "A", "images": [{"url": "a1.jpg", "title": "A one"}], "tags": ["x"]},
        {"name": "B", "images": [], "tags": ["y", "x"]},
        {"images": [{"url": "orphan.jpg", "title": "Orphan"}], "tags": ["z"]},
        {"name": "C"},
        {"name": "A", "tags": ["duplicate"]}
    ]"#;

    async fn service_with(config: Option<&str>, files: &[(&str, &str)]) -> (ProjectService, Arc<StaticFetcher>) {
        let mut fetcher = StaticFetcher::new();
        if let Some(config) = config {
            fetcher = fetcher.with(CONFIG_PATH, config);
        }
        for (path, body) in files {
            fetcher = fetcher.with(path, *body);
        }
        let fetcher = Arc::new(fetcher);

        let store = Arc::new(ConfigStore::new(fetcher.clone(), Arc::new(MemoryStorage::new())));
        if config.is_some() {
            store.load(CONFIG_PATH).await.unwrap();
        }

        (ProjectService::new(fetcher.clone(), store), fetcher)
    }

    #[tokio::test]
    async fn test_spec_example() {
        let (service, _) = service_with(
            None,
            &[(
                "resources/data/images.json",
                r#"[{"name":"A","tags":["x"]},{"name":"B","tags":["y","x"]}]"#,
            )],
        )
        .await;

        service.load_projects().await.unwrap();

        let tagged: Vec<String> = service
            .get_projects_by_tag("x")
            .await
            .into_iter()
            .filter_map(|p| p.name)
            .collect();
        assert_eq!(tagged, vec!["A", "B"]);

        let tags: Vec<String> = service.get_project_tags().await.into_iter().collect();
        assert_eq!(tags, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_names_skip_unnamed() {
        let (service, _) = service_with(None, &[("resources/data/images.json", PROJECTS)]).await;

        assert_eq!(service.load_projects().await.unwrap(), 5);
        assert_eq!(service.count().await, 5);
        assert_eq!(service.get_project_names().await, vec!["A", "B", "C", "A"]);
    }

    #[tokio::test]
    async fn test_get_project_returns_first_match() {
        let (service, _) = service_with(None, &[("resources/data/images.json", PROJECTS)]).await;
        service.load_projects().await.unwrap();

        let a = service.get_project("A").await.unwrap();
        assert_eq!(a.tags, vec!["x"]);
        assert!(service.get_project("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_tag_queries() {
        let (service, _) = service_with(None, &[("resources/data/images.json", PROJECTS)]).await;
        service.load_projects().await.unwrap();

        assert!(service.get_projects_by_tag("nothing").await.is_empty());
        assert_eq!(service.get_projects_by_tag("z").await.len(), 1);

        let tags: Vec<String> = service.get_project_tags().await.into_iter().collect();
        assert_eq!(tags, vec!["duplicate", "x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_resources_path_from_config() {
        let (service, _) = service_with(
            Some(r#"{"path": {"resources": "assets/"}}"#),
            &[("assets/data/images.json", r#"[{"name": "Only"}]"#)],
        )
        .await;

        assert_eq!(service.data_path().unwrap(), "assets/data/images.json");
        service.load_projects().await.unwrap();
        assert_eq!(service.get_project_names().await, vec!["Only"]);
    }

    #[tokio::test]
    async fn test_reload_replaces_list() {
        let (service, fetcher) = service_with(None, &[("resources/data/images.json", PROJECTS)]).await;
        service.load_projects().await.unwrap();
        let before = service.projects().await;

        fetcher
            .insert("resources/data/images.json", r#"[{"name": "New", "tags": ["n"]}]"#)
            .await;
        service.load_projects().await.unwrap();

        assert_eq!(service.get_project_names().await, vec!["New"]);
        // Earlier snapshots are unaffected
        assert_eq!(before.len(), 5);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_list() {
        let (service, fetcher) = service_with(None, &[("resources/data/images.json", PROJECTS)]).await;
        service.load_projects().await.unwrap();

        fetcher.insert("resources/data/images.json", "{ broken").await;
        let err = service.load_projects().await.unwrap_err();
        assert!(matches!(err, ProjectError::Fetch(FetchError::Json { .. })));
        assert_eq!(service.count().await, 5);
    }

    #[tokio::test]
    async fn test_empty_before_load() {
        let (service, _) = service_with(None, &[]).await;
        assert!(service.get_project_names().await.is_empty());
        assert!(service.get_project_tags().await.is_empty());
        assert!(service.get_project("A").await.is_none());
    }
}
