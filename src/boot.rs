//! Boot Sequence
//!
//! Startup runs three loaders strictly in order: configuration, resources,
//! keyboard. Each loader's [`Loader::start`] is awaited before the next one
//! begins. The first failure aborts the sequence; later loaders never start
//! and nothing is retried.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::config::{ConfigError, ConfigStore};
use crate::keyboard::{KeyCommand, Keyboard};
use crate::projects::{ProjectError, ProjectService};
use crate::router::{RouteError, Router};

/// Boot errors
#[derive(Error, Debug)]
pub enum BootError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Project data error: {0}")]
    Projects(#[from] ProjectError),

    #[error("Routing error: {0}")]
    Routes(#[from] RouteError),

    #[error("Boot stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: Box<BootError>,
    },
}

/// Result type alias for boot operations
pub type BootResult<T> = Result<T, BootError>;

/// One startup stage
#[async_trait]
pub trait Loader: Send + Sync {
    fn name(&self) -> &str;

    async fn start(&self) -> BootResult<()>;
}

/// Loads the configuration document and installs the route table
pub struct ConfigLoader {
    config: Arc<ConfigStore>,
    router: Arc<Router>,
    path: String,
}

impl ConfigLoader {
    pub fn new(config: Arc<ConfigStore>, router: Arc<Router>, path: impl Into<String>) -> Self {
        Self {
            config,
            router,
            path: path.into(),
        }
    }
}

#[async_trait]
impl Loader for ConfigLoader {
    fn name(&self) -> &str {
        "configuration"
    }

    async fn start(&self) -> BootResult<()> {
        if let Err(e) = self.config.load(&self.path).await {
            tracing::error!(path = %self.path, error = %e, "Failed to load configuration");
            return Err(e.into());
        }

        let views: Option<HashMap<String, String>> = self.config.get_as("views")?;
        let installed = match views {
            Some(table) if !table.is_empty() => self.router.install_routes(table).await?,
            _ => self.router.install_default_routes().await?,
        };

        tracing::info!(path = %self.path, routes = installed, "Configuration loaded");
        Ok(())
    }
}

/// Loads the project data file
pub struct ResourceLoader {
    projects: Arc<ProjectService>,
}

impl ResourceLoader {
    pub fn new(projects: Arc<ProjectService>) -> Self {
        Self { projects }
    }
}

#[async_trait]
impl Loader for ResourceLoader {
    fn name(&self) -> &str {
        "resources"
    }

    async fn start(&self) -> BootResult<()> {
        self.projects.load_projects().await?;
        Ok(())
    }
}

/// Applies configured key bindings over the defaults
pub struct KeyboardLoader {
    config: Arc<ConfigStore>,
    keyboard: Arc<Keyboard>,
}

impl KeyboardLoader {
    pub fn new(config: Arc<ConfigStore>, keyboard: Arc<Keyboard>) -> Self {
        Self { config, keyboard }
    }
}

#[async_trait]
impl Loader for KeyboardLoader {
    fn name(&self) -> &str {
        "keyboard"
    }

    async fn start(&self) -> BootResult<()> {
        let overrides: HashMap<String, KeyCommand> =
            self.config.get_as("keyboard")?.unwrap_or_default();
        self.keyboard.load_bindings(overrides).await;
        Ok(())
    }
}

/// Ordered list of loaders
pub struct BootSequence {
    stages: Vec<Arc<dyn Loader>>,
}

impl BootSequence {
    /// The standard configuration, resources, keyboard order
    pub fn new(config: ConfigLoader, resources: ResourceLoader, keyboard: KeyboardLoader) -> Self {
        Self::from_stages(vec![Arc::new(config), Arc::new(resources), Arc::new(keyboard)])
    }

    pub fn from_stages(stages: Vec<Arc<dyn Loader>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Start every stage in order, stopping at the first failure
    pub async fn run(&self) -> BootResult<()> {
        let started = Instant::now();

        for stage in &self.stages {
            let name = stage.name();
            tracing::debug!(stage = %name, "Starting boot stage");

            if let Err(e) = stage.start().await {
                tracing::error!(stage = %name, error = %e, "Boot aborted");
                return Err(BootError::Stage {
                    stage: name.to_string(),
                    source: Box::new(e),
                });
            }
        }

        tracing::info!(
            stages = self.stages.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Boot complete"
        );
        Ok(())
    }
}
