//! Application
//!
//! [`App`] is the composition root. It builds exactly one instance of every
//! service in dependency order (fetcher and storage, then configuration, then
//! the services that read configuration) and hands out shared references.
//! Nothing is registered globally; whoever needs a service gets it from the
//! `App` that owns it.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::boot::{BootError, BootSequence, ConfigLoader, KeyboardLoader, ResourceLoader};
use crate::config::{ConfigError, ConfigStore};
use crate::fetch::{DirFetcher, FetchError, Fetcher, HttpFetcher};
use crate::keyboard::{KeyCommand, Keyboard};
use crate::projects::ProjectService;
use crate::router::{Navigation, RouteError, Router};
use crate::settings::Settings;
use crate::signal::Action;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
use crate::view::{
    AboutView, Element, GalleryView, NotFoundView, Page, ProjectView, RouteParams, View,
    ViewError, DEFAULT_SITE_TITLE,
};

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Fetcher setup failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Boot failed: {0}")]
    Boot(#[from] BootError),

    #[error("Routing error: {0}")]
    Route(#[from] RouteError),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// A rendered HTML page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub status: u16,
    pub title: String,
    pub html: String,
}

impl RenderedPage {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

pub struct App {
    fetcher: Arc<dyn Fetcher>,
    storage: Arc<dyn KeyValueStorage>,
    config: Arc<ConfigStore>,
    projects: Arc<ProjectService>,
    keyboard: Arc<Keyboard>,
    router: Arc<Router>,
    config_path: String,
    ready: AtomicBool,
}

impl App {
    /// Build the application from settings
    pub fn new(settings: &Settings) -> AppResult<Self> {
        let fetcher: Arc<dyn Fetcher> = if settings.site.is_remote() {
            Arc::new(HttpFetcher::new(
                settings.site.root.as_str(),
                settings.site.request_timeout_ms,
            )?)
        } else {
            Arc::new(DirFetcher::new(settings.site.root.as_str()))
        };

        let storage: Arc<dyn KeyValueStorage> = if settings.storage.ephemeral {
            Arc::new(MemoryStorage::new())
        } else {
            Arc::new(FileStorage::open(Path::new(&settings.storage.dir))?)
        };

        Ok(Self::from_parts(fetcher, storage, &settings.site.config_path))
    }

    /// Build the application around an existing fetcher and storage
    pub fn from_parts(
        fetcher: Arc<dyn Fetcher>,
        storage: Arc<dyn KeyValueStorage>,
        config_path: &str,
    ) -> Self {
        let config = Arc::new(ConfigStore::new(Arc::clone(&fetcher), Arc::clone(&storage)));
        let projects = Arc::new(ProjectService::new(Arc::clone(&fetcher), Arc::clone(&config)));
        let keyboard = Arc::new(Keyboard::new());

        let mut router = Router::new();
        router.register_view(Arc::new(AboutView::new(Arc::clone(&config))));
        router.register_view(Arc::new(GalleryView::new(Arc::clone(&projects))));
        router.register_view(Arc::new(ProjectView::new(
            Arc::clone(&projects),
            Arc::clone(&keyboard),
        )));
        router.register_view(Arc::new(NotFoundView));

        tracing::info!(site = %fetcher.describe(), config = %config_path, "Application assembled");

        Self {
            fetcher,
            storage,
            config,
            projects,
            keyboard,
            router: Arc::new(router),
            config_path: config_path.to_string(),
            ready: AtomicBool::new(false),
        }
    }

    pub fn fetcher(&self) -> Arc<dyn Fetcher> {
        Arc::clone(&self.fetcher)
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        Arc::clone(&self.storage)
    }

    pub fn config(&self) -> Arc<ConfigStore> {
        Arc::clone(&self.config)
    }

    pub fn projects(&self) -> Arc<ProjectService> {
        Arc::clone(&self.projects)
    }

    pub fn keyboard(&self) -> Arc<Keyboard> {
        Arc::clone(&self.keyboard)
    }

    pub fn router(&self) -> Arc<Router> {
        Arc::clone(&self.router)
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    /// Whether the last boot completed
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Run the boot sequence
    ///
    /// Calling it again reloads configuration and project data. The app is
    /// not ready while a boot is failing.
    pub async fn boot(&self) -> AppResult<()> {
        self.connect_logging().await;

        let sequence = BootSequence::new(
            ConfigLoader::new(self.config(), self.router(), self.config_path.as_str()),
            ResourceLoader::new(self.projects()),
            KeyboardLoader::new(self.config(), self.keyboard()),
        );

        if let Err(e) = sequence.run().await {
            self.ready.store(false, Ordering::Release);
            return Err(e.into());
        }

        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn connect_logging(&self) {
        // Same source and origin each boot, so reconnecting overwrites
        self.router
            .navigated()
            .connect(Action::new("log_navigation", "app", |nav: Navigation| async move {
                tracing::info!(path = %nav.path, view = %nav.view, title = %nav.title, "Navigated");
                Ok(())
            }))
            .await;

        self.keyboard
            .commands()
            .connect(Action::new("log_command", "app", |command: KeyCommand| async move {
                tracing::debug!(command = %command, "Keyboard command");
                Ok(())
            }))
            .await;
    }

    fn site_title(&self) -> String {
        match self.config.get_str("site.title") {
            Ok(Some(title)) => title,
            _ => DEFAULT_SITE_TITLE.to_string(),
        }
    }

    /// Render the page for a request path (query string allowed)
    ///
    /// Unknown routes and unknown projects render the not-found page with
    /// status 404. Other failures are returned.
    pub async fn render(&self, path: &str) -> AppResult<RenderedPage> {
        let mut main = Element::new("main");

        match self.router.show(path, &mut main).await {
            Ok(navigation) => Ok(self.page(200, navigation.title, main)),
            Err(RouteError::NotFound(_)) | Err(RouteError::View(ViewError::NotFound(_))) => {
                tracing::debug!(path = %path, "Rendering not-found page");
                self.render_not_found(path).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn render_not_found(&self, path: &str) -> AppResult<RenderedPage> {
        let path_only = path.split_once('?').map(|(p, _)| p).unwrap_or(path);
        let params = RouteParams::new().with("path", path_only);

        let mut main = Element::new("main");
        NotFoundView
            .show(&params, &mut main)
            .await
            .map_err(RouteError::from)?;

        Ok(self.page(404, NotFoundView.title(&params), main))
    }

    fn page(&self, status: u16, title: String, main: Element) -> RenderedPage {
        let html = Page::new(title.as_str(), main)
            .site_title(self.site_title())
            .render();
        RenderedPage {
            status,
            title,
            html,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_PATH;
    use crate::fetch::StaticFetcher;

    const CONFIG: &str = r#"{
        "site": {"title": "Studio Sol"},
        "about": {"name": "Mira Sol", "bio": "Painter."},
        "keyboard": {"n": "next_image"}
    }"#;

    const PROJECTS: &str = r#"[
        {"name": "A", "tags": ["x"], "images": [{"url": "a1.jpg", "title": "One"}, {"url": "a2.jpg", "title": "Two"}]},
        {"name": "B", "tags": ["y", "x"]}
    ]"#;

    fn app_with(fetcher: StaticFetcher) -> App {
        App::from_parts(Arc::new(fetcher), Arc::new(MemoryStorage::new()), CONFIG_PATH)
    }

    fn site() -> StaticFetcher {
        StaticFetcher::new()
            .with(CONFIG_PATH, CONFIG)
            .with("resources/data/images.json", PROJECTS)
    }

    #[test]
    fn test_accessors_share_instances() {
        let app = app_with(site());

        assert!(Arc::ptr_eq(&app.config(), &app.config()));
        assert!(Arc::ptr_eq(&app.projects(), &app.projects()));
        assert!(Arc::ptr_eq(&app.keyboard(), &app.keyboard()));
        assert!(Arc::ptr_eq(&app.router(), &app.router()));
        assert!(!app.is_ready());
    }

    #[tokio::test]
    async fn test_boot_and_render() {
        let app = app_with(site());
        app.boot().await.unwrap();
        assert!(app.is_ready());

        let home = app.render("/").await.unwrap();
        assert_eq!(home.status, 200);
        assert!(home.html.contains("<h1>Mira Sol</h1>"));
        assert!(home.html.contains("<title>About | Studio Sol</title>"));

        let project = app.render("/projects/A?image=1").await.unwrap();
        assert_eq!(project.title, "A");
        assert!(project.html.contains("<figcaption>Two</figcaption>"));
        assert!(project.html.contains("class=\"prev\""));
        assert!(!project.html.contains("class=\"next\""));

        let first = app.render("/projects/A").await.unwrap();
        assert!(first.html.contains("accesskey=\"n\""));

        let tagged = app.render("/tags/x").await.unwrap();
        assert!(tagged.html.contains("/projects/A"));
        assert!(tagged.html.contains("/projects/B"));
    }

    #[tokio::test]
    async fn test_not_found_pages() {
        let app = app_with(site());
        app.boot().await.unwrap();

        let page = app.render("/nowhere?x=1").await.unwrap();
        assert!(page.is_not_found());
        assert!(page.html.contains("<code>/nowhere</code>"));

        let page = app.render("/projects/Z").await.unwrap();
        assert!(page.is_not_found());
    }

    #[tokio::test]
    async fn test_failed_boot_is_not_ready() {
        let app = app_with(StaticFetcher::new().with(CONFIG_PATH, CONFIG));

        let err = app.boot().await.unwrap_err();
        assert!(matches!(err, AppError::Boot(BootError::Stage { ref stage, .. }) if stage == "resources"));
        assert!(!app.is_ready());
    }

    #[tokio::test]
    async fn test_reboot_keeps_one_logging_listener() {
        let app = app_with(site());
        app.boot().await.unwrap();
        app.boot().await.unwrap();

        assert_eq!(app.router().navigated().listener_count().await, 1);
        assert_eq!(app.keyboard().commands().listener_count().await, 1);
    }

    #[tokio::test]
    async fn test_new_with_site_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), CONFIG).unwrap();
        std::fs::create_dir_all(dir.path().join("resources/data")).unwrap();
        std::fs::write(dir.path().join("resources/data/images.json"), PROJECTS).unwrap();

        let mut settings = Settings::default();
        settings.site.root = dir.path().to_string_lossy().to_string();
        settings.storage.dir = dir.path().join("storage").to_string_lossy().to_string();

        let app = App::new(&settings).unwrap();
        app.boot().await.unwrap();

        assert_eq!(app.projects().count().await, 2);
        assert!(dir.path().join("storage/local_storage.json").exists());
    }
}
