//! # Folio
//!
//! A small framework for an artist's portfolio site: a signal/slot event bus,
//! a configuration store over local storage, a three-stage boot sequence, a
//! project data service and routed views rendered to HTML.
//!
//! ## Modules
//!
//! - [`signal`]: named publish/subscribe channels with identified listeners
//! - [`config`]: JSON configuration kept in a local-storage slot
//! - [`storage`]: local-storage backends (memory, JSON file)
//! - [`fetch`]: document fetchers (HTTP, directory, in-memory)
//! - [`projects`]: project list loaded from `data/images.json`
//! - [`view`] and [`router`]: view components and path routing
//! - [`keyboard`]: key bindings dispatched as commands
//! - [`boot`]: ordered, fail-fast startup
//! - [`app`]: composition root owning one instance of every service
//! - [`server`]: Axum server for pages and the JSON API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio::app::App;
//! use folio::settings::Settings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut settings = Settings::default();
//!     settings.site.root = "./site".to_string();
//!
//!     let app = App::new(&settings)?;
//!     app.boot().await?;
//!
//!     let page = app.render("/projects").await?;
//!     println!("{}", page.html);
//!
//!     for name in app.projects().get_project_names().await {
//!         println!("{}", name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod boot;
pub mod config;
pub mod fetch;
pub mod hash;
pub mod keyboard;
pub mod logging;
pub mod projects;
pub mod router;
pub mod server;
pub mod settings;
pub mod signal;
pub mod storage;
pub mod view;

pub use app::{App, AppError, AppResult, RenderedPage};
pub use config::{ConfigError, ConfigStore};
pub use projects::{Image, Project, ProjectService};
pub use settings::Settings;
pub use signal::{Action, ListenerId, Signal};
