//! Folio Server
//!
//! Run with: cargo run --bin folio [settings.toml]
//!
//! Settings come from the given file, or the default locations, with
//! `FOLIO_*` environment overrides (see [`folio::settings`]). `RUST_LOG`
//! overrides the configured log level.

use anyhow::Context;
use folio::app::App;
use folio::logging;
use folio::server::{serve, ServerConfig, ServerState};
use folio::settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load_with_env(&path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load_default(),
    };

    logging::init_tracing(&settings.logging);
    tracing::info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        site = %settings.site.root,
        storage = %settings.storage.dir,
        ephemeral = settings.storage.ephemeral,
        "Settings loaded"
    );

    let app = Arc::new(App::new(&settings).context("assembling application")?);

    // A failed boot leaves the server up but not ready; POST /api/v1/reload retries
    if let Err(e) = app.boot().await {
        tracing::error!(error = %e, "Initial boot failed");
    }

    let mut server_config = ServerConfig::from(&settings.server);
    if !settings.site.is_remote() {
        let resources = PathBuf::from(&settings.site.root).join("resources");
        server_config = server_config.resources_dir(resources);
    }

    let state = ServerState::new(app, server_config);
    serve(state).await?;

    tracing::info!("Folio stopped");
    Ok(())
}
