//! Folio HTTP Server
//!
//! Serves the rendered site plus a small JSON API, built with Axum.
//!
//! # Endpoints
//!
//! ## Projects
//! - `GET /api/v1/projects` - List projects (`?tag=` filters)
//! - `GET /api/v1/projects/:name` - Get one project
//! - `GET /api/v1/tags` - List tags
//!
//! ## Configuration
//! - `GET /api/v1/config/:key` - Read a configuration value
//! - `POST /api/v1/reload` - Re-run the boot sequence
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## Pages
//! - `GET /resources/*` - Static files, when a resources directory is set
//! - `GET /*` - Any other path renders the routed view (404 page when unknown)

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::{ServerConfig, ServerState};

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
}

/// Build the router with all routes and middleware
pub fn build_router(state: ServerState) -> Router {
    let api_routes = Router::new()
        .route("/projects", get(routes::projects::list_projects))
        .route("/projects/:name", get(routes::projects::get_project))
        .route("/tags", get(routes::projects::list_tags))
        .route("/config/:key", get(routes::config::get_config_value))
        .route("/reload", post(routes::config::reload));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let resources_dir = state.config.resources_dir.clone();
    let shared_state = Arc::new(state);

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes);
    if let Some(dir) = resources_dir {
        tracing::info!(dir = ?dir, "Serving static resources");
        router = router.nest_service("/resources", ServeDir::new(dir));
    }

    router
        .fallback(routes::pages::show_page)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Start the server and run until a shutdown signal arrives
pub async fn serve(state: ServerState) -> ServerResult<()> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Folio listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Folio shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
