//! Configuration Routes
//!
//! - GET /api/v1/config/:key - One configuration value (dotted keys allowed)
//! - POST /api/v1/reload - Re-run the boot sequence

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::server::dto::{ConfigValueResponse, ReloadResponse};
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::ServerState;

/// GET /api/v1/config/:key
pub async fn get_config_value(
    State(state): State<Arc<ServerState>>,
    Path(key): Path<String>,
) -> ServerResult<Json<ConfigValueResponse>> {
    let value = state
        .app
        .config()
        .get(&key)?
        .ok_or_else(|| ServerError::NotFound(format!("Configuration key '{}' not set", key)))?;

    Ok(Json(ConfigValueResponse { key, value }))
}

/// POST /api/v1/reload
///
/// Reloads configuration, routes, project data and key bindings.
pub async fn reload(State(state): State<Arc<ServerState>>) -> ServerResult<Json<ReloadResponse>> {
    state.app.boot().await?;

    let response = ReloadResponse {
        status: "ok".to_string(),
        projects: state.app.projects().count().await,
        routes: state.app.router().routes().await.len(),
        reloaded_at: Utc::now(),
    };

    tracing::info!(projects = response.projects, routes = response.routes, "Reloaded");
    Ok(Json(response))
}
