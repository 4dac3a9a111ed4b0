//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (boot completed)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::server::dto::HealthResponse;
use crate::server::state::ServerState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// 200 once the boot sequence has completed, 503 before that or after a
/// failed reload.
pub async fn readiness(State(state): State<Arc<ServerState>>) -> StatusCode {
    if state.app.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    let ready = state.app.is_ready();

    Json(HealthResponse {
        status: if ready { "healthy" } else { "starting" }.to_string(),
        ready,
        projects: state.app.projects().count().await,
        routes: state.app.router().routes().await.len(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
