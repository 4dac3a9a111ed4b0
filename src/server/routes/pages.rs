//! Page Routes
//!
//! Every path not claimed by the API or health routes is rendered as an HTML
//! page through the view router.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::server::error::ServerResult;
use crate::server::state::ServerState;

/// GET /*
pub async fn show_page(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
) -> ServerResult<Response> {
    if method != Method::GET && method != Method::HEAD {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let page = state.app.render(target).await?;
    let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::OK);

    Ok((status, Html(page.html)).into_response())
}
