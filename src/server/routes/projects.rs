//! Project Routes
//!
//! - GET /api/v1/projects - List projects, optionally `?tag=`
//! - GET /api/v1/projects/:name - One project by name
//! - GET /api/v1/tags - Every distinct tag

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::server::dto::{ProjectListResponse, ProjectQuery, TagListResponse};
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::ServerState;
use crate::projects::Project;

/// GET /api/v1/projects
pub async fn list_projects(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ProjectQuery>,
) -> Json<ProjectListResponse> {
    let service = state.app.projects();
    let projects = match query.tag.as_deref() {
        Some(tag) => service.get_projects_by_tag(tag).await,
        None => service.projects().await.as_ref().clone(),
    };

    Json(ProjectListResponse {
        total: projects.len(),
        projects,
    })
}

/// GET /api/v1/projects/:name
pub async fn get_project(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> ServerResult<Json<Project>> {
    state
        .app
        .projects()
        .get_project(&name)
        .await
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("Project '{}' not found", name)))
}

/// GET /api/v1/tags
pub async fn list_tags(State(state): State<Arc<ServerState>>) -> Json<TagListResponse> {
    let tags: Vec<String> = state
        .app
        .projects()
        .get_project_tags()
        .await
        .into_iter()
        .collect();

    Json(TagListResponse {
        total: tags.len(),
        tags,
    })
}
