//! Data Transfer Objects
//!
//! Response and query types for the JSON endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::projects::Project;

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" once booted, "starting" before
    pub status: String,
    pub ready: bool,
    pub projects: usize,
    pub routes: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Query parameters for the project list
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    /// Only projects carrying this tag
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub total: usize,
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct TagListResponse {
    pub total: usize,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigValueResponse {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// Always "ok"; failures are error responses
    pub status: String,
    pub projects: usize,
    pub routes: usize,
    pub reloaded_at: chrono::DateTime<chrono::Utc>,
}
