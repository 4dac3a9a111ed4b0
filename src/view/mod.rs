//! Views
//!
//! A view is a UI component subtree with a single lifecycle entry point:
//! [`View::show`] is called with the route parameters and a container element,
//! and appends its content to the container.
//!
//! - [`AboutView`]: artist name, biography and links from the configuration
//! - [`GalleryView`]: project grid, optionally filtered by tag
//! - [`ProjectView`]: one project with image pager
//! - [`NotFoundView`]: fallback for unknown paths and projects

mod about;
mod element;
mod gallery;
mod not_found;
mod page;
mod project;

pub use about::AboutView;
pub use element::{escape_attr, escape_text, Element, Node};
pub use gallery::GalleryView;
pub use not_found::NotFoundView;
pub use page::{render_page, Page, DEFAULT_SITE_TITLE};
pub use project::ProjectView;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors a view can raise while showing
#[derive(Error, Debug)]
pub enum ViewError {
    /// The route matched but the thing it names does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration needed by the view is unavailable or malformed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for view operations
pub type ViewResult<T> = Result<T, ViewError>;

/// Path parameters captured by a route plus the request's query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteParams {
    params: HashMap<String, String>,
    query: HashMap<String, String>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a path parameter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder: parse a query string (`a=1&b=2`, without the `?`)
    pub fn with_query(mut self, query: &str) -> Self {
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            self.query.insert(decode(key), decode(value));
        }
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    /// Path parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Query parameter
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// A routable UI component
#[async_trait]
pub trait View: Send + Sync {
    /// Identifier used by the route table
    fn id(&self) -> &str;

    /// Page title for these parameters
    fn title(&self, params: &RouteParams) -> String {
        let _ = params;
        let mut chars = self.id().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Append this view's content to `container`
    async fn show(&self, params: &RouteParams, container: &mut Element) -> ViewResult<()>;
}

/// Link to a project page
pub fn project_href(name: &str) -> String {
    format!("/projects/{}", urlencoding::encode(name))
}

/// Link to a tag listing
pub fn tag_href(tag: &str) -> String {
    format!("/tags/{}", urlencoding::encode(tag))
}

/// Percent-decode a query component (`+` is a space), keeping the raw text if
/// it is not valid UTF-8
pub(crate) fn decode(raw: &str) -> String {
    decode_segment(&raw.replace('+', " "))
}

/// Percent-decode a path segment
pub(crate) fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
