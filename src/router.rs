//! View Router
//!
//! Maps request paths to registered views. Routes are `/`-separated patterns
//! where a `:name` segment captures a parameter. When several patterns match,
//! the one with the most literal segments wins; ties go to the pattern that
//! sorts first.
//!
//! The route table comes from the configuration `views` key (pattern to view
//! id) and is replaced wholesale on every install. Each successful
//! [`Router::show`] emits a [`Navigation`] on [`Router::navigated`].

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::signal::{Signal, SignalError};
use crate::view::{self, Element, RouteParams, View, ViewError};

/// Default route table
pub fn default_routes() -> Vec<(String, String)> {
    [
        ("/", "about"),
        ("/projects", "gallery"),
        ("/projects/:name", "project"),
        ("/tags/:tag", "gallery"),
    ]
    .into_iter()
    .map(|(pattern, view)| (pattern.to_string(), view.to_string()))
    .collect()
}

/// Routing errors
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("No route matches '{0}'")]
    NotFound(String),

    #[error("Route '{pattern}' names unknown view '{view}'")]
    UnknownView { pattern: String, view: String },

    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("View error: {0}")]
    View(#[from] ViewError),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),
}

/// Result type alias for routing operations
pub type RouteResult<T> = Result<T, RouteError>;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pattern: String,
    view: String,
    segments: Vec<Segment>,
}

impl Route {
    /// Compile a pattern for the given view id
    pub fn parse(pattern: &str, view: &str) -> RouteResult<Self> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut segments = Vec::new();
        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            match part.strip_prefix(':') {
                Some("") => return Err(invalid("empty parameter name")),
                Some(name) => {
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(p) if p == name))
                    {
                        return Err(invalid("duplicate parameter name"));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            view: view.to_string(),
            segments,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    fn matches(&self, parts: &[String]) -> Option<RouteParams> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.insert(name.as_str(), part.as_str()),
            }
        }
        Some(params)
    }
}

/// Emitted after a view has been shown
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub path: String,
    pub view: String,
    pub title: String,
    pub params: RouteParams,
}

pub struct Router {
    views: HashMap<String, Arc<dyn View>>,
    routes: RwLock<Vec<Route>>,
    navigated: Signal<Navigation>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
            routes: RwLock::new(Vec::new()),
            navigated: Signal::new("router.navigated"),
        }
    }

    /// Register a view under its id; replaces a view with the same id
    pub fn register_view(&mut self, view: Arc<dyn View>) {
        let id = view.id().to_string();
        tracing::debug!(view = %id, "View registered");
        self.views.insert(id, view);
    }

    pub fn view(&self, id: &str) -> Option<Arc<dyn View>> {
        self.views.get(id).cloned()
    }

    /// Signal emitted after every successful [`Router::show`]
    pub fn navigated(&self) -> &Signal<Navigation> {
        &self.navigated
    }

    fn compile(&self, pattern: &str, view: &str) -> RouteResult<Route> {
        if !self.views.contains_key(view) {
            return Err(RouteError::UnknownView {
                pattern: pattern.to_string(),
                view: view.to_string(),
            });
        }
        Route::parse(pattern, view)
    }

    /// Add one route, replacing an existing route with the same pattern
    pub async fn add_route(&self, pattern: &str, view: &str) -> RouteResult<()> {
        let route = self.compile(pattern, view)?;

        let mut routes = self.routes.write().await;
        routes.retain(|r| r.pattern != route.pattern);
        routes.push(route);
        routes.sort_by(|a, b| a.pattern.cmp(&b.pattern));
        Ok(())
    }

    /// Replace the whole route table
    ///
    /// Nothing is installed if any entry is invalid.
    pub async fn install_routes<I>(&self, table: I) -> RouteResult<usize>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut compiled = table
            .into_iter()
            .map(|(pattern, view)| self.compile(&pattern, &view))
            .collect::<RouteResult<Vec<_>>>()?;
        compiled.sort_by(|a, b| a.pattern.cmp(&b.pattern));
        compiled.dedup_by(|a, b| a.pattern == b.pattern);

        let count = compiled.len();
        *self.routes.write().await = compiled;

        tracing::info!(routes = count, "Routes installed");
        Ok(count)
    }

    pub async fn install_default_routes(&self) -> RouteResult<usize> {
        self.install_routes(default_routes()).await
    }

    /// Installed routes as (pattern, view id)
    pub async fn routes(&self) -> Vec<(String, String)> {
        self.routes
            .read()
            .await
            .iter()
            .map(|r| (r.pattern.clone(), r.view.clone()))
            .collect()
    }

    /// Find the route for `path` (which may carry a query string)
    pub async fn resolve(&self, path: &str) -> RouteResult<(Route, RouteParams)> {
        let (path_only, query) = path.split_once('?').unwrap_or((path, ""));
        let parts: Vec<String> = path_only
            .split('/')
            .filter(|s| !s.is_empty())
            .map(view::decode_segment)
            .collect();

        let routes = self.routes.read().await;
        let mut best: Option<(&Route, RouteParams)> = None;
        for route in routes.iter() {
            if let Some(params) = route.matches(&parts) {
                let better = match &best {
                    Some((current, _)) => route.literal_count() > current.literal_count(),
                    None => true,
                };
                if better {
                    best = Some((route, params));
                }
            }
        }

        match best {
            Some((route, params)) => Ok((route.clone(), params.with_query(query))),
            None => Err(RouteError::NotFound(path_only.to_string())),
        }
    }

    /// Resolve `path`, show its view into `container` and announce it
    pub async fn show(&self, path: &str, container: &mut Element) -> RouteResult<Navigation> {
        let (route, params) = self.resolve(path).await?;
        let view = self
            .views
            .get(route.view())
            .ok_or_else(|| RouteError::UnknownView {
                pattern: route.pattern().to_string(),
                view: route.view().to_string(),
            })?;

        view.show(&params, container).await?;

        let navigation = Navigation {
            path: path.to_string(),
            view: route.view().to_string(),
            title: view.title(&params),
            params,
        };
        self.navigated.emit(navigation.clone()).await?;

        tracing::debug!(path = %path, view = %navigation.view, "View shown");
        Ok(navigation)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Action;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo(&'static str);

    #[async_trait]
    impl View for Echo {
        fn id(&self) -> &str {
            self.0
        }

        async fn show(&self, params: &RouteParams, container: &mut Element) -> view::ViewResult<()> {
            let mut p = Element::new("p").text(self.0);
            if let Some(name) = params.get("name") {
                p.push(format!(":{}", name));
            }
            container.push(p);
            Ok(())
        }
    }

    struct Missing;

    #[async_trait]
    impl View for Missing {
        fn id(&self) -> &str {
            "project"
        }

        async fn show(&self, _params: &RouteParams, _container: &mut Element) -> view::ViewResult<()> {
            Err(ViewError::NotFound("project".to_string()))
        }
    }

    fn router() -> Router {
        let mut router = Router::new();
        router.register_view(Arc::new(Echo("about")));
        router.register_view(Arc::new(Echo("gallery")));
        router.register_view(Arc::new(Echo("project")));
        router
    }

    #[tokio::test]
    async fn test_default_routes() {
        let router = router();
        assert_eq!(router.install_default_routes().await.unwrap(), 4);

        let (route, _) = router.resolve("/").await.unwrap();
        assert_eq!(route.view(), "about");

        let (route, params) = router.resolve("/projects/Harbour%20Lights?image=2").await.unwrap();
        assert_eq!(route.view(), "project");
        assert_eq!(params.get("name"), Some("Harbour Lights"));
        assert_eq!(params.query("image"), Some("2"));

        let (route, params) = router.resolve("/tags/ink/").await.unwrap();
        assert_eq!(route.pattern(), "/tags/:tag");
        assert_eq!(params.get("tag"), Some("ink"));
    }

    #[tokio::test]
    async fn test_literal_segments_win() {
        let router = router();
        router.add_route("/projects/:name", "project").await.unwrap();
        router.add_route("/projects/featured", "gallery").await.unwrap();

        let (route, _) = router.resolve("/projects/featured").await.unwrap();
        assert_eq!(route.view(), "gallery");
        let (route, _) = router.resolve("/projects/salt").await.unwrap();
        assert_eq!(route.view(), "project");
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let router = router();
        router.install_default_routes().await.unwrap();

        let err = router.resolve("/nope/deeper/still").await.unwrap_err();
        assert!(matches!(err, RouteError::NotFound(p) if p == "/nope/deeper/still"));
    }

    #[tokio::test]
    async fn test_install_rejects_unknown_view() {
        let router = router();
        router.install_default_routes().await.unwrap();

        let err = router
            .install_routes(vec![
                ("/".to_string(), "about".to_string()),
                ("/shop".to_string(), "shop".to_string()),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::UnknownView { view, .. } if view == "shop"));

        // previous table is untouched
        assert_eq!(router.routes().await.len(), 4);
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(Route::parse("projects", "gallery").is_err());
        assert!(Route::parse("/projects/:", "project").is_err());
        assert!(Route::parse("/:a/:a", "project").is_err());
        assert!(Route::parse("/", "about").is_ok());
    }

    #[tokio::test]
    async fn test_show_emits_navigation() {
        let router = router();
        router.install_default_routes().await.unwrap();

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        router
            .navigated()
            .connect(Action::new("count", "test", move |nav: Navigation| {
                let counter = Arc::clone(&counter);
                async move {
                    assert_eq!(nav.view, "project");
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }))
            .await;

        let mut main = Element::new("main");
        let nav = router.show("/projects/salt", &mut main).await.unwrap();

        assert_eq!(nav.title, "Project");
        assert_eq!(main.text_content(), "project:salt");
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_view_failure_skips_navigation() {
        let mut router = router();
        router.register_view(Arc::new(Missing));
        router.install_default_routes().await.unwrap();

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        router
            .navigated()
            .connect(Action::new("count", "test", move |_nav: Navigation| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }))
            .await;

        let mut main = Element::new("main");
        let err = router.show("/projects/nope", &mut main).await.unwrap_err();

        assert!(matches!(err, RouteError::View(ViewError::NotFound(_))));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
