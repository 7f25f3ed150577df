//! Shared test utilities for the mimili test suite.
//!
//! Provides a stub [`RouteSource`], canned views, and small filesystem
//! helpers so each module's tests can build a project in a `TempDir`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = StubSource::new(
//!     vec![RoutePattern::leaf("", "home")],
//!     echo_views("stub.views", &["home"]),
//! )
//! .with_fallback(fallback_views());
//! ```

use maud::html;
use std::path::Path;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::routing::{FALLBACK_ROUTES, FlatRoute, RouteError, RoutePattern, RouteSource, Views};
use crate::view::{self, Request, Response, View, ViewError};

// =========================================================================
// Filesystem
// =========================================================================

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Default config without fingerprinting, so static trees stay easy to count.
pub fn test_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.static_files.manifest = false;
    config
}

// =========================================================================
// Views
// =========================================================================

/// `<p>{path}</p>`
pub fn echo(request: &Request) -> Result<Response, ViewError> {
    Ok(view::html(html! { p { (view::request_path(request)) } }))
}

/// `<p>deferred {path}</p>`, as a deferred template.
pub fn deferred_echo(request: &Request) -> Result<Response, ViewError> {
    let path = view::request_path(request);
    Ok(view::template(move || Ok(html! { p { "deferred " (path) } })))
}

pub fn failing(_request: &Request) -> Result<Response, ViewError> {
    Err(ViewError::Template("boom".to_string()))
}

pub fn failing_template(_request: &Request) -> Result<Response, ViewError> {
    Ok(view::template(|| Err(ViewError::Template("late boom".to_string()))))
}

pub fn not_found_view(_request: &Request) -> Result<Response, ViewError> {
    Ok(view::not_found())
}

/// A module where every name maps to [`echo`].
pub fn echo_views(module: &str, names: &[&str]) -> Views {
    names
        .iter()
        .fold(Views::new(module), |views, name| views.with(*name, echo))
}

/// A complete `amor.views` stand-in for [`FALLBACK_ROUTES`].
pub fn fallback_views() -> Views {
    let names: Vec<&str> = FALLBACK_ROUTES.iter().map(|(_, name)| *name).collect();
    echo_views("amor.views", &names)
}

pub fn route(path: &str, view: impl View + 'static) -> FlatRoute {
    FlatRoute {
        path: path.to_string(),
        handler: "test".to_string(),
        view: Arc::new(view),
    }
}

// =========================================================================
// Route source
// =========================================================================

/// In-memory [`RouteSource`]. `patterns: None` behaves like a route table
/// that fails to load; `fallback: None` like a missing fallback module.
pub struct StubSource {
    pub patterns: Option<Vec<RoutePattern>>,
    pub views: Views,
    pub fallback: Option<Views>,
}

impl StubSource {
    pub fn new(patterns: Vec<RoutePattern>, views: Views) -> Self {
        Self {
            patterns: Some(patterns),
            views,
            fallback: None,
        }
    }

    pub fn broken() -> Self {
        Self {
            patterns: None,
            views: Views::new("stub.views"),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, views: Views) -> Self {
        self.fallback = Some(views);
        self
    }
}

impl RouteSource for StubSource {
    fn url_patterns(&self) -> Result<Vec<RoutePattern>, RouteError> {
        self.patterns
            .clone()
            .ok_or_else(|| RouteError::ModuleUnavailable("stub.urls".to_string()))
    }

    fn views(&self) -> Result<&Views, RouteError> {
        Ok(&self.views)
    }

    fn fallback_views(&self) -> Result<&Views, RouteError> {
        self.fallback
            .as_ref()
            .ok_or_else(|| RouteError::ModuleUnavailable("amor.views".to_string()))
    }
}
