//! The amor site: routes, views and templates.
//!
//! [`Site`] is the [`RouteSource`] the exporter walks. Its route table is
//! [`urlpatterns`] unless `routes.table` points at a TOML table file, in
//! which case that file is loaded on every discovery. The view module,
//! `amor.views`, doubles as the fallback module.

pub mod content;
pub mod templates;
pub mod views;

use crate::config::SiteConfig;
use crate::routing::{RouteError, RoutePattern, RouteSource, Views, load_table};
use crate::view::{Request, Response, View, ViewError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the view module, as reported in errors.
pub const VIEWS_MODULE: &str = "amor.views";

/// Values every template needs.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub title: String,
    pub language: String,
    pub static_url: String,
}

impl PageContext {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.site.title.clone(),
            language: config.site.language.clone(),
            static_url: config.static_files.url.clone(),
        }
    }
}

/// Built-in route table.
pub fn urlpatterns() -> Vec<RoutePattern> {
    vec![
        RoutePattern::leaf("", "home"),
        RoutePattern::leaf("playlists/", "playlists"),
        RoutePattern::group(
            "diary/",
            vec![
                RoutePattern::leaf("", "diary"),
                RoutePattern::leaf("<slug:slug>/", "diary_entry"),
            ],
        ),
        RoutePattern::leaf("proposal/", "proposal"),
        RoutePattern::group(
            "admin/",
            vec![
                RoutePattern::leaf("", "admin_index"),
                RoutePattern::leaf("login/", "admin_login"),
            ],
        ),
    ]
}

type ViewFn = fn(&PageContext, &Request) -> Result<Response, ViewError>;

fn bind(ctx: &Arc<PageContext>, view: ViewFn) -> impl View + 'static {
    let ctx = Arc::clone(ctx);
    move |request: &Request| view(&ctx, request)
}

/// Every view of the site, bound to a page context.
pub fn site_views(ctx: PageContext) -> Views {
    let ctx = Arc::new(ctx);
    let entries: [(&str, ViewFn); 7] = [
        ("home", views::home),
        ("playlists", views::playlists),
        ("diary", views::diary),
        ("diary_entry", views::diary_entry),
        ("proposal", views::proposal),
        ("admin_index", views::admin_index),
        ("admin_login", views::admin_login),
    ];
    let mut registry = Views::new(VIEWS_MODULE);
    for (name, view) in entries {
        registry.register(name, bind(&ctx, view));
    }
    registry
}

/// The amor application as seen by the exporter.
#[derive(Debug)]
pub struct Site {
    table: Option<PathBuf>,
    views: Views,
}

impl Site {
    /// Site configured from `mimili.toml`; a table path is resolved against
    /// `project`.
    pub fn new(config: &SiteConfig, project: &Path) -> Self {
        Self {
            table: config.routes.table.as_ref().map(|t| project.join(t)),
            views: site_views(PageContext::from_config(config)),
        }
    }
}

impl RouteSource for Site {
    fn url_patterns(&self) -> Result<Vec<RoutePattern>, RouteError> {
        match &self.table {
            Some(path) => load_table(path),
            None => Ok(urlpatterns()),
        }
    }

    fn views(&self) -> Result<&Views, RouteError> {
        Ok(&self.views)
    }

    fn fallback_views(&self) -> Result<&Views, RouteError> {
        Ok(&self.views)
    }
}
