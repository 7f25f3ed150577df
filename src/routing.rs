//! Route discovery.
//!
//! A route table is a tree of [`RoutePattern`]s: leaves map a path fragment to
//! a view name, groups prefix a nested list of patterns. Discovery flattens
//! the tree depth-first into concrete [`FlatRoute`]s, keeping declaration
//! order:
//!
//! ```text
//! ""            -> home          /
//! "playlists/"  -> playlists     /playlists/
//! "diary/"      (group)
//!     ""        -> diary         /diary/
//!     "<slug>/" -> diary_entry   skipped, parameterized
//! "admin/"      -> admin         dropped, excluded prefix
//! ```
//!
//! Leaves whose full path contains `<` (a parameter capture) or `(` (a regex
//! group) cannot be rendered without arguments and are skipped. The check is
//! a literal character match on the raw string, so a static path containing a
//! parenthesis is skipped too.
//!
//! ## Fallback
//!
//! When the table cannot be loaded or one of its views does not resolve,
//! [`discover_or_fallback`] switches to [`FALLBACK_ROUTES`], resolved against
//! the source's fallback view module. Only if that also fails does discovery
//! fail as a whole.
//!
//! ## Table files
//!
//! Tables can also be loaded from TOML with [`load_table`]:
//!
//! ```toml
//! [[route]]
//! path = ""
//! view = "home"
//!
//! [[route]]
//! path = "diary/"
//! include = [
//!     { path = "", view = "diary" },
//!     { path = "<slug>/", view = "diary_entry" },
//! ]
//! ```

use crate::view::View;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Paths exported when the route table is unusable, with the view each one
/// resolves to in the fallback module.
pub const FALLBACK_ROUTES: [(&str, &str); 4] = [
    ("/", "home"),
    ("/playlists/", "playlists"),
    ("/diary/", "diary"),
    ("/proposal/", "proposal"),
];

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("IO error reading route table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed route table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("view '{name}' not found in {module}")]
    UnresolvedView { module: String, name: String },
    /// Returned by [`RouteSource`] implementors whose route table or view
    /// module cannot be provided at all.
    #[error("module {0} is unavailable")]
    ModuleUnavailable(String),
    #[error(
        "could not discover routes automatically ({discovery}) and the fallback module is unusable: {fallback}"
    )]
    FallbackUnavailable {
        discovery: Box<RouteError>,
        fallback: Box<RouteError>,
    },
}

/// A node of the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutePattern {
    /// A path prefix applied to a nested list of patterns.
    Group {
        #[serde(rename = "path")]
        fragment: String,
        #[serde(rename = "include")]
        children: Vec<RoutePattern>,
    },
    /// A terminal route.
    Leaf {
        #[serde(rename = "path")]
        fragment: String,
        #[serde(rename = "view")]
        handler: String,
    },
}

impl RoutePattern {
    pub fn leaf(fragment: impl Into<String>, handler: impl Into<String>) -> Self {
        RoutePattern::Leaf {
            fragment: fragment.into(),
            handler: handler.into(),
        }
    }

    pub fn group(fragment: impl Into<String>, children: Vec<RoutePattern>) -> Self {
        RoutePattern::Group {
            fragment: fragment.into(),
            children,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    #[serde(default)]
    route: Vec<RoutePattern>,
}

/// Load a route table from a TOML file.
pub fn load_table(path: &Path) -> Result<Vec<RoutePattern>, RouteError> {
    let content = fs::read_to_string(path).map_err(|source| RouteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table: TableFile = toml::from_str(&content).map_err(|source| RouteError::Table {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(table.route)
}

/// A named set of views that view names resolve against.
#[derive(Clone)]
pub struct Views {
    module: String,
    entries: BTreeMap<String, Arc<dyn View>>,
}

impl Views {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, view: impl View + 'static) -> Self {
        self.register(name, view);
        self
    }

    pub fn register(&mut self, name: impl Into<String>, view: impl View + 'static) {
        self.entries.insert(name.into(), Arc::new(view));
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn View>, RouteError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| RouteError::UnresolvedView {
                module: self.module.clone(),
                name: name.to_string(),
            })
    }
}

impl fmt::Debug for Views {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Views")
            .field("module", &self.module)
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Provider of an application's routes and views.
pub trait RouteSource {
    /// The root of the route table.
    fn url_patterns(&self) -> Result<Vec<RoutePattern>, RouteError>;
    /// Views that table entries refer to.
    fn views(&self) -> Result<&Views, RouteError>;
    /// Views backing [`FALLBACK_ROUTES`].
    fn fallback_views(&self) -> Result<&Views, RouteError>;
}

/// A concrete absolute path and the view that renders it.
#[derive(Clone)]
pub struct FlatRoute {
    pub path: String,
    pub handler: String,
    pub view: Arc<dyn View>,
}

impl fmt::Debug for FlatRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatRoute")
            .field("path", &self.path)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

/// Routes produced by [`discover_or_fallback`].
#[derive(Debug)]
pub struct Discovery {
    pub routes: Vec<FlatRoute>,
    /// Why the route table was abandoned, when [`FALLBACK_ROUTES`] were used.
    pub fallback_reason: Option<RouteError>,
}

impl Discovery {
    pub fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.path.as_str()).collect()
    }
}

/// True for raw routes carrying a parameter capture or a regex group.
pub fn is_dynamic(route: &str) -> bool {
    route.contains('<') || route.contains('(')
}

/// Force exactly one leading slash.
pub fn normalize(route: &str) -> String {
    format!("/{}", route.trim_start_matches('/'))
}

/// Plain string prefix match against the exclusion list.
pub fn is_excluded(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

/// Flatten a route table into `(path, view name)` pairs.
///
/// Dynamic leaves are dropped and paths normalized. Exclusions are not
/// applied here.
pub fn flatten(patterns: &[RoutePattern]) -> Vec<(String, &str)> {
    let mut routes = Vec::new();
    walk(patterns, "", &mut routes);
    routes
}

fn walk<'a>(patterns: &'a [RoutePattern], prefix: &str, routes: &mut Vec<(String, &'a str)>) {
    for pattern in patterns {
        match pattern {
            RoutePattern::Leaf { fragment, handler } => {
                let route = format!("{prefix}{fragment}");
                if is_dynamic(&route) {
                    debug!(route = %route, "skipping parameterized route");
                    continue;
                }
                routes.push((normalize(&route), handler.as_str()));
            }
            RoutePattern::Group { fragment, children } => {
                walk(children, &format!("{prefix}{fragment}"), routes);
            }
        }
    }
}

/// Walk the source's route table and resolve every static route's view.
///
/// Fails if the table cannot be produced or a view name does not resolve.
pub fn discover(
    source: &dyn RouteSource,
    exclude_prefixes: &[String],
) -> Result<Vec<FlatRoute>, RouteError> {
    let patterns = source.url_patterns()?;
    let views = source.views()?;

    let mut routes = Vec::new();
    for (path, handler) in flatten(&patterns) {
        let view = views.resolve(handler)?;
        routes.push(FlatRoute {
            path,
            handler: handler.to_string(),
            view,
        });
    }
    routes.retain(|route| !is_excluded(&route.path, exclude_prefixes));
    Ok(routes)
}

/// Resolve [`FALLBACK_ROUTES`] against a view module.
pub fn fallback_routes(views: &Views) -> Result<Vec<FlatRoute>, RouteError> {
    FALLBACK_ROUTES
        .iter()
        .map(|(path, handler)| {
            Ok(FlatRoute {
                path: (*path).to_string(),
                handler: (*handler).to_string(),
                view: views.resolve(handler)?,
            })
        })
        .collect()
}

/// [`discover`], falling back to [`FALLBACK_ROUTES`] on failure.
pub fn discover_or_fallback(
    source: &dyn RouteSource,
    exclude_prefixes: &[String],
) -> Result<Discovery, RouteError> {
    let discovery_error = match discover(source, exclude_prefixes) {
        Ok(routes) => {
            return Ok(Discovery {
                routes,
                fallback_reason: None,
            });
        }
        Err(err) => err,
    };

    warn!(error = %discovery_error, "route discovery failed, using fallback routes");
    match source.fallback_views().and_then(fallback_routes) {
        Ok(routes) => Ok(Discovery {
            routes,
            fallback_reason: Some(discovery_error),
        }),
        Err(fallback) => Err(RouteError::FallbackUnavailable {
            discovery: Box::new(discovery_error),
            fallback: Box::new(fallback),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn default_excludes() -> Vec<String> {
        vec!["/admin".to_string(), "/static".to_string()]
    }

    fn paths(routes: &[FlatRoute]) -> Vec<&str> {
        routes.iter().map(|r| r.path.as_str()).collect()
    }

    // =========================================================================
    // Path predicates
    // =========================================================================

    #[test]
    fn is_dynamic_detects_captures_and_groups() {
        assert!(is_dynamic("post/<int:id>/"));
        assert!(is_dynamic("^archive/(?P<year>[0-9]{4})/$"));
        assert!(is_dynamic("notes(draft)/"));
        assert!(!is_dynamic("playlists/"));
        assert!(!is_dynamic(""));
    }

    #[test]
    fn normalize_forces_single_leading_slash() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("diary/"), "/diary/");
        assert_eq!(normalize("/diary/"), "/diary/");
        assert_eq!(normalize("///diary"), "/diary");
    }

    #[test]
    fn is_excluded_is_a_plain_prefix_match() {
        let excludes = default_excludes();
        assert!(is_excluded("/admin/", &excludes));
        assert!(is_excluded("/administration/", &excludes));
        assert!(is_excluded("/static/css/", &excludes));
        assert!(!is_excluded("/", &excludes));
        assert!(!is_excluded("/diary/admin/", &excludes));
    }

    // =========================================================================
    // Flattening
    // =========================================================================

    #[test]
    fn flatten_concatenates_group_prefixes_in_order() {
        let table = vec![
            RoutePattern::leaf("", "home"),
            RoutePattern::group(
                "music/",
                vec![
                    RoutePattern::leaf("", "music"),
                    RoutePattern::group("playlists/", vec![RoutePattern::leaf("road/", "road")]),
                ],
            ),
            RoutePattern::leaf("proposal/", "proposal"),
        ];
        let flat = flatten(&table);
        assert_eq!(
            flat,
            vec![
                ("/".to_string(), "home"),
                ("/music/".to_string(), "music"),
                ("/music/playlists/road/".to_string(), "road"),
                ("/proposal/".to_string(), "proposal"),
            ]
        );
    }

    #[test]
    fn flatten_skips_leaves_under_dynamic_group() {
        let table = vec![RoutePattern::group(
            "<lang>/",
            vec![RoutePattern::leaf("about/", "about")],
        )];
        assert!(flatten(&table).is_empty());
    }

    #[test]
    fn flatten_keeps_static_path_only_once_normalized() {
        let table = vec![RoutePattern::group("/", vec![RoutePattern::leaf("/diary/", "diary")])];
        assert_eq!(flatten(&table), vec![("/diary/".to_string(), "diary")]);
    }

    #[test]
    fn flatten_skips_literal_parenthesis() {
        let table = vec![
            RoutePattern::leaf("songs(live)/", "live"),
            RoutePattern::leaf("songs/", "songs"),
        ];
        assert_eq!(flatten(&table), vec![("/songs/".to_string(), "songs")]);
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    #[test]
    fn discover_scenario_drops_dynamic_and_admin() {
        let source = StubSource::new(
            vec![
                RoutePattern::leaf("/", "home"),
                RoutePattern::leaf("/playlists/", "playlists"),
                RoutePattern::leaf("/post/<id>/", "post"),
                RoutePattern::leaf("/admin/x", "admin"),
            ],
            echo_views("stub.views", &["home", "playlists", "post", "admin"]),
        );
        let routes = discover(&source, &default_excludes()).unwrap();
        assert_eq!(paths(&routes), vec!["/", "/playlists/"]);
        assert_eq!(routes[1].handler, "playlists");
    }

    #[test]
    fn discover_never_returns_excluded_or_unnormalized_paths() {
        let source = StubSource::new(
            vec![
                RoutePattern::group(
                    "static/",
                    vec![RoutePattern::leaf("css/site.css", "asset")],
                ),
                RoutePattern::leaf("admin", "admin"),
                RoutePattern::leaf("//diary/", "diary"),
            ],
            echo_views("stub.views", &["asset", "admin", "diary"]),
        );
        let routes = discover(&source, &default_excludes()).unwrap();
        for route in &routes {
            assert!(route.path.starts_with('/'));
            assert!(!route.path.starts_with("//"));
            assert!(!route.path.starts_with("/admin"));
            assert!(!route.path.starts_with("/static"));
        }
        assert_eq!(paths(&routes), vec!["/diary/"]);
    }

    #[test]
    fn discover_fails_on_unresolved_view() {
        let source = StubSource::new(
            vec![RoutePattern::leaf("", "home"), RoutePattern::leaf("gone/", "gone")],
            echo_views("stub.views", &["home"]),
        );
        let err = discover(&source, &default_excludes()).unwrap_err();
        assert!(matches!(err, RouteError::UnresolvedView { ref name, .. } if name == "gone"));
    }

    #[test]
    fn discover_resolves_excluded_views_too() {
        let source = StubSource::new(
            vec![RoutePattern::leaf("admin/", "admin")],
            echo_views("stub.views", &[]),
        );
        assert!(discover(&source, &default_excludes()).is_err());
    }

    // =========================================================================
    // Fallback
    // =========================================================================

    #[test]
    fn fallback_used_when_table_unavailable() {
        let source = StubSource::broken().with_fallback(fallback_views());
        let discovery = discover_or_fallback(&source, &default_excludes()).unwrap();
        assert!(discovery.used_fallback());
        assert_eq!(
            discovery.paths(),
            vec!["/", "/playlists/", "/diary/", "/proposal/"]
        );
    }

    #[test]
    fn fallback_used_when_view_unresolved() {
        let source = StubSource::new(
            vec![RoutePattern::leaf("", "missing")],
            echo_views("stub.views", &[]),
        )
        .with_fallback(fallback_views());
        let discovery = discover_or_fallback(&source, &default_excludes()).unwrap();
        assert!(matches!(
            discovery.fallback_reason,
            Some(RouteError::UnresolvedView { .. })
        ));
        assert_eq!(discovery.routes.len(), FALLBACK_ROUTES.len());
    }

    #[test]
    fn fallback_not_used_when_discovery_succeeds() {
        let source = StubSource::new(
            vec![RoutePattern::leaf("", "home")],
            echo_views("stub.views", &["home"]),
        )
        .with_fallback(fallback_views());
        let discovery = discover_or_fallback(&source, &default_excludes()).unwrap();
        assert!(!discovery.used_fallback());
        assert_eq!(discovery.paths(), vec!["/"]);
    }

    #[test]
    fn missing_fallback_module_is_fatal() {
        let source = StubSource::broken();
        let err = discover_or_fallback(&source, &default_excludes()).unwrap_err();
        assert!(matches!(err, RouteError::FallbackUnavailable { .. }));
        let message = err.to_string();
        assert!(message.contains("stub.urls"));
        assert!(message.contains("amor.views"));
    }

    #[test]
    fn incomplete_fallback_module_is_fatal() {
        let source =
            StubSource::broken().with_fallback(echo_views("amor.views", &["home", "playlists"]));
        let err = discover_or_fallback(&source, &default_excludes()).unwrap_err();
        match err {
            RouteError::FallbackUnavailable { fallback, .. } => {
                assert!(matches!(*fallback, RouteError::UnresolvedView { ref name, .. } if name == "diary"));
            }
            other => panic!("expected FallbackUnavailable, got {other:?}"),
        }
    }

    // =========================================================================
    // Table files
    // =========================================================================

    #[test]
    fn load_table_matches_code_built_table() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("urls.toml");
        fs::write(
            &path,
            r#"
[[route]]
path = ""
view = "home"

[[route]]
path = "diary/"
include = [
    { path = "", view = "diary" },
    { path = "<slug>/", view = "diary_entry" },
]
"#,
        )
        .unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(
            table,
            vec![
                RoutePattern::leaf("", "home"),
                RoutePattern::group(
                    "diary/",
                    vec![
                        RoutePattern::leaf("", "diary"),
                        RoutePattern::leaf("<slug>/", "diary_entry"),
                    ],
                ),
            ]
        );
        assert_eq!(
            flatten(&table),
            vec![("/".to_string(), "home"), ("/diary/".to_string(), "diary")]
        );
    }

    #[test]
    fn load_table_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_table(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, RouteError::Io { .. }));
    }

    #[test]
    fn load_table_rejects_entry_without_view_or_include() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("urls.toml");
        fs::write(&path, "[[route]]\npath = \"x/\"\n").unwrap();
        assert!(matches!(load_table(&path), Err(RouteError::Table { .. })));
    }

    #[test]
    fn views_resolve_reports_module() {
        let views = echo_views("amor.views", &["home"]);
        assert!(views.resolve("home").is_ok());
        let Err(err) = views.resolve("nope") else {
            panic!("expected unresolved view");
        };
        assert_eq!(err.to_string(), "view 'nope' not found in amor.views");
        assert_eq!(views.names().collect::<Vec<_>>(), vec!["home"]);
    }

    #[test]
    fn views_debug_lists_names_in_order() {
        let views = echo_views("amor.views", &["home", "diary"]);
        assert_eq!(
            format!("{views:?}"),
            r#"Views { module: "amor.views", names: ["diary", "home"] }"#
        );
    }
}
