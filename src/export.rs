//! Static export pipeline.
//!
//! Runs every stage once, in order:
//!
//! ```text
//! prepare   rm -r <output>, mkdir -p <output>
//! discover  route table -> [FlatRoute]          (fallback list on failure)
//! render    FlatRoute -> bytes -> <path>/index.html, per route
//! collect   static dirs -> static root -> <output>/static
//! redirect  <output>/_redirects
//! ```
//!
//! A route that fails to render or write is skipped and recorded in the
//! [`ExportReport`]; everything else that fails aborts the run. Nothing is
//! rolled back: the previous output is already gone by the time pages are
//! written.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── playlists/index.html
//! ├── diary/index.html
//! ├── proposal/index.html
//! ├── static/                # mirror of the static root
//! │   ├── css/amor.css
//! │   └── staticfiles.json
//! └── _redirects             # /*    /index.html   200
//! ```

use crate::assets::{self, AssetError, CollectSummary};
use crate::config::SiteConfig;
use crate::layout;
use crate::render::{RenderOutcome, render_route};
use crate::routing::{RouteError, RouteSource, discover_or_fallback};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const REDIRECTS_FILENAME: &str = "_redirects";

/// Catch-all rule serving the root page for every path.
pub const REDIRECTS_RULE: &str = "/*    /index.html   200\n";

/// Directory under the output that receives the collected static files.
pub const STATIC_DIR: &str = "static";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("could not prepare output directory {path}: {source}")]
    PrepareOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("refusing to wipe {0}: it contains the project directory")]
    UnsafeOutput(PathBuf),
    #[error(transparent)]
    Routes(#[from] RouteError),
    #[error("static files: {0}")]
    Assets(#[from] AssetError),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A page that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub path: String,
    pub file: PathBuf,
}

/// A route left out of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRoute {
    pub path: String,
    pub reason: String,
}

/// Everything one export run did.
#[derive(Debug)]
pub struct ExportReport {
    pub output: PathBuf,
    pub pages: Vec<WrittenPage>,
    pub skipped: Vec<SkippedRoute>,
    /// Set when the fallback route list replaced the route table.
    pub fallback_reason: Option<String>,
    pub collected: CollectSummary,
    /// Files mirrored into `<output>/static`; `None` when the static root
    /// did not exist.
    pub static_files: Option<usize>,
    pub redirects: PathBuf,
}

/// Remove `output` if present, then recreate it empty.
///
/// Refuses to remove a directory that is, or contains, `project`.
pub fn prepare_output(output: &Path, project: &Path) -> Result<(), ExportError> {
    let failed = |source: io::Error| ExportError::PrepareOutput {
        path: output.to_path_buf(),
        source,
    };

    if output.exists() {
        let output_abs = fs::canonicalize(output).map_err(failed)?;
        if let Ok(project_abs) = fs::canonicalize(project)
            && project_abs.starts_with(&output_abs)
        {
            return Err(ExportError::UnsafeOutput(output.to_path_buf()));
        }
        info!(output = %output.display(), "removing existing output directory");
        fs::remove_dir_all(output).map_err(failed)?;
    }
    fs::create_dir_all(output).map_err(failed)
}

/// Write the catch-all `_redirects` file.
pub fn emit_redirects(output: &Path) -> Result<PathBuf, ExportError> {
    let path = output.join(REDIRECTS_FILENAME);
    fs::write(&path, REDIRECTS_RULE).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Export every static route of `source` into `output`.
///
/// `project` is the directory static source dirs and the static root are
/// relative to.
pub fn export(
    source: &dyn RouteSource,
    config: &SiteConfig,
    project: &Path,
    output: &Path,
) -> Result<ExportReport, ExportError> {
    prepare_output(output, project)?;

    let discovery = discover_or_fallback(source, &config.routes.exclude_prefixes)?;
    info!(routes = discovery.routes.len(), "discovered routes");

    let mut pages = Vec::new();
    let mut skipped = Vec::new();
    for route in &discovery.routes {
        match render_route(route) {
            RenderOutcome::Rendered(page) => match layout::write_page(output, &page) {
                Ok(file) => {
                    info!(path = %page.path, file = %file.display(), "wrote page");
                    pages.push(WrittenPage {
                        path: page.path,
                        file,
                    });
                }
                Err(err) => {
                    warn!(path = %page.path, error = %err, "skipping route");
                    skipped.push(SkippedRoute {
                        path: page.path,
                        reason: err.to_string(),
                    });
                }
            },
            RenderOutcome::Skipped { path, reason } => {
                skipped.push(SkippedRoute { path, reason });
            }
        }
    }

    let collected = assets::collect_static(&config.static_files, project)?;
    let static_files = assets::copy_collected(&collected.root, &output.join(STATIC_DIR))?;

    let redirects = emit_redirects(output)?;

    Ok(ExportReport {
        output: output.to_path_buf(),
        pages,
        skipped,
        fallback_reason: discovery.fallback_reason.map(|err| err.to_string()),
        collected,
        static_files,
        redirects,
    })
}
