//! # Mimili
//!
//! Static export for the amor site. Every route that can be rendered without
//! arguments is rendered in-process and written to disk as
//! `<path>/index.html`, next to the collected static files and a catch-all
//! `_redirects` rule. The result can be dropped on any static host.
//!
//! # Architecture: One Pass, Five Steps
//!
//! ```text
//! 1. Prepare   rm -r dist/, mkdir dist/
//! 2. Discover  route table → [FlatRoute]      (fallback list on failure)
//! 3. Render    view(GET path) → bytes → dist/<path>/index.html
//! 4. Collect   static/ → staticfiles/ → dist/static/
//! 5. Redirect  dist/_redirects
//! ```
//!
//! A route that fails to render is skipped and reported; every other failure
//! aborts the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`routing`] | Route table model, flattening, exclusion and the fallback list |
//! | [`view`] | In-process request/response types and deferred template bodies |
//! | [`render`] | Renders one route into bytes, turning failures into skips |
//! | [`layout`] | Maps URL paths to `index.html` files under the output directory |
//! | [`assets`] | Static file aggregation, fingerprinting and export copy |
//! | [`export`] | The export pipeline and its report |
//! | [`config`] | `mimili.toml` loading, validation and stock defaults |
//! | [`amor`] | The site itself: route table, views and Maud templates |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Views Are Plain Callables
//!
//! A view is anything implementing [`view::View`], including any
//! `Fn(&Request) -> Result<Response, ViewError>`. Requests and responses are
//! [`http`] types, so views read like handlers of a server framework but the
//! exporter calls them directly: no socket, no runtime.
//!
//! ## Route Tables Are Data
//!
//! The route tree is a plain enum that can be built in code or loaded from a
//! TOML file named in `mimili.toml`. When the table cannot be loaded or names
//! a view that does not exist, the fixed fallback list keeps the export going.

pub mod amor;
pub mod assets;
pub mod config;
pub mod export;
pub mod layout;
pub mod output;
pub mod render;
pub mod routing;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
