//! In-process page rendering.
//!
//! Each [`FlatRoute`] is rendered by building a synthetic `GET` request,
//! calling its view and materializing a deferred template if the response
//! carries one. A failure never escapes: it becomes
//! [`RenderOutcome::Skipped`] so the export loop can move on.

use crate::routing::FlatRoute;
use crate::view::{self, ViewError};
use tracing::{debug, warn};

/// Rendered body of one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub path: String,
    pub content: Vec<u8>,
}

/// Result of rendering one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(RenderedPage),
    Skipped { path: String, reason: String },
}

fn render_bytes(route: &FlatRoute) -> Result<Vec<u8>, ViewError> {
    let request = view::get(&route.path)?;
    let response = route.view.handle(&request)?;
    if !response.body().is_rendered() {
        debug!(path = %route.path, "materializing deferred template");
    }
    let response = view::render(response)?;
    if !response.status().is_success() {
        debug!(path = %route.path, status = %response.status(), "view returned non-success status");
    }
    view::content(response, &route.path)
}

/// Render one route, turning any failure into a skip.
pub fn render_route(route: &FlatRoute) -> RenderOutcome {
    match render_bytes(route) {
        Ok(content) => RenderOutcome::Rendered(RenderedPage {
            path: route.path.clone(),
            content,
        }),
        Err(err) => {
            warn!(path = %route.path, error = %err, "skipping route");
            RenderOutcome::Skipped {
                path: route.path.clone(),
                reason: err.to_string(),
            }
        }
    }
}
