//! Output layout: one `index.html` per route directory.
//!
//! ```text
//! /                 -> index.html
//! /diary/           -> diary/index.html
//! /music/playlists  -> music/playlists/index.html
//! ```
//!
//! Leading and trailing slashes are ignored, so `/a/b` and `/a/b/` land in
//! the same file.

use crate::render::RenderedPage;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

pub const INDEX_FILE: &str = "index.html";

/// File for `path`, relative to the output directory.
pub fn relative_page_path(path: &str) -> PathBuf {
    let sub = path.trim_matches('/');
    if sub.is_empty() {
        PathBuf::from(INDEX_FILE)
    } else {
        Path::new(sub).join(INDEX_FILE)
    }
}

/// Write a rendered page below `output`, creating intermediate directories.
///
/// Returns the written file. Paths with `.` or `..` segments are refused.
pub fn write_page(output: &Path, page: &RenderedPage) -> io::Result<PathBuf> {
    let relative = relative_page_path(&page.path);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("route {} escapes the output directory", page.path),
        ));
    }

    let file = output.join(relative);
    if let Some(dir) = file.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&file, &page.content)?;
    Ok(file)
}
