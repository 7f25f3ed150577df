//! Static asset aggregation (`collect-static`) and export copy.
//!
//! Aggregation gathers every file under the configured source directories
//! into one root directory:
//!
//! ```text
//! static/css/amor.css      ──┐
//! vendor/css/amor.css        │ (ignored: static/ already provided it)
//! static/img/heart.svg     ──┤
//!                            ▼
//! staticfiles/
//! ├── css/amor.css
//! ├── css/amor.3f2a9c01b7de.css      # fingerprinted copy
//! ├── img/heart.svg
//! ├── img/heart.0c44e1a2f9b3.svg
//! └── staticfiles.json               # original -> fingerprinted name
//! ```
//!
//! Source directories are searched in order and the first file found for a
//! relative path wins. Destination files whose content is already identical
//! are left untouched, so repeated collections are cheap and deterministic.
//!
//! The export then mirrors the whole root into `<output>/static` with
//! [`copy_collected`]. A missing root is not an error.

use crate::config::StaticFilesConfig;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Manifest written at the aggregation root when fingerprinting is on.
pub const MANIFEST_FILENAME: &str = "staticfiles.json";

const MANIFEST_VERSION: &str = "1.1";

/// Hex digits of the content hash embedded in fingerprinted names.
const HASH_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("error walking {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a collection run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub root: PathBuf,
    /// Files written because they were new or changed.
    pub copied: usize,
    /// Files already identical at the destination.
    pub unmodified: usize,
    /// Files that also received a fingerprinted copy.
    pub fingerprinted: usize,
    /// Configured source directories that do not exist.
    pub missing_dirs: Vec<PathBuf>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    version: &'a str,
    paths: &'a BTreeMap<String, String>,
}

/// Collect every configured source directory into the aggregation root.
pub fn collect_static(
    config: &StaticFilesConfig,
    project: &Path,
) -> Result<CollectSummary, AssetError> {
    let root = config.root_in(project);
    let mut summary = CollectSummary {
        root: root.clone(),
        ..CollectSummary::default()
    };
    let mut seen = BTreeSet::new();
    let mut hashed_paths = BTreeMap::new();

    for dir in config.dirs_in(project) {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "static source directory does not exist");
            summary.missing_dirs.push(dir);
            continue;
        }

        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|source| AssetError::Walk {
                path: dir.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let key = url_key(relative);
            if !seen.insert(key.clone()) {
                debug!(path = %key, source = %entry.path().display(), "already collected, ignoring");
                continue;
            }

            let bytes = fs::read(entry.path())?;
            if write_if_changed(&root.join(relative), &bytes)? {
                debug!(path = %key, "copied");
                summary.copied += 1;
            } else {
                summary.unmodified += 1;
            }

            if config.manifest {
                let digest = format!("{:x}", Sha256::digest(&bytes));
                let hashed = hashed_name(relative, &digest[..HASH_LEN]);
                write_if_changed(&root.join(&hashed), &bytes)?;
                hashed_paths.insert(key, url_key(&hashed));
                summary.fingerprinted += 1;
            }
        }
    }

    if config.manifest {
        let manifest = Manifest {
            version: MANIFEST_VERSION,
            paths: &hashed_paths,
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        write_if_changed(&root.join(MANIFEST_FILENAME), json.as_bytes())?;
    }

    info!(
        root = %root.display(),
        copied = summary.copied,
        unmodified = summary.unmodified,
        "collected static files"
    );
    Ok(summary)
}

/// Mirror the aggregation root into `target`.
///
/// Returns the number of files copied, or `None` when `root` does not exist.
pub fn copy_collected(root: &Path, target: &Path) -> Result<Option<usize>, AssetError> {
    if !root.is_dir() {
        warn!(root = %root.display(), "static root does not exist, skipping copy");
        return Ok(None);
    }

    let mut copied = 0;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| AssetError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let dest = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }
    }
    Ok(Some(copied))
}

/// `css/amor.css` + `3f2a9c01b7de` -> `css/amor.3f2a9c01b7de.css`
pub fn hashed_name(relative: &Path, hash: &str) -> PathBuf {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match relative.extension() {
        Some(ext) => format!("{stem}.{hash}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{hash}"),
    };
    relative.with_file_name(name)
}

/// Relative path with forward slashes, as used in URLs and the manifest.
fn url_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write `bytes` unless `dest` already holds exactly them. Returns whether
/// anything was written.
fn write_if_changed(dest: &Path, bytes: &[u8]) -> io::Result<bool> {
    if let Ok(existing) = fs::read(dest)
        && existing == bytes
    {
        return Ok(false);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, bytes)?;
    Ok(true)
}
