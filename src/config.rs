//! Project configuration module.
//!
//! Handles loading, validating, and merging `mimili.toml`. The file lives in
//! the project directory (the directory the CLI is pointed at with
//! `--project`, the current directory by default). Every key is optional:
//! user values are merged on top of stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Mimili"          # Used in <title> and the site header
//! language = "es"           # <html lang="...">
//!
//! [routes]
//! # table = "urls.toml"     # Load the route table from a TOML file instead
//!                           # of the built-in one
//! exclude_prefixes = ["/admin", "/static"]
//!
//! [static_files]
//! root = "staticfiles"      # Aggregation root filled by collect-static
//! dirs = ["static"]         # Source directories, first match wins
//! url = "/static/"          # URL prefix templates use for assets
//! manifest = true           # Fingerprinted copies + staticfiles.json
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file inside the project directory.
pub const CONFIG_FILENAME: &str = "mimili.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `mimili.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity used by the page templates.
    pub site: SiteSection,
    /// Route table source and export filters.
    pub routes: RoutesConfig,
    /// Static asset aggregation settings.
    pub static_files: StaticFilesConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self
            .routes
            .exclude_prefixes
            .iter()
            .find(|p| !p.starts_with('/'))
        {
            return Err(ConfigError::Validation(format!(
                "routes.exclude_prefixes entries must start with '/': {bad:?}"
            )));
        }
        if self.static_files.root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "static_files.root must not be empty".into(),
            ));
        }
        if self
            .static_files
            .dirs
            .iter()
            .any(|d| Path::new(d) == Path::new(&self.static_files.root))
        {
            return Err(ConfigError::Validation(
                "static_files.dirs must not contain static_files.root".into(),
            ));
        }
        if !self.static_files.url.starts_with('/') || !self.static_files.url.ends_with('/') {
            return Err(ConfigError::Validation(
                "static_files.url must start and end with '/'".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: String,
    pub language: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Mimili".to_string(),
            language: "es".to_string(),
        }
    }
}

/// Where the route table comes from and which paths never get exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    /// Optional TOML route table, relative to the project directory.
    /// When absent the application's built-in table is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Discovered paths starting with any of these are dropped.
    pub exclude_prefixes: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            table: None,
            exclude_prefixes: vec!["/admin".to_string(), "/static".to_string()],
        }
    }
}

/// Static asset aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticFilesConfig {
    /// Aggregation root, relative to the project directory.
    pub root: String,
    /// Source directories searched in order, relative to the project directory.
    pub dirs: Vec<String>,
    /// URL prefix under which assets are served.
    pub url: String,
    /// Write fingerprinted copies and a `staticfiles.json` manifest.
    pub manifest: bool,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: "staticfiles".to_string(),
            dirs: vec!["static".to_string()],
            url: "/static/".to_string(),
            manifest: true,
        }
    }
}

impl StaticFilesConfig {
    /// Absolute aggregation root for a given project directory.
    pub fn root_in(&self, project: &Path) -> PathBuf {
        project.join(&self.root)
    }

    /// Absolute source directories for a given project directory, in search order.
    pub fn dirs_in(&self, project: &Path) -> Vec<PathBuf> {
        self.dirs.iter().map(|d| project.join(d)).collect()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `mimili.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `mimili.toml` in the given project directory.
pub fn load_config(project: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(project)?)
}

/// Returns a fully-commented stock `mimili.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Mimili Configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "Mimili"
language = "es"

# ---------------------------------------------------------------------------
# Routes
# ---------------------------------------------------------------------------
[routes]
# Load the route table from a TOML file (relative to this file) instead of
# the built-in one. Leaves are `{ path, view }`, groups `{ path, include }`.
# table = "urls.toml"

# Discovered paths starting with one of these prefixes are not exported.
exclude_prefixes = ["/admin", "/static"]

# ---------------------------------------------------------------------------
# Static files
# ---------------------------------------------------------------------------
[static_files]
# Aggregation root filled by `mimili collect-static`, copied to <output>/static.
root = "staticfiles"

# Source directories, searched in order. The first file found for a given
# relative path wins.
dirs = ["static"]

# URL prefix templates use to reference assets.
url = "/static/"

# Write fingerprinted copies (name.<hash>.ext) and staticfiles.json.
manifest = true
"##
}
