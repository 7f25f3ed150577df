//! CLI output formatting for every command.
//!
//! Output is **route-centric, not file-centric**: each page leads with its
//! positional index and URL path, with the file it landed in shown after the
//! arrow. Reasons and sources are indented context lines under the entry
//! they explain.
//!
//! # Output Format
//!
//! ## Routes
//!
//! ```text
//! Routes
//! 001 / → home
//! 002 /playlists/ → playlists
//! 003 /diary/ → diary
//! 004 /proposal/ → proposal
//! ```
//!
//! When the fallback list was used, the reason follows:
//!
//! ```text
//! Fallback
//!     Reason: IO error reading route table urls.toml: ...
//! ```
//!
//! ## Export
//!
//! ```text
//! Pages
//! 001 / → index.html
//! 002 /playlists/ → playlists/index.html
//!
//! Skipped
//! 001 /broken/
//!     Reason: template error: boom
//!
//! Static
//!     staticfiles → static/ (3 files)
//!     Redirects: _redirects
//!
//! Exported 2 pages, skipped 1 route
//! ```
//!
//! ## Collect
//!
//! ```text
//! Static files → staticfiles
//!     Copied: 2
//!     Unmodified: 1
//!     Fingerprinted: 3
//!     Missing: vendor
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::assets::CollectSummary;
use crate::export::{ExportReport, STATIC_DIR};
use crate::routing::Discovery;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// `path` relative to `base` when possible, displayed with forward slashes.
fn relative_display(path: &Path, base: &Path) -> String {
    let shown = path.strip_prefix(base).unwrap_or(path);
    shown
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// routes
// ============================================================================

/// Format the discovered route list.
pub fn format_routes(discovery: &Discovery) -> Vec<String> {
    let mut lines = vec!["Routes".to_string()];
    for (i, route) in discovery.routes.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            route.path,
            route.handler
        ));
    }
    if let Some(reason) = &discovery.fallback_reason {
        lines.push(String::new());
        lines.push("Fallback".to_string());
        lines.push(format!("{}Reason: {}", indent(1), reason));
    }
    lines
}

pub fn print_routes(discovery: &Discovery) {
    for line in format_routes(discovery) {
        println!("{}", line);
    }
}

// ============================================================================
// export-static
// ============================================================================

/// Format the result of an export run.
pub fn format_export_report(report: &ExportReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(reason) = &report.fallback_reason {
        lines.push("Fallback".to_string());
        lines.push(format!("{}Reason: {}", indent(1), reason));
        lines.push(String::new());
    }

    lines.push("Pages".to_string());
    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            page.path,
            relative_display(&page.file, &report.output)
        ));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for (i, skipped) in report.skipped.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), skipped.path));
            lines.push(format!("{}Reason: {}", indent(1), skipped.reason));
        }
    }

    lines.push(String::new());
    lines.push("Static".to_string());
    let root = report.collected.root.display();
    match report.static_files {
        Some(n) => lines.push(format!(
            "{}{} → {}/ ({})",
            indent(1),
            root,
            STATIC_DIR,
            count(n, "file")
        )),
        None => lines.push(format!("{}{} does not exist, nothing copied", indent(1), root)),
    }
    lines.push(format!(
        "{}Redirects: {}",
        indent(1),
        relative_display(&report.redirects, &report.output)
    ));

    lines.push(String::new());
    let mut summary = format!("Exported {}", count(report.pages.len(), "page"));
    if !report.skipped.is_empty() {
        summary.push_str(&format!(", skipped {}", count(report.skipped.len(), "route")));
    }
    lines.push(summary);
    lines
}

pub fn print_export_report(report: &ExportReport) {
    for line in format_export_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// collect-static
// ============================================================================

/// Format the result of a static collection run.
pub fn format_collect_summary(summary: &CollectSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Static files → {}", summary.root.display()),
        format!("{}Copied: {}", indent(1), summary.copied),
        format!("{}Unmodified: {}", indent(1), summary.unmodified),
    ];
    if summary.fingerprinted > 0 {
        lines.push(format!("{}Fingerprinted: {}", indent(1), summary.fingerprinted));
    }
    for dir in &summary.missing_dirs {
        lines.push(format!("{}Missing: {}", indent(1), dir.display()));
    }
    lines
}

pub fn print_collect_summary(summary: &CollectSummary) {
    for line in format_collect_summary(summary) {
        println!("{}", line);
    }
}
