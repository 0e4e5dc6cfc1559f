//! Utility functions for treemirror
//!
//! Path helpers shared by the walker, the replacer and the configuration
//! checks, plus byte formatting for log lines.

use crate::error::{Result, SyncError};
use std::path::{Component, Path, PathBuf};

/// Make a path relative to a base path
///
/// Tries a lexical strip first so symbolic links inside the tree keep their
/// own path, and falls back to canonicalising both sides when the lexical
/// strip fails (for example when `base` contains `..`).
///
/// # Errors
///
/// - [`SyncError::Internal`] if the path is not under the base path
/// - [`SyncError::IoAt`] if canonicalization fails (fallback case only)
pub fn make_relative(path: &Path, base: &Path) -> Result<PathBuf> {
    if let Ok(relative) = path.strip_prefix(base) {
        return Ok(relative.to_path_buf());
    }

    let path_canon = path.canonicalize().map_err(|e| SyncError::io_at(path, e))?;
    let base_canon = base.canonicalize().map_err(|e| SyncError::io_at(base, e))?;

    path_canon
        .strip_prefix(&base_canon)
        .map(|p| p.to_path_buf())
        .map_err(|_| {
            SyncError::internal(format!(
                "Path {:?} is not relative to {:?}",
                path_canon, base_canon
            ))
        })
}

/// Render a relative path with `/` separators
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `inner` is `outer` or lives somewhere below it
///
/// Both paths are canonicalised, so they must exist.
pub fn is_same_or_nested(inner: &Path, outer: &Path) -> Result<bool> {
    let inner = inner.canonicalize().map_err(|e| SyncError::io_at(inner, e))?;
    let outer = outer.canonicalize().map_err(|e| SyncError::io_at(outer, e))?;
    Ok(inner.starts_with(&outer))
}

/// Format bytes in human-readable form (1024-based units)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
