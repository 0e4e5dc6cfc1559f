//! Mirror configuration and input validation
//!
//! A [`SyncConfig`] is built once at startup and never changes afterwards.
//! Construction validates everything up front so the cycle code can assume
//! sane inputs; a root that disappears later is a cycle failure, not a
//! configuration error.

use crate::error::{Result, SyncError};
use crate::utils;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable description of one source/destination pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncConfig {
    source_root: PathBuf,
    destination_root: PathBuf,
    interval: Duration,
}

impl SyncConfig {
    /// Validate inputs and build the configuration
    ///
    /// # Errors
    ///
    /// [`SyncError::Validation`] when either root is not an existing
    /// directory, the interval is zero, or the roots overlap (same directory,
    /// or one nested inside the other).
    pub fn new(
        source_root: impl Into<PathBuf>,
        destination_root: impl Into<PathBuf>,
        interval_seconds: u64,
    ) -> Result<Self> {
        let source_root = source_root.into();
        let destination_root = destination_root.into();

        ensure_directory(&source_root)?;
        ensure_directory(&destination_root)?;
        if interval_seconds == 0 {
            return Err(SyncError::validation("The value must be greater than 0"));
        }

        ensure_apart(&source_root, &destination_root)?;

        Ok(Self {
            source_root,
            destination_root,
            interval: Duration::from_secs(interval_seconds),
        })
    }

    /// Directory that is read and mirrored
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Directory that is wiped and rewritten every cycle
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Delay between the end of one cycle and the start of the next
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SyncError::validation("Please provide a valid folder name"));
    }
    if !path.is_dir() {
        return Err(SyncError::validation(format!(
            "Folder {:?} does not exist",
            path
        )));
    }
    Ok(())
}

/// Reject roots that are the same directory or nested either way
///
/// Both paths must exist; they are compared after canonicalization.
pub fn ensure_apart(source_root: &Path, destination_root: &Path) -> Result<()> {
    if utils::is_same_or_nested(destination_root, source_root)? {
        return Err(SyncError::validation(format!(
            "Destination {:?} must not be inside source {:?}",
            destination_root, source_root
        )));
    }
    if utils::is_same_or_nested(source_root, destination_root)? {
        return Err(SyncError::validation(format!(
            "Source {:?} must not be inside destination {:?}",
            source_root, destination_root
        )));
    }
    Ok(())
}

/// Check one folder answer: non-blank and an existing directory
pub fn validate_directory(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SyncError::validation("Please provide a valid folder name"));
    }
    let path = PathBuf::from(trimmed);
    ensure_directory(&path)?;
    Ok(path)
}

/// Parse an interval answer: a positive whole number of seconds
pub fn parse_interval(input: &str) -> Result<u64> {
    let seconds: u64 = input
        .trim()
        .parse()
        .map_err(|_| SyncError::validation(format!("{:?} is not a whole number of seconds", input.trim())))?;
    if seconds == 0 {
        return Err(SyncError::validation("The value must be greater than 0"));
    }
    Ok(seconds)
}
