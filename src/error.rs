//! Error types for the treemirror library
//!
//! This module defines the error taxonomy for mirror cycles. Errors are
//! split by how far they propagate:
//!
//! - [`SyncError::Validation`] never reaches the core; it is raised while
//!   building a [`SyncConfig`](crate::config::SyncConfig) and handled by
//!   re-prompting.
//! - [`SyncError::NotFound`], [`SyncError::IoAt`] and friends abort the
//!   current cycle but never the process.
//! - Per-file problems found while verifying are not errors at all; they are
//!   collected as [`FailureEntry`](crate::verification::FailureEntry) values.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the treemirror library
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for all treemirror operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid startup input (non-directory path, zero interval, overlapping roots)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A root directory vanished between scheduling and execution
    #[error("Directory not found: {0:?}")]
    NotFound(PathBuf),

    /// I/O errors without a known path
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O errors tied to a specific file or directory
    #[error("IO error at {path:?}: {source}")]
    IoAt {
        /// Path the operation was working on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Walk directory error from walkdir crate
    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Destination still present after cleanup
    #[error("Destination already exists after cleanup: {0:?}")]
    DestinationExists(PathBuf),

    /// Errors during JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SyncError {
    /// Create a validation error with a custom message
    pub fn validation(msg: impl Into<String>) -> Self {
        SyncError::Validation(msg.into())
    }

    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        SyncError::Internal(msg.into())
    }

    /// Attach a path to an I/O error
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::IoAt {
            path: path.into(),
            source,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            SyncError::NotFound(path) => {
                format!(
                    "Directory {:?} does not exist. It may have been moved or unmounted; the next cycle will retry.",
                    path
                )
            }
            SyncError::IoAt { path, source }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                format!(
                    "Permission denied for {:?}. Check file permissions or close programs holding the file open.",
                    path
                )
            }
            SyncError::DestinationExists(path) => {
                format!(
                    "Destination {:?} reappeared after being removed. Another process may be writing to it.",
                    path
                )
            }
            _ => self.to_string(),
        }
    }
}
