//! Full wipe-and-recopy of the destination tree
//!
//! [`Replacer::replace`] removes whatever is at the destination root and
//! copies the source tree into a freshly created directory in its place.
//! There is no rollback: if the copy fails halfway the destination is left
//! partial, and the verification step of the same cycle reports the gap.
//! The next cycle starts from scratch anyway.

use crate::error::{Result, SyncError};
use crate::reporter::{Reporter, SyncEvent};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Counters for one replace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceStats {
    /// Whether an old destination tree was removed first
    pub removed_existing: bool,
    /// Regular files copied
    pub files_copied: usize,
    /// Directories created below the destination root
    pub directories_created: usize,
    /// Total bytes copied
    pub bytes_copied: u64,
}

/// Deletes the destination tree and recopies the source into it
pub struct Replacer {
    reporter: Arc<dyn Reporter>,
}

impl Replacer {
    /// Create a replacer reporting progress to `reporter`
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    /// Replace `destination_root` with a copy of `source_root`
    ///
    /// # Errors
    ///
    /// - [`SyncError::NotFound`] if the source root is missing (nothing is deleted)
    /// - [`SyncError::IoAt`] if the old tree cannot be removed, or a file or
    ///   directory cannot be read or written during the copy
    /// - [`SyncError::DestinationExists`] if the destination is still present
    ///   after removal
    pub fn replace(&self, source_root: &Path, destination_root: &Path) -> Result<ReplaceStats> {
        if !source_root.is_dir() {
            return Err(SyncError::NotFound(source_root.to_path_buf()));
        }

        let mut stats = ReplaceStats::default();

        if destination_root.exists() {
            self.reporter.report(&SyncEvent::CleanupStarted {
                destination: destination_root.to_path_buf(),
            });
            fs::remove_dir_all(destination_root).map_err(|e| SyncError::io_at(destination_root, e))?;
            stats.removed_existing = true;
            self.reporter.report(&SyncEvent::CleanupFinished {
                destination: destination_root.to_path_buf(),
            });
        }

        if destination_root.exists() {
            return Err(SyncError::DestinationExists(destination_root.to_path_buf()));
        }

        self.reporter.report(&SyncEvent::CopyStarted {
            source: source_root.to_path_buf(),
            destination: destination_root.to_path_buf(),
        });
        fs::create_dir_all(destination_root).map_err(|e| SyncError::io_at(destination_root, e))?;
        copy_tree(source_root, destination_root, &mut stats)?;

        debug!(
            "Copied {} files and {} directories into {:?}",
            stats.files_copied, stats.directories_created, destination_root
        );
        self.reporter.report(&SyncEvent::CopyFinished {
            files: stats.files_copied,
            bytes: stats.bytes_copied,
        });

        Ok(stats)
    }
}

impl std::fmt::Debug for Replacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replacer").finish_non_exhaustive()
    }
}

fn copy_tree(source_root: &Path, destination_root: &Path, stats: &mut ReplaceStats) -> Result<()> {
    let walker = WalkDir::new(source_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        let relative = utils::make_relative(entry.path(), source_root)?;
        let target = destination_root.join(&relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir(&target).map_err(|e| SyncError::io_at(&target, e))?;
            stats.directories_created += 1;
        } else if file_type.is_file() {
            let bytes = fs::copy(entry.path(), &target).map_err(|e| SyncError::io_at(entry.path(), e))?;
            stats.files_copied += 1;
            stats.bytes_copied += bytes;
            trace!("Copied {:?} ({} bytes)", relative, bytes);
        } else {
            trace!("Skipping non-regular entry {:?}", relative);
        }
    }

    Ok(())
}
