//! Recursive tree walking
//!
//! [`TreeWalker`] turns a root directory into a lazy sequence of
//! [`FileRecord`]s, one per regular file. Entries are sorted by file name
//! within each directory so two walks over trees with the same shape visit
//! files in the same order. Nothing is cached: every call to
//! [`TreeWalker::walk`] re-reads the disk.

use crate::error::{Result, SyncError};
use crate::utils;
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// A regular file found under a walked root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the walked root, normal components only
    pub relative_path: PathBuf,
    /// Absolute (root-joined) path on disk
    pub absolute_path: PathBuf,
}

impl FileRecord {
    /// Relative path rendered with `/` separators on every platform
    pub fn display_path(&self) -> String {
        utils::slash_path(&self.relative_path)
    }

    /// Counterpart of this file under another root
    pub fn counterpart_in(&self, other_root: &Path) -> PathBuf {
        other_root.join(&self.relative_path)
    }
}

/// Walks a directory tree yielding regular files
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
}

impl TreeWalker {
    /// Create a walker for `root`; symbolic links are not followed
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Start a fresh scan
    ///
    /// # Errors
    ///
    /// - [`SyncError::NotFound`] if the root is missing or not a directory
    pub fn walk(&self) -> Result<Walk> {
        if !self.root.is_dir() {
            return Err(SyncError::NotFound(self.root.clone()));
        }

        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Ok(Walk {
            root: self.root.clone(),
            inner,
        })
    }
}

/// Lazy iterator over the regular files of one scan
///
/// Entries that cannot be read (an unreadable subdirectory, say) come out as
/// `Err` items and the walk carries on with the next entry.
pub struct Walk {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Iterator for Walk {
    type Item = Result<FileRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(SyncError::WalkDir(e))),
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let absolute_path = entry.into_path();
            let record = utils::make_relative(&absolute_path, &self.root).map(|relative_path| {
                trace!("Walked {:?}", relative_path);
                FileRecord {
                    relative_path,
                    absolute_path,
                }
            });
            return Some(record);
        }
    }
}

impl std::fmt::Debug for Walk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walk").field("root", &self.root).finish_non_exhaustive()
    }
}
