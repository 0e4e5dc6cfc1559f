//! Mirror verification and integrity checking
//!
//! After a copy, the [`Verifier`] walks the source tree and checks that every
//! source file has a byte-identical counterpart at the same relative path in
//! the destination. Comparison is by SHA-256 digest.
//!
//! ## Findings, not errors
//!
//! A missing or different destination file is a *finding*: it is recorded in
//! the [`VerificationResult`] and the scan moves on to the next file, so one
//! run reports every discrepancy. The same holds for a file that cannot be
//! read. The only hard error is a source root that does not exist.
//!
//! ## Orphans
//!
//! Only files enumerated from the source side are checked. Files that exist
//! only in the destination are not reported.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use treemirror::reporter::TracingReporter;
//! use treemirror::verification::Verifier;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let verifier = Verifier::new(Arc::new(TracingReporter));
//! let result = verifier.verify(Path::new("photos"), Path::new("/mnt/backup/photos"))?;
//! if !result.overall_success {
//!     for failure in &result.failures {
//!         eprintln!("{}", failure);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SyncError};
use crate::hasher::{digest_file, Digest};
use crate::reporter::{Reporter, SyncEvent};
use crate::walker::TreeWalker;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// One discrepancy between the source and destination trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureEntry {
    /// No file at the expected destination path
    MissingFile {
        /// Relative path, `/` separated
        relative_path: String,
    },
    /// Destination content differs from the source
    DigestMismatch {
        /// Relative path, `/` separated
        relative_path: String,
        /// Digest of the source file
        source_digest: Digest,
        /// Digest of the destination file
        destination_digest: Digest,
    },
    /// The file (or the directory holding it) could not be read
    Unreadable {
        /// Relative path, `/` separated, or the walked path when unknown
        relative_path: String,
        /// Error description
        reason: String,
    },
}

impl FailureEntry {
    /// Relative path the finding refers to
    pub fn relative_path(&self) -> &str {
        match self {
            FailureEntry::MissingFile { relative_path }
            | FailureEntry::DigestMismatch { relative_path, .. }
            | FailureEntry::Unreadable { relative_path, .. } => relative_path,
        }
    }
}

impl fmt::Display for FailureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureEntry::MissingFile { relative_path } => write!(f, "missing: {}", relative_path),
            FailureEntry::DigestMismatch {
                relative_path,
                source_digest,
                destination_digest,
            } => write!(
                f,
                "digest mismatch: {} (source {}, destination {})",
                relative_path, source_digest, destination_digest
            ),
            FailureEntry::Unreadable {
                relative_path,
                reason,
            } => write!(f, "unreadable: {} ({})", relative_path, reason),
        }
    }
}

/// Outcome of one verification pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// True iff no failures were recorded
    pub overall_success: bool,
    /// Findings in walk order
    pub failures: Vec<FailureEntry>,
    /// Source files visited
    pub files_checked: usize,
    /// Time taken in milliseconds
    pub verification_time_ms: u64,
}

impl VerificationResult {
    fn from_failures(failures: Vec<FailureEntry>, files_checked: usize, elapsed_ms: u64) -> Self {
        Self {
            overall_success: failures.is_empty(),
            failures,
            files_checked,
            verification_time_ms: elapsed_ms,
        }
    }

    /// Number of `MissingFile` findings
    pub fn missing_count(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| matches!(f, FailureEntry::MissingFile { .. }))
            .count()
    }

    /// Number of `DigestMismatch` findings
    pub fn mismatch_count(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| matches!(f, FailureEntry::DigestMismatch { .. }))
            .count()
    }

    /// Get a summary of the verification
    pub fn summary(&self) -> String {
        if self.overall_success {
            format!(
                "{} files verified in {}ms",
                self.files_checked, self.verification_time_ms
            )
        } else {
            let listed = self
                .failures
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            format!(
                "{} of {} files failed verification: {}",
                self.failures.len(),
                self.files_checked,
                listed
            )
        }
    }
}

/// Compares a destination tree against its source, file by file
pub struct Verifier {
    reporter: Arc<dyn Reporter>,
}

impl Verifier {
    /// Create a verifier that reports per-file progress to `reporter`
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    /// Verify that `destination_root` mirrors `source_root`
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`](crate::error::SyncError::NotFound) if
    /// the source root is missing. Everything else is reported in the result.
    pub fn verify(&self, source_root: &Path, destination_root: &Path) -> Result<VerificationResult> {
        let start = Instant::now();
        let walk = TreeWalker::new(source_root).walk()?;
        self.reporter.report(&SyncEvent::VerificationStarted);

        let mut failures = Vec::new();
        let mut files_checked = 0;

        for record in walk {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let relative_path = match &e {
                        SyncError::WalkDir(walk_err) => walk_err
                            .path()
                            .and_then(|p| p.strip_prefix(source_root).ok())
                            .map(crate::utils::slash_path)
                            .unwrap_or_else(|| source_root.display().to_string()),
                        _ => source_root.display().to_string(),
                    };
                    let failure = FailureEntry::Unreadable {
                        relative_path,
                        reason: e.to_string(),
                    };
                    self.record(&mut failures, failure);
                    continue;
                }
            };

            files_checked += 1;
            let path = record.display_path();
            let destination_path = record.counterpart_in(destination_root);

            if !destination_path.exists() {
                self.record(&mut failures, FailureEntry::MissingFile { relative_path: path });
                continue;
            }

            self.reporter.report(&SyncEvent::FileVerifying { path: path.clone() });

            let digests = digest_file(&record.absolute_path)
                .and_then(|source| digest_file(&destination_path).map(|dest| (source, dest)));

            match digests {
                Ok((source_digest, destination_digest)) if source_digest == destination_digest => {
                    self.reporter.report(&SyncEvent::FileVerified { path });
                }
                Ok((source_digest, destination_digest)) => {
                    self.record(
                        &mut failures,
                        FailureEntry::DigestMismatch {
                            relative_path: path,
                            source_digest,
                            destination_digest,
                        },
                    );
                }
                Err(e) => {
                    self.record(
                        &mut failures,
                        FailureEntry::Unreadable {
                            relative_path: path,
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Verified {} files in {}ms, {} failures",
            files_checked,
            elapsed_ms,
            failures.len()
        );

        Ok(VerificationResult::from_failures(failures, files_checked, elapsed_ms))
    }

    fn record(&self, failures: &mut Vec<FailureEntry>, failure: FailureEntry) {
        let event = match &failure {
            FailureEntry::MissingFile { relative_path } => SyncEvent::FileMissing {
                path: relative_path.clone(),
            },
            FailureEntry::DigestMismatch {
                relative_path,
                source_digest,
                destination_digest,
            } => SyncEvent::FileMismatch {
                path: relative_path.clone(),
                source: *source_digest,
                destination: *destination_digest,
            },
            FailureEntry::Unreadable {
                relative_path,
                reason,
            } => SyncEvent::FileUnreadable {
                path: relative_path.clone(),
                reason: reason.clone(),
            },
        };
        self.reporter.report(&event);
        failures.push(failure);
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier").finish_non_exhaustive()
    }
}
