//! Status events and the sinks that receive them
//!
//! The engine never logs directly. It describes what happens as
//! [`SyncEvent`]s and hands them to a [`Reporter`]. [`TracingReporter`] turns
//! them into `tracing` events (the binary installs a subscriber that writes
//! them to the console and the log file); [`MemoryReporter`] keeps them in a
//! buffer so callers can inspect a cycle after the fact.

use crate::hasher::Digest;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// How loudly an event should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Progress and success messages
    Info,
    /// Per-file findings and cycle failures
    Error,
}

/// Structured status event emitted during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A cycle begins
    CycleStarted {
        /// Monotonic cycle number, starting at 1
        cycle: u64,
    },
    /// The old destination tree is about to be removed
    CleanupStarted {
        /// Destination root
        destination: PathBuf,
    },
    /// The old destination tree was removed
    CleanupFinished {
        /// Destination root
        destination: PathBuf,
    },
    /// Copying the source tree begins
    CopyStarted {
        /// Source root
        source: PathBuf,
        /// Destination root
        destination: PathBuf,
    },
    /// Copying finished
    CopyFinished {
        /// Regular files copied
        files: usize,
        /// Total bytes copied
        bytes: u64,
    },
    /// The verifier starts walking the source tree
    VerificationStarted,
    /// A file is about to be compared
    FileVerifying {
        /// Relative path, `/` separated
        path: String,
    },
    /// A file matched its source
    FileVerified {
        /// Relative path, `/` separated
        path: String,
    },
    /// The destination counterpart does not exist
    FileMissing {
        /// Relative path, `/` separated
        path: String,
    },
    /// Source and destination digests differ
    FileMismatch {
        /// Relative path, `/` separated
        path: String,
        /// Digest of the source file
        source: Digest,
        /// Digest of the destination file
        destination: Digest,
    },
    /// A file could not be read while verifying
    FileUnreadable {
        /// Relative path, `/` separated
        path: String,
        /// Error description
        reason: String,
    },
    /// Replace and verify both succeeded
    CycleSucceeded {
        /// Cycle number
        cycle: u64,
        /// Files verified
        files: usize,
    },
    /// The cycle failed; `reason` lists what went wrong
    CycleFailed {
        /// Cycle number
        cycle: u64,
        /// Human-readable failure description
        reason: String,
    },
    /// The next cycle is armed
    NextCycleScheduled {
        /// Delay from now until the next cycle
        delay: Duration,
    },
}

impl SyncEvent {
    /// Severity of this event
    pub fn severity(&self) -> Severity {
        match self {
            SyncEvent::FileMissing { .. }
            | SyncEvent::FileMismatch { .. }
            | SyncEvent::FileUnreadable { .. }
            | SyncEvent::CycleFailed { .. } => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::CycleStarted { cycle } => write!(f, "🔄 Synchronising initiated (cycle {})", cycle),
            SyncEvent::CleanupStarted { destination } => {
                write!(f, "  ⚙️ Removing old files from {:?} folder...", destination)
            }
            SyncEvent::CleanupFinished { destination } => {
                write!(f, "    ✅ Old files removed from {:?} folder", destination)
            }
            SyncEvent::CopyStarted { source, destination } => {
                write!(f, "    ⚙️ Copying files from {:?} to {:?}...", source, destination)
            }
            SyncEvent::CopyFinished { files, bytes } => write!(
                f,
                "    ✅ Copied {} files ({})",
                files,
                crate::utils::format_bytes(*bytes)
            ),
            SyncEvent::VerificationStarted => write!(f, "  ⚙️ Running digest validation..."),
            SyncEvent::FileVerifying { path } => write!(f, "    ⚙️ Verifying digest for file: {}", path),
            SyncEvent::FileVerified { path } => {
                write!(f, "      ✅ Digest validation for file {:?} was successful", path)
            }
            SyncEvent::FileMissing { path } => write!(f, "    ❌ File not found: {}", path),
            SyncEvent::FileMismatch {
                path,
                source,
                destination,
            } => write!(
                f,
                "      ❌ Digest validation failed: {} - source {}, destination {}",
                path, source, destination
            ),
            SyncEvent::FileUnreadable { path, reason } => {
                write!(f, "    ❌ Could not read {}: {}", path, reason)
            }
            SyncEvent::CycleSucceeded { cycle, files } => {
                write!(f, "✅ Synchronisation successful (cycle {}, {} files verified)", cycle, files)
            }
            SyncEvent::CycleFailed { cycle, reason } => {
                write!(f, "❌ Synchronisation failed (cycle {}): {}", cycle, reason)
            }
            SyncEvent::NextCycleScheduled { delay } => {
                write!(f, "⏳ Next synchronisation in {}", humantime::format_duration(*delay))
            }
        }
    }
}

/// Sink for [`SyncEvent`]s
///
/// Implementations must be cheap to call; the engine reports from the
/// thread that runs the cycle.
pub trait Reporter: Send + Sync {
    /// Receive one event
    fn report(&self, event: &SyncEvent);
}

/// Reporter that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &SyncEvent) {
        match event.severity() {
            Severity::Info => info!("{}", event),
            Severity::Error => error!("{}", event),
        }
    }
}

/// Reporter that records every event in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<SyncEvent>>,
}

impl MemoryReporter {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().clone()
    }

    /// Remove and return all recorded events
    pub fn take(&self) -> Vec<SyncEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of recorded error-severity events
    pub fn error_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.severity() == Severity::Error)
            .count()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: &SyncEvent) {
        self.events.lock().push(event.clone());
    }
}
