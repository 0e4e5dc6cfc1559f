//! # treemirror - periodic directory mirroring with verification
//!
//! treemirror keeps a destination directory an exact copy of a source
//! directory. Every cycle it deletes the destination, copies the source tree
//! into its place, and then checks every copied file byte-for-byte by
//! comparing SHA-256 digests. Cycles repeat on a fixed interval, forever.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use treemirror::{Scheduler, SyncConfig, SyncEngine, TracingReporter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(SyncConfig::new("./documents", "/mnt/backup/documents", 300)?);
//! let engine = Arc::new(SyncEngine::new(config, Arc::new(TracingReporter)));
//!
//! // Runs one cycle now, then one every 5 minutes after the previous finished
//! Scheduler::new(engine).run().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## One cycle at a time
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use treemirror::{MemoryReporter, SyncConfig, SyncEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(SyncConfig::new("./src-dir", "./dst-dir", 60)?);
//! let reporter = Arc::new(MemoryReporter::new());
//! let engine = SyncEngine::new(config, reporter.clone());
//!
//! let outcome = engine.run_cycle(1);
//! if !outcome.is_success() {
//!     for event in reporter.events() {
//!         eprintln!("{}", event);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees and limits
//!
//! - The source tree is only ever read.
//! - The destination tree is owned by treemirror and rewritten every cycle;
//!   anything written there between cycles is lost.
//! - Verification walks the source side only. Files present only in the
//!   destination are not reported.
//! - No lock is taken against other processes touching either tree during a
//!   cycle. Concurrent writers can cause spurious mismatches.
//!
//! ## Module Organization
//!
//! - [`config`]: validated, immutable configuration
//! - [`hasher`]: streaming SHA-256 file digests
//! - [`walker`]: lazy recursive file enumeration
//! - [`verification`]: source/destination comparison
//! - [`replacer`]: wipe-and-recopy of the destination
//! - [`engine`]: one replace-then-verify cycle
//! - [`scheduler`]: the fixed-interval loop
//! - [`reporter`]: structured status events
//! - [`prompt`], [`logging`]: binary-facing helpers
//! - [`error`]: error types

pub mod config;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod prompt;
pub mod replacer;
pub mod reporter;
pub mod scheduler;
pub mod verification;
pub mod walker;

mod utils;

pub use config::SyncConfig;
pub use engine::{CycleOutcome, SyncEngine};
pub use error::{Result, SyncError};
pub use hasher::{digest_file, Digest};
pub use replacer::{ReplaceStats, Replacer};
pub use reporter::{MemoryReporter, Reporter, Severity, SyncEvent, TracingReporter};
pub use scheduler::{Scheduler, SchedulerState};
pub use verification::{FailureEntry, VerificationResult, Verifier};
pub use walker::{FileRecord, TreeWalker};
