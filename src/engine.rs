//! One mirror cycle: replace, then verify
//!
//! [`SyncEngine::run_cycle`] is the cycle boundary. Every error raised by the
//! replacer or the verifier is caught here, reported, and folded into the
//! returned [`CycleOutcome`]; nothing escapes to the scheduler.

use crate::config::SyncConfig;
use crate::replacer::{ReplaceStats, Replacer};
use crate::reporter::{Reporter, SyncEvent};
use crate::verification::{VerificationResult, Verifier};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything that happened during one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleOutcome {
    /// Cycle number, starting at 1
    pub cycle: u64,
    /// When the cycle started
    pub started_at: DateTime<Utc>,
    /// When the cycle finished
    pub finished_at: DateTime<Utc>,
    /// Whether the replace step completed
    pub replace_ok: bool,
    /// Error that aborted the replace step, if any
    pub replace_error: Option<String>,
    /// Replace counters when the replace step completed
    pub replace_stats: Option<ReplaceStats>,
    /// Verification result; `None` when the replace failed or verification
    /// could not start
    pub verification: Option<VerificationResult>,
}

impl CycleOutcome {
    /// Replace succeeded and verification found no discrepancies
    pub fn is_success(&self) -> bool {
        self.replace_ok
            && self
                .verification
                .as_ref()
                .is_some_and(|v| v.overall_success)
    }
}

/// Runs cycles for one [`SyncConfig`]
pub struct SyncEngine {
    config: Arc<SyncConfig>,
    reporter: Arc<dyn Reporter>,
    replacer: Replacer,
    verifier: Verifier,
}

impl SyncEngine {
    /// Create an engine for `config` that reports to `reporter`
    pub fn new(config: Arc<SyncConfig>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            replacer: Replacer::new(reporter.clone()),
            verifier: Verifier::new(reporter.clone()),
            config,
            reporter,
        }
    }

    /// Configuration this engine mirrors
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Reporter events are sent to
    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    /// Run one full cycle
    pub fn run_cycle(&self, cycle: u64) -> CycleOutcome {
        let started_at = Utc::now();
        self.reporter.report(&SyncEvent::CycleStarted { cycle });

        let source = self.config.source_root();
        let destination = self.config.destination_root();

        let mut outcome = CycleOutcome {
            cycle,
            started_at,
            finished_at: started_at,
            replace_ok: false,
            replace_error: None,
            replace_stats: None,
            verification: None,
        };

        match self.replacer.replace(source, destination) {
            Ok(stats) => {
                outcome.replace_ok = true;
                outcome.replace_stats = Some(stats);
            }
            Err(e) => {
                warn!("Replace failed in cycle {}: {}", cycle, e);
                outcome.replace_error = Some(e.user_message());
                outcome.finished_at = Utc::now();
                self.reporter.report(&SyncEvent::CycleFailed {
                    cycle,
                    reason: format!("could not replace destination: {}", e.user_message()),
                });
                return outcome;
            }
        }

        let reason = match self.verifier.verify(source, destination) {
            Ok(result) => {
                let reason = (!result.overall_success).then(|| result.summary());
                outcome.verification = Some(result);
                reason
            }
            Err(e) => Some(format!("could not verify: {}", e.user_message())),
        };
        outcome.finished_at = Utc::now();

        match reason {
            None => {
                let files = outcome
                    .verification
                    .as_ref()
                    .map_or(0, |v| v.files_checked);
                self.reporter.report(&SyncEvent::CycleSucceeded { cycle, files });
            }
            Some(reason) => {
                self.reporter.report(&SyncEvent::CycleFailed { cycle, reason });
            }
        }

        debug!(
            "Cycle {} took {}ms",
            cycle,
            (outcome.finished_at - outcome.started_at).num_milliseconds()
        );
        outcome
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
