//! Fixed-interval scheduling loop
//!
//! The scheduler alternates between two states:
//!
//! ```text
//!   start ──> Running ──cycle done──> Idle ──interval elapsed──> Running ──> ...
//! ```
//!
//! The first cycle runs immediately. Each following cycle starts one interval
//! after the previous one *finished*, so a slow cycle pushes the next one back
//! instead of overlapping with it. Cycles run on tokio's blocking pool because
//! they do synchronous file I/O; the loop awaits each one before sleeping.

use crate::engine::{CycleOutcome, SyncEngine};
use crate::reporter::SyncEvent;

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// What the scheduler is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next cycle to be due
    Idle,
    /// A cycle is in progress
    Running,
}

/// Drives a [`SyncEngine`] on a fixed interval
#[derive(Debug)]
pub struct Scheduler {
    engine: Arc<SyncEngine>,
    interval: Duration,
    state: Mutex<SchedulerState>,
    cycles_run: AtomicU64,
}

impl Scheduler {
    /// Create a scheduler using the interval from the engine's configuration
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            interval: engine.config().interval(),
            engine,
            state: Mutex::new(SchedulerState::Idle),
            cycles_run: AtomicU64::new(0),
        }
    }

    /// Current state
    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Number of cycles completed so far
    pub fn cycles_run(&self) -> u64 {
        self.cycles_run.load(Ordering::Acquire)
    }

    /// Run cycles forever
    ///
    /// There is no shutdown operation; the loop ends when the runtime or the
    /// process is torn down.
    pub async fn run(&self) {
        loop {
            self.tick().await;
            self.wait_for_next_cycle().await;
        }
    }

    /// Run exactly `count` cycles, sleeping the interval between them
    ///
    /// No sleep follows the last cycle.
    pub async fn run_cycles(&self, count: usize) -> Vec<CycleOutcome> {
        let mut outcomes = Vec::with_capacity(count);
        for i in 0..count {
            if i > 0 {
                self.wait_for_next_cycle().await;
            }
            outcomes.push(self.tick().await);
        }
        outcomes
    }

    async fn tick(&self) -> CycleOutcome {
        let cycle = self.cycles_run() + 1;
        self.transition(SchedulerState::Running);

        let engine = Arc::clone(&self.engine);
        let started_at = Utc::now();
        let outcome = match tokio::task::spawn_blocking(move || engine.run_cycle(cycle)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Cycle {} aborted: {}", cycle, e);
                let reason = format!("cycle task aborted: {}", e);
                self.engine
                    .reporter()
                    .report(&SyncEvent::CycleFailed { cycle, reason: reason.clone() });
                CycleOutcome {
                    cycle,
                    started_at,
                    finished_at: Utc::now(),
                    replace_ok: false,
                    replace_error: Some(reason),
                    replace_stats: None,
                    verification: None,
                }
            }
        };

        self.cycles_run.store(cycle, Ordering::Release);
        self.transition(SchedulerState::Idle);
        outcome
    }

    async fn wait_for_next_cycle(&self) {
        self.engine
            .reporter()
            .report(&SyncEvent::NextCycleScheduled { delay: self.interval });
        tokio::time::sleep(self.interval).await;
    }

    fn transition(&self, next: SchedulerState) {
        let mut state = self.state.lock();
        debug!("Scheduler {:?} -> {:?}", *state, next);
        *state = next;
    }
}
