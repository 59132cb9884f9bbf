//! The reconciliation scheduler.
//!
//! A debounced change-detector: triggers (document mutations, settings
//! changes) move it from `Idle` to `ScheduledRun`; further triggers while
//! scheduled reset the timer instead of queueing extra runs. When the timer
//! fires it re-reads the latest snapshot, fans it out through the applier
//! registry, and goes back to `Idle`. The loop lives for the process
//! lifetime and nothing an applier does can kill it.
//!
//! Several independent schedulers may run side by side, each scoped to its
//! own appliers and document subtree, trading redundant observation for a
//! smaller blast radius per mutation.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use veil_apply::{ApplierRegistry, DocumentSurface};
use veil_types::Settings;

/// What woke the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The watched document subtree mutated.
    Mutation,
    /// The settings snapshot changed.
    Settings,
}

/// Scheduler tuning.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    /// How long to wait after the last trigger before running. Tens of
    /// milliseconds absorbs virtual-scroll insert storms without visible
    /// flicker.
    pub debounce: Duration,
    /// Trigger queue capacity; overflow drops triggers, which is harmless
    /// because one queued trigger already guarantees a run.
    pub queue_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(50),
            queue_capacity: 64,
        }
    }
}

/// Counters for observability and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Completed reconciliation runs.
    pub runs: u64,
    /// Triggers absorbed into an already-scheduled run.
    pub coalesced: u64,
    /// Applier failures across all runs.
    pub applier_failures: u64,
}

/// Handle to a running reconciliation loop.
pub struct ReconcileScheduler {
    tx: mpsc::Sender<Trigger>,
    stats: Arc<StdMutex<SchedulerStats>>,
}

impl ReconcileScheduler {
    /// Spawn the loop. The returned task runs until every handle (and its
    /// trigger sender) is dropped; a last pending run still executes on
    /// shutdown.
    pub fn spawn(
        config: SchedulerConfig,
        snapshot: Arc<RwLock<Settings>>,
        doc: Arc<dyn DocumentSurface>,
        registry: Arc<Mutex<ApplierRegistry>>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(config.queue_capacity);
        let stats = Arc::new(StdMutex::new(SchedulerStats::default()));
        let loop_stats = stats.clone();

        let handle = tokio::spawn(async move {
            let mut open = true;
            while open {
                // Idle: wait for the first trigger.
                match rx.recv().await {
                    Some(trigger) => debug!(?trigger, "reconcile scheduled"),
                    None => break,
                }

                // ScheduledRun: every further trigger resets the timer.
                loop {
                    tokio::select! {
                        _ = sleep(config.debounce) => break,
                        more = rx.recv() => match more {
                            Some(_) => {
                                loop_stats.lock().unwrap().coalesced += 1;
                            }
                            None => {
                                open = false;
                                break;
                            }
                        },
                    }
                }

                let current = snapshot.read().await.clone();
                let report = registry.lock().await.apply_all(doc.as_ref(), &current);
                if report.failed > 0 {
                    warn!(failed = report.failed, "appliers failed during reconcile run");
                }

                let mut s = loop_stats.lock().unwrap();
                s.runs += 1;
                s.applier_failures += report.failed as u64;
            }
            debug!("reconcile loop stopped");
        });

        (Self { tx, stats }, handle)
    }

    /// Request a run (or fold into the pending one).
    pub async fn trigger(&self, trigger: Trigger) {
        let _ = self.tx.send(trigger).await;
    }

    /// Non-async trigger for synchronous callers such as mutation hooks.
    /// A full queue means a run is already guaranteed; the drop is fine.
    pub fn try_trigger(&self, trigger: Trigger) {
        let _ = self.tx.try_send(trigger);
    }

    pub fn stats(&self) -> SchedulerStats {
        *self.stats.lock().unwrap()
    }
}
