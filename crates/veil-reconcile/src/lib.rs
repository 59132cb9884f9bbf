//! # veil-reconcile
//!
//! The event-driven half of Veil: a debounced reconciliation scheduler, a
//! change propagation bus, and the [`Session`] facade tying store, cascade
//! engine, profile resolver, and appliers into one pipeline.
//!
//! Everything here is cooperative and single-pipeline: all snapshot writes
//! funnel through the session, pending reconcile runs are replaced (never
//! queued) by newer triggers, and no failure below the session — store
//! outage, applier error, lagged subscriber — can stop the loop.

pub mod bus;
pub mod scheduler;
pub mod session;

pub use bus::{BusStats, ChangeBus, SettingsChanged};
pub use scheduler::{ReconcileScheduler, SchedulerConfig, SchedulerStats, Trigger};
pub use session::{Session, SessionConfig, SessionTasks};
