//! The session facade.
//!
//! One [`Session`] per execution context wires the whole pipeline together:
//! user action → cascade engine / profile resolver → in-memory snapshot →
//! persistence → change bus → reconciliation scheduler → appliers.
//!
//! The in-memory snapshot is authoritative. For each mutation the sequence
//! persist → notify → re-apply is strictly sequential, and commits are
//! serialized: a store write always carries the snapshot it was committed
//! against, so an older snapshot can never land in the store after a newer
//! one. A failed persist is surfaced only to the caller of that write; the
//! loop keeps running on memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use veil_apply::{ApplierRegistry, DocumentSurface};
use veil_cascade::{CascadeEngine, ProfileResolver};
use veil_store::{load_settings, persist_settings, SettingsStore, StoreChange, StoreError};
use veil_types::{ProfileId, Settings, ToggleKey};

use crate::bus::{BusStats, ChangeBus, SettingsChanged};
use crate::scheduler::{ReconcileScheduler, SchedulerConfig, SchedulerStats, Trigger};

/// Session tuning.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionConfig {
    pub scheduler: SchedulerConfig,
}

/// Background tasks owned by a session.
pub struct SessionTasks {
    pub scheduler: JoinHandle<()>,
    pub store_watch: JoinHandle<()>,
}

/// The one place allowed to mutate the settings snapshot.
pub struct Session {
    engine: CascadeEngine,
    resolver: ProfileResolver,
    store: Arc<dyn SettingsStore>,
    snapshot: Arc<RwLock<Settings>>,
    bus: ChangeBus,
    scheduler: ReconcileScheduler,
    /// Held across every commit, mutation through persist. Store syncs
    /// skip instead of contending, so they can never observe a
    /// half-committed state.
    commit_gate: Mutex<()>,
    /// The last snapshot we successfully wrote to the store. A store event
    /// carrying exactly this content is our own write coming back around,
    /// never something to adopt.
    last_persisted: StdMutex<Option<Settings>>,
    /// Set when a store event was skipped because a commit held the gate;
    /// the commit re-syncs after it finishes.
    store_dirty: AtomicBool,
}

impl Session {
    /// Load settings (healing any stored inconsistency), spawn the
    /// reconciliation loop and the store watcher, and schedule the first
    /// paint.
    pub async fn start(
        store: Arc<dyn SettingsStore>,
        doc: Arc<dyn DocumentSurface>,
        registry: ApplierRegistry,
        config: SessionConfig,
    ) -> (Arc<Self>, SessionTasks) {
        let engine = CascadeEngine::new();
        // Subscribe before the initial load: a write from another context
        // arriving in between must not slip past the watcher.
        let store_rx = store.watch();
        let initial = match load_settings(store.as_ref()).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "loading settings failed, starting from defaults");
                Settings::new()
            }
        };

        let snapshot = Arc::new(RwLock::new(initial));
        let registry = Arc::new(Mutex::new(registry));
        let (scheduler, scheduler_task) =
            ReconcileScheduler::spawn(config.scheduler, snapshot.clone(), doc, registry);

        let session = Arc::new(Self {
            engine,
            resolver: ProfileResolver::new(engine),
            store,
            snapshot,
            bus: ChangeBus::new(),
            scheduler,
            commit_gate: Mutex::new(()),
            last_persisted: StdMutex::new(None),
            store_dirty: AtomicBool::new(false),
        });

        session.scheduler.trigger(Trigger::Settings).await;
        let store_watch = tokio::spawn(Self::watch_store(session.clone(), store_rx));

        (
            session,
            SessionTasks {
                scheduler: scheduler_task,
                store_watch,
            },
        )
    }

    /// Change one toggle; the cascade engine derives the consistent result.
    #[instrument(skip(self))]
    pub async fn set_toggle(&self, key: ToggleKey, value: bool) -> Result<(), StoreError> {
        self.commit(|session, prev| session.engine.apply(prev, key, value))
            .await
    }

    /// Activate a profile (stashing what it overrides).
    #[instrument(skip(self))]
    pub async fn activate_profile(&self, id: ProfileId) -> Result<(), StoreError> {
        self.commit(|session, prev| session.resolver.activate(prev, Some(id)))
            .await
    }

    /// Deactivate the active profile, restoring the stash.
    #[instrument(skip(self))]
    pub async fn deactivate_profile(&self) -> Result<(), StoreError> {
        self.commit(|session, prev| session.resolver.activate(prev, None))
            .await
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Settings {
        self.snapshot.read().await.clone()
    }

    /// Subscribe to committed settings changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChanged> {
        self.bus.subscribe()
    }

    /// Report a mutation of the watched document subtree.
    pub async fn notify_mutation(&self) {
        self.scheduler.trigger(Trigger::Mutation).await;
    }

    /// Synchronous variant for mutation-observer hooks.
    pub fn try_notify_mutation(&self) {
        self.scheduler.try_trigger(Trigger::Mutation);
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn bus_stats(&self) -> BusStats {
        self.bus.stats()
    }

    /// Commit a snapshot transition: swap it in, persist it, broadcast,
    /// and schedule a reconcile run. Commits serialize on the gate, so the
    /// store receives snapshots in commit order and the last commit is
    /// what ends up persisted.
    async fn commit<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&Session, &Settings) -> Settings,
    {
        let (next, changed, profile_changed, persisted) = {
            let _gate = self.commit_gate.lock().await;
            let (next, changed, profile_changed) = {
                let mut guard = self.snapshot.write().await;
                let next = f(self, &guard);
                let changed = guard.diff(&next);
                let profile_changed = guard.active_profile() != next.active_profile();
                *guard = next.clone();
                (next, changed, profile_changed)
            };

            let persisted = persist_settings(self.store.as_ref(), &next).await;
            match &persisted {
                Ok(()) => {
                    *self.last_persisted.lock().unwrap() = Some(next.clone());
                }
                Err(e) => {
                    warn!(error = %e, "persisting settings failed, continuing in memory");
                }
            }
            (next, changed, profile_changed, persisted)
        };

        self.bus.publish(SettingsChanged {
            snapshot: next,
            changed,
            profile_changed,
        });
        self.scheduler.trigger(Trigger::Settings).await;

        // A store event skipped while we held the gate gets its sync now.
        if self.store_dirty.swap(false, Ordering::SeqCst) {
            self.sync_from_store().await;
        }
        persisted
    }

    /// Pull the store's current contents into the snapshot. Used when
    /// another execution context wrote settings.
    async fn sync_from_store(&self) {
        // While a commit is mid-flight the store may hold a half-written
        // mix; the commit re-syncs once it finishes.
        let Ok(_gate) = self.commit_gate.try_lock() else {
            self.store_dirty.store(true, Ordering::SeqCst);
            return;
        };

        let loaded = match load_settings(self.store.as_ref()).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "re-loading settings failed, keeping in-memory snapshot");
                return;
            }
        };

        if self.last_persisted.lock().unwrap().as_ref() == Some(&loaded) {
            // Our own write coming back around. The in-memory snapshot may
            // already be ahead of it (a commit whose persist failed), and
            // memory is authoritative.
            return;
        }

        let (changed, profile_changed) = {
            let mut guard = self.snapshot.write().await;
            if *guard == loaded {
                return;
            }
            let changed = guard.diff(&loaded);
            let profile_changed = guard.active_profile() != loaded.active_profile();
            *guard = loaded.clone();
            (changed, profile_changed)
        };

        debug!(changed = changed.len(), "adopted external settings change");
        self.bus.publish(SettingsChanged {
            snapshot: loaded,
            changed,
            profile_changed,
        });
        self.scheduler.trigger(Trigger::Settings).await;
    }

    async fn watch_store(session: Arc<Session>, mut rx: broadcast::Receiver<StoreChange>) {
        loop {
            match rx.recv().await {
                Ok(_) => session.sync_from_store().await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Only the latest store state matters anyway.
                    debug!(skipped, "store watcher lagged, re-syncing");
                    session.sync_from_store().await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
