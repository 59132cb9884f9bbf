//! In-memory store implementations.
//!
//! [`InMemorySettingsStore`] backs tests and the playground;
//! [`FlakySettingsStore`] simulates an unavailable backend so callers can
//! exercise the persistence-failure path; [`SlowSettingsStore`] adds write
//! latency so callers can race commits against an in-flight persist.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use crate::error::{Result, StoreError};
use crate::{SettingsStore, StoreChange};

/// Flat key→value map held in memory, with broadcast change notification.
pub struct InMemorySettingsStore {
    entries: RwLock<BTreeMap<String, Value>>,
    changes: broadcast::Sender<StoreChange>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            entries: RwLock::new(BTreeMap::new()),
            changes,
        }
    }

    /// Write entries as if another execution context did it: persists and
    /// notifies watchers exactly like [`SettingsStore::set`].
    pub async fn write_external(&self, entries: BTreeMap<String, Value>) {
        let mut guard = self.entries.write().await;
        for (key, value) in &entries {
            guard.insert(key.clone(), value.clone());
        }
        drop(guard);
        let _ = self.changes.send(StoreChange { entries });
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, keys: &[String]) -> Result<BTreeMap<String, Value>> {
        let guard = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| guard.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    async fn set(&self, entries: BTreeMap<String, Value>) -> Result<()> {
        let mut guard = self.entries.write().await;
        for (key, value) in &entries {
            guard.insert(key.clone(), value.clone());
        }
        drop(guard);
        // No receivers is fine; notification is best-effort.
        let _ = self.changes.send(StoreChange { entries });
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let mut guard = self.entries.write().await;
        let removed: BTreeMap<String, Value> = keys
            .iter()
            .filter(|k| guard.remove(*k).is_some())
            .map(|k| (k.clone(), Value::Null))
            .collect();
        drop(guard);
        if !removed.is_empty() {
            let _ = self.changes.send(StoreChange { entries: removed });
        }
        Ok(())
    }

    fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

/// An in-memory store whose writes can be made to fail on demand.
pub struct FlakySettingsStore {
    inner: InMemorySettingsStore,
    fail_writes: AtomicBool,
}

impl FlakySettingsStore {
    pub fn new() -> Self {
        Self {
            inner: InMemorySettingsStore::new(),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Default for FlakySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for FlakySettingsStore {
    async fn get(&self, keys: &[String]) -> Result<BTreeMap<String, Value>> {
        self.inner.get(keys).await
    }

    async fn set(&self, entries: BTreeMap<String, Value>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".into()));
        }
        self.inner.set(entries).await
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".into()));
        }
        self.inner.remove(keys).await
    }

    fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.watch()
    }
}

/// An in-memory store whose next `delayed_writes` writes take `delay` to
/// complete, for exercising commits that race a persist still in flight.
pub struct SlowSettingsStore {
    inner: InMemorySettingsStore,
    delay: Duration,
    delayed_writes: AtomicU32,
}

impl SlowSettingsStore {
    pub fn new(delay: Duration, delayed_writes: u32) -> Self {
        Self {
            inner: InMemorySettingsStore::new(),
            delay,
            delayed_writes: AtomicU32::new(delayed_writes),
        }
    }

    async fn maybe_delay(&self) {
        let delayed = self
            .delayed_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if delayed {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl SettingsStore for SlowSettingsStore {
    async fn get(&self, keys: &[String]) -> Result<BTreeMap<String, Value>> {
        self.inner.get(keys).await
    }

    async fn set(&self, entries: BTreeMap<String, Value>) -> Result<()> {
        self.maybe_delay().await;
        self.inner.set(entries).await
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        self.inner.remove(keys).await
    }

    fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.watch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_only_present_keys() {
        let store = InMemorySettingsStore::new();
        store
            .set(BTreeMap::from([("hideShorts".to_string(), Value::Bool(true))]))
            .await
            .unwrap();

        let result = store
            .get(&["hideShorts".to_string(), "hideMixes".to_string()])
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("hideShorts"), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_external_write_notifies_watchers() {
        let store = InMemorySettingsStore::new();
        let mut rx = store.watch();

        store
            .write_external(BTreeMap::from([(
                "hideMixes".to_string(),
                Value::Bool(true),
            )]))
            .await;

        let change = rx.recv().await.unwrap();
        assert_eq!(change.entries.get("hideMixes"), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_remove_deletes_and_notifies() {
        let store = InMemorySettingsStore::new();
        store
            .set(BTreeMap::from([("hideShorts".to_string(), Value::Bool(true))]))
            .await
            .unwrap();

        let mut rx = store.watch();
        store.remove(&["hideShorts".to_string()]).await.unwrap();

        assert!(store.get(&["hideShorts".to_string()]).await.unwrap().is_empty());
        let change = rx.recv().await.unwrap();
        assert_eq!(change.entries.get("hideShorts"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_flaky_store_recovers() {
        let store = FlakySettingsStore::new();
        store.fail_writes(true);
        assert!(store.set(BTreeMap::new()).await.is_err());

        store.fail_writes(false);
        assert!(store.set(BTreeMap::new()).await.is_ok());
    }
}
