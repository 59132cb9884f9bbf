//! # veil-store
//!
//! The settings persistence boundary. The real extension storage lives on
//! the other side of the [`SettingsStore`] trait; the core only assumes a
//! flat string→value map with `get`/`set`/`remove` and change notification.
//!
//! Loading goes through [`load_settings`], which treats missing keys as
//! `false` and runs the result through the cascade engine's heal step so a
//! stale or externally edited store can never hand the core an inconsistent
//! snapshot.

pub mod error;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use veil_cascade::CascadeEngine;
use veil_types::{Settings, ToggleKey, ACTIVE_PROFILE_KEY, STASH_PREFIX};

pub use error::{Result, StoreError};
pub use memory::{FlakySettingsStore, InMemorySettingsStore, SlowSettingsStore};

/// A change notification from the store: the entries that were written.
#[derive(Clone, Debug)]
pub struct StoreChange {
    pub entries: BTreeMap<String, Value>,
}

/// Durable flat key→value map with change notification.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the given keys. Absent keys are simply missing from the result.
    async fn get(&self, keys: &[String]) -> Result<BTreeMap<String, Value>>;

    /// Write the given entries.
    async fn set(&self, entries: BTreeMap<String, Value>) -> Result<()>;

    /// Delete the given keys. Absent keys are fine.
    async fn remove(&self, keys: &[String]) -> Result<()>;

    /// Subscribe to writes, including writes from other execution contexts.
    fn watch(&self) -> broadcast::Receiver<StoreChange>;
}

/// Every wire key the core ever reads: all toggles, their stash shadows,
/// and the active profile marker.
pub fn known_wire_keys() -> Vec<String> {
    let mut keys: Vec<String> = ToggleKey::ALL.iter().map(|k| k.as_str().to_string()).collect();
    keys.extend(
        ToggleKey::ALL
            .iter()
            .map(|k| format!("{STASH_PREFIX}{}", k.as_str())),
    );
    keys.push(ACTIVE_PROFILE_KEY.to_string());
    keys
}

/// Load a snapshot from the store. Missing keys default to `false`; the
/// result is healed so AND parents agree with their children even if the
/// stored values did not.
pub async fn load_settings(store: &dyn SettingsStore) -> Result<Settings> {
    let wire = store.get(&known_wire_keys()).await?;
    let loaded = Settings::from_wire(&wire);
    let healed = CascadeEngine::new().heal(&loaded);
    if healed != loaded {
        debug!("healed inconsistent stored snapshot");
    }
    Ok(healed)
}

/// Persist a snapshot as its flat wire form. Known keys the snapshot no
/// longer carries (a cleared stash, most commonly) are deleted, so the
/// store always holds exactly the wire image of the snapshot.
pub async fn persist_settings(store: &dyn SettingsStore, settings: &Settings) -> Result<()> {
    let wire = settings.to_wire();
    let stale: Vec<String> = known_wire_keys()
        .into_iter()
        .filter(|k| !wire.contains_key(k))
        .collect();
    store.set(wire).await?;
    store.remove(&stale).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_types::ToggleKey::*;

    #[tokio::test]
    async fn test_load_defaults_from_empty_store() {
        let store = InMemorySettingsStore::new();
        let settings = load_settings(&store).await.unwrap();
        assert_eq!(settings, Settings::new());
    }

    #[tokio::test]
    async fn test_persist_then_load_round_trips() {
        let store = InMemorySettingsStore::new();
        let engine = CascadeEngine::new();

        let settings = engine.apply(&Settings::new(), HideMasthead, true);
        persist_settings(&store, &settings).await.unwrap();

        let loaded = load_settings(&store).await.unwrap();
        assert_eq!(loaded.diff(&settings), Vec::new());
        assert!(loaded.is_enabled(HideSearchbar));
    }

    #[tokio::test]
    async fn test_load_heals_stale_parent() {
        let store = InMemorySettingsStore::new();
        store
            .set(BTreeMap::from([
                ("hideActions".to_string(), Value::Bool(true)),
                ("hideActionShare".to_string(), Value::Bool(true)),
            ]))
            .await
            .unwrap();

        let loaded = load_settings(&store).await.unwrap();
        assert!(!loaded.is_enabled(HideActions));
        assert!(loaded.is_enabled(HideActionShare));
    }

    #[tokio::test]
    async fn test_load_ignores_foreign_keys() {
        let store = InMemorySettingsStore::new();
        store
            .set(BTreeMap::from([
                ("hideShorts".to_string(), Value::Bool(true)),
                ("schemaVersion".to_string(), Value::from(3)),
            ]))
            .await
            .unwrap();

        // Foreign keys are not in the known key set, so they never reach the
        // snapshot parser.
        let loaded = load_settings(&store).await.unwrap();
        assert!(loaded.is_enabled(HideShorts));
    }

    #[tokio::test]
    async fn test_persist_deletes_keys_the_snapshot_dropped() {
        let store = InMemorySettingsStore::new();
        let mut with_stash = Settings::new();
        with_stash.set_stash(BTreeMap::from([(HideShortsShelf, true)]));
        persist_settings(&store, &with_stash).await.unwrap();

        // The stash was cleared in memory; re-persisting must not leave the
        // old stash entry behind in the store.
        persist_settings(&store, &Settings::new()).await.unwrap();
        let loaded = load_settings(&store).await.unwrap();
        assert!(loaded.stash().is_empty());
    }

    #[tokio::test]
    async fn test_watch_sees_writes() {
        let store = InMemorySettingsStore::new();
        let mut rx = store.watch();

        let entries = BTreeMap::from([("hideShorts".to_string(), Value::Bool(true))]);
        store.set(entries.clone()).await.unwrap();

        let change = rx.recv().await.unwrap();
        assert_eq!(change.entries, entries);
    }

    #[tokio::test]
    async fn test_flaky_store_surfaces_errors() {
        let store = FlakySettingsStore::new();
        store.fail_writes(true);

        let err = persist_settings(&store, &Settings::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        // Reads still work; the store never lies about what it holds.
        assert!(load_settings(&store).await.is_ok());
    }
}
