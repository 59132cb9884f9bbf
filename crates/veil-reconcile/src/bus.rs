//! The change propagation bus.
//!
//! Connects settings mutations to everything downstream: each committed
//! snapshot is broadcast as one [`SettingsChanged`] envelope. Receivers that
//! lag are allowed to drop intermediate envelopes; only the latest snapshot
//! matters, so skipping ahead is correct behavior, not data loss.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use veil_types::{Settings, ToggleKey};

/// A committed settings mutation: the full snapshot after it, plus which
/// keys changed effectively.
#[derive(Clone, Debug)]
pub struct SettingsChanged {
    pub snapshot: Settings,
    /// Toggle keys whose effective value changed. Covers toggles only;
    /// profile and stash movement shows up in `profile_changed` instead.
    pub changed: Vec<ToggleKey>,
    /// Whether the active profile changed in this commit. Can be `true`
    /// with an empty `changed` list when a profile's overrides happen to
    /// match the values already in place.
    pub profile_changed: bool,
}

/// Bus statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusStats {
    pub published: u64,
    pub subscribers: usize,
}

/// Broadcast fan-out of settings changes.
pub struct ChangeBus {
    sender: broadcast::Sender<SettingsChanged>,
    published: AtomicU64,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            sender,
            published: AtomicU64::new(0),
        }
    }

    /// Publish a change. No subscribers is fine.
    pub fn publish(&self, event: SettingsChanged) {
        self.published.fetch_add(1, Ordering::Relaxed);
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChanged> {
        self.sender.subscribe()
    }

    pub fn stats(&self) -> BusStats {
        BusStats {
            published: self.published.load(Ordering::Relaxed),
            subscribers: self.sender.receiver_count(),
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}
