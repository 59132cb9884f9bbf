//! The settings snapshot.
//!
//! A [`Settings`] value is the single authoritative picture of every toggle,
//! the active profile, and the profile stash. Snapshots are cheap to clone
//! and compare; all mutation flows through the cascade engine and profile
//! resolver entry points so a snapshot observed by any consumer is always
//! internally consistent.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use crate::keys::ToggleKey;
use crate::profile::ProfileId;

/// Wire key carrying the active profile id (nullable).
pub const ACTIVE_PROFILE_KEY: &str = "activeProfile";

/// Prefix for stashed pre-profile values in the flat wire map.
pub const STASH_PREFIX: &str = "stash.";

/// A complete settings snapshot. Missing keys read as `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<ToggleKey, bool>,
    active_profile: Option<ProfileId>,
    profile_stash: BTreeMap<ToggleKey, bool>,
}

impl Settings {
    /// All-false defaults, no profile active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective value of a key; absent means `false`.
    pub fn is_enabled(&self, key: ToggleKey) -> bool {
        self.values.get(&key).copied().unwrap_or(false)
    }

    /// Raw single-key write. This is the cascade engine's write path; other
    /// callers should go through the engine so related keys stay consistent.
    pub fn insert(&mut self, key: ToggleKey, value: bool) {
        self.values.insert(key, value);
    }

    pub fn active_profile(&self) -> Option<ProfileId> {
        self.active_profile
    }

    pub fn set_active_profile(&mut self, profile: Option<ProfileId>) {
        self.active_profile = profile;
    }

    /// The stashed pre-activation values for the active profile's keys.
    pub fn stash(&self) -> &BTreeMap<ToggleKey, bool> {
        &self.profile_stash
    }

    pub fn set_stash(&mut self, stash: BTreeMap<ToggleKey, bool>) {
        self.profile_stash = stash;
    }

    /// Remove and return the stash.
    pub fn take_stash(&mut self) -> BTreeMap<ToggleKey, bool> {
        std::mem::take(&mut self.profile_stash)
    }

    /// Keys whose effective value differs between `self` and `other`.
    /// Compares toggle values only; the active profile and the stash are
    /// not part of the result.
    pub fn diff(&self, other: &Settings) -> Vec<ToggleKey> {
        ToggleKey::ALL
            .iter()
            .copied()
            .filter(|&k| self.is_enabled(k) != other.is_enabled(k))
            .collect()
    }

    /// Flatten to the wire form: a flat string→value map with camelCase
    /// boolean keys, a nullable `activeProfile`, and `stash.`-prefixed
    /// stash entries.
    pub fn to_wire(&self) -> BTreeMap<String, Value> {
        let mut wire = BTreeMap::new();
        for (&key, &value) in &self.values {
            wire.insert(key.as_str().to_string(), Value::Bool(value));
        }
        wire.insert(
            ACTIVE_PROFILE_KEY.to_string(),
            match self.active_profile {
                Some(id) => Value::String(id.as_str().to_string()),
                None => Value::Null,
            },
        );
        for (&key, &value) in &self.profile_stash {
            wire.insert(format!("{STASH_PREFIX}{}", key.as_str()), Value::Bool(value));
        }
        wire
    }

    /// Rebuild a snapshot from the wire form. Unknown keys and non-boolean
    /// values are logged and skipped; absent keys default to `false`. The
    /// result is not guaranteed consistent — callers run it through the
    /// cascade engine's heal step before trusting parent values.
    pub fn from_wire(wire: &BTreeMap<String, Value>) -> Settings {
        let mut settings = Settings::new();
        for (name, value) in wire {
            if name == ACTIVE_PROFILE_KEY {
                settings.active_profile = match value {
                    Value::String(s) => match ProfileId::parse(s) {
                        Some(id) => Some(id),
                        None => {
                            warn!(profile = %s, "ignoring unknown active profile");
                            None
                        }
                    },
                    _ => None,
                };
                continue;
            }

            let (target, key_name) = match name.strip_prefix(STASH_PREFIX) {
                Some(rest) => (true, rest),
                None => (false, name.as_str()),
            };

            let Some(key) = ToggleKey::parse(key_name) else {
                warn!(key = %name, "ignoring unknown settings key");
                continue;
            };
            let Value::Bool(b) = value else {
                warn!(key = %name, value = %value, "ignoring non-boolean settings value");
                continue;
            };

            if target {
                settings.profile_stash.insert(key, *b);
            } else {
                settings.values.insert(key, *b);
            }
        }
        settings
    }
}

/// The boolean subset handed to one visibility applier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedView {
    values: BTreeMap<ToggleKey, bool>,
}

impl ResolvedView {
    /// Project a snapshot onto the given key subset.
    pub fn for_keys(settings: &Settings, keys: &[ToggleKey]) -> Self {
        Self {
            values: keys.iter().map(|&k| (k, settings.is_enabled(k))).collect(),
        }
    }

    /// Resolved value of a key; keys outside the subset read as `false`.
    pub fn get(&self, key: ToggleKey) -> bool {
        self.values.get(&key).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ToggleKey, bool)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }
}
