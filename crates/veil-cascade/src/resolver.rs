//! The profile resolver: atomic apply/revert of override bundles.
//!
//! Activating a profile stashes the current values of exactly the keys the
//! profile overrides, applies each override through the cascade engine (so
//! nested cascades re-trigger), and records the profile as active. Switching
//! A→B restores A's stash before B's overrides are applied; overrides never
//! stack.

use std::collections::BTreeMap;

use tracing::debug;

use veil_types::{profile, ProfileId, Settings};

use crate::engine::CascadeEngine;

/// Applies and reverts profiles on top of the cascade engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileResolver {
    engine: CascadeEngine,
}

impl ProfileResolver {
    pub fn new(engine: CascadeEngine) -> Self {
        Self { engine }
    }

    /// Move the snapshot to the given profile state.
    ///
    /// - `Some(id)` with another profile active: restore the outgoing stash
    ///   first, then activate `id`.
    /// - `Some(id)` already active: no-op.
    /// - `None`: restore the stash and clear the active profile.
    pub fn activate(&self, prev: &Settings, target: Option<ProfileId>) -> Settings {
        let mut next = prev.clone();

        if let Some(current) = next.active_profile() {
            if target == Some(current) {
                return next;
            }
            next = self.restore(next, current);
        }

        if let Some(id) = target {
            let profile = profile(id);
            debug!(profile = %id, overrides = profile.overrides.len(), "activating profile");

            let stash: BTreeMap<_, _> = profile
                .overrides
                .iter()
                .map(|&(key, _)| (key, next.is_enabled(key)))
                .collect();
            next.set_stash(stash);

            for &(key, value) in profile.overrides {
                next = self.engine.apply(&next, key, value);
            }
            next.set_active_profile(Some(id));
        }

        next
    }

    /// Restore the outgoing profile's stash and force its side affordance
    /// off; clears the active profile.
    fn restore(&self, mut settings: Settings, outgoing: ProfileId) -> Settings {
        let stash = settings.take_stash();
        debug!(profile = %outgoing, restored = stash.len(), "restoring pre-profile values");

        for (key, value) in stash {
            settings = self.engine.apply(&settings, key, value);
        }
        if let Some(side) = profile(outgoing).side_toggle {
            settings = self.engine.apply(&settings, side, false);
        }
        settings.set_active_profile(None);
        settings
    }
}
