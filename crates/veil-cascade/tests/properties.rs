//! Property tests for the cascade engine and profile resolver.
//!
//! These check the algebraic guarantees that hold for *any* sequence of
//! toggle operations: idempotence, parent consistency, hard-reset
//! completeness, and exact profile round-trips.

use proptest::prelude::*;

use veil_cascade::{CascadeEngine, ProfileResolver};
use veil_types::{rules, ProfileId, Settings, ToggleKey};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_key() -> impl Strategy<Value = ToggleKey> {
    (0..ToggleKey::ALL.len()).prop_map(|i| ToggleKey::ALL[i])
}

fn arb_op() -> impl Strategy<Value = (ToggleKey, bool)> {
    (arb_key(), any::<bool>())
}

fn arb_ops(max: usize) -> impl Strategy<Value = Vec<(ToggleKey, bool)>> {
    prop::collection::vec(arb_op(), 0..max)
}

fn arb_profile() -> impl Strategy<Value = ProfileId> {
    prop_oneof![
        Just(ProfileId::Cinema),
        Just(ProfileId::Focus),
        Just(ProfileId::Zen),
    ]
}

/// Build a consistent snapshot by replaying random operations through the
/// engine from the all-false defaults.
fn snapshot_after(ops: &[(ToggleKey, bool)]) -> Settings {
    let engine = CascadeEngine::new();
    let mut settings = Settings::new();
    for &(key, value) in ops {
        settings = engine.apply(&settings, key, value);
    }
    settings
}

fn assert_parents_consistent(settings: &Settings) {
    for group in rules::AND_GROUPS {
        let expected = group.children.iter().all(|&c| settings.is_enabled(c));
        assert_eq!(
            settings.is_enabled(group.parent),
            expected,
            "{} != AND(children)",
            group.parent
        );
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_apply_is_idempotent(ops in arb_ops(12), (key, value) in arb_op()) {
        let engine = CascadeEngine::new();
        let start = snapshot_after(&ops);
        let once = engine.apply(&start, key, value);
        let twice = engine.apply(&once, key, value);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_parents_stay_consistent(ops in arb_ops(24)) {
        let settings = snapshot_after(&ops);
        assert_parents_consistent(&settings);
    }

    #[test]
    fn prop_hard_reset_completeness(ops in arb_ops(16)) {
        let engine = CascadeEngine::new();
        let rule = rules::hard_reset_rule(ToggleKey::HideSidebar).unwrap();

        let start = snapshot_after(&ops);
        let on = engine.apply(&start, ToggleKey::HideSidebar, true);
        let off = engine.apply(&on, ToggleKey::HideSidebar, false);

        for &descendant in rule.descendants {
            prop_assert!(!off.is_enabled(descendant));
        }
    }

    #[test]
    fn prop_profile_round_trip(ops in arb_ops(16), id in arb_profile()) {
        let resolver = ProfileResolver::new(CascadeEngine::new());
        let start = snapshot_after(&ops);
        prop_assume!(start.active_profile().is_none());

        let active = resolver.activate(&start, Some(id));
        let restored = resolver.activate(&active, None);

        for &(key, _) in veil_types::profile(id).overrides {
            prop_assert_eq!(restored.is_enabled(key), start.is_enabled(key));
        }
        prop_assert_eq!(restored.active_profile(), None);
        assert_parents_consistent(&restored);
    }

    #[test]
    fn prop_profile_switch_never_stacks(ops in arb_ops(16), a in arb_profile(), b in arb_profile()) {
        prop_assume!(a != b);
        let resolver = ProfileResolver::new(CascadeEngine::new());
        let start = snapshot_after(&ops);
        prop_assume!(start.active_profile().is_none());

        let first = resolver.activate(&start, Some(a));
        let second = resolver.activate(&first, Some(b));

        prop_assert_eq!(second.active_profile(), Some(b));
        // Keys only A overrides are back to their pre-A values.
        let b_keys: Vec<ToggleKey> = veil_types::profile(b)
            .overrides
            .iter()
            .map(|&(k, _)| k)
            .collect();
        for &(key, _) in veil_types::profile(a).overrides {
            if !b_keys.contains(&key) {
                prop_assert_eq!(second.is_enabled(key), start.is_enabled(key));
            }
        }
        // The stash records only B's key set.
        for key in second.stash().keys() {
            prop_assert!(b_keys.contains(key));
        }
    }
}
