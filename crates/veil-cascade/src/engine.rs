//! The cascade engine: pure toggle state transitions.
//!
//! [`CascadeEngine::apply`] is the single entry point through which any
//! toggle change flows. It applies the rule class the changed key belongs to
//! (hard reset, one-way, AND parent, or independent), then recomputes every
//! AND parent so the snapshot it returns always satisfies
//! `parent == AND(children)`.

use tracing::debug;

use veil_types::rules;
use veil_types::{Settings, ToggleKey};

/// Pure state-transition logic for toggle changes. Stateless; cheap to
/// construct and clone.
#[derive(Clone, Copy, Debug, Default)]
pub struct CascadeEngine;

impl CascadeEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply a single toggle change and return the next consistent snapshot.
    ///
    /// Rule precedence, first match wins:
    ///
    /// 1. Hard-reset key: the whole descendant whitelist is forced to
    ///    `value`. Disabling deliberately zeroes every descendant, including
    ///    ones the user set independently (clean-slate policy).
    /// 2. One-way key: direct dependents are forced to `value`,
    ///    unconditionally; they never feed back.
    /// 3. AND parent: children are forced to `value`.
    /// 4. Anything else: only the key itself changes.
    ///
    /// Afterwards every AND parent is recomputed from its children, which
    /// covers the child→parent direction and heals any inconsistency the
    /// previous snapshot carried.
    ///
    /// Idempotent: re-applying the same `(key, value)` to the result is a
    /// no-op.
    pub fn apply(&self, prev: &Settings, key: ToggleKey, value: bool) -> Settings {
        let mut next = prev.clone();
        next.insert(key, value);

        if let Some(rule) = rules::hard_reset_rule(key) {
            debug!(key = %key, value, descendants = rule.descendants.len(), "hard reset cascade");
            for &descendant in rule.descendants {
                next.insert(descendant, value);
            }
        } else if let Some(rule) = rules::one_way_rule(key) {
            debug!(key = %key, value, dependents = rule.dependents.len(), "one-way cascade");
            for &dependent in rule.dependents {
                next.insert(dependent, value);
            }
        } else if let Some(group) = rules::and_group(key) {
            debug!(key = %key, value, children = group.children.len(), "group parent cascade");
            for &child in group.children {
                next.insert(child, value);
            }
        }

        self.recompute_parents(&mut next);
        next
    }

    /// Re-derive every AND parent from its children without changing
    /// anything else. Used when loading a snapshot from storage: a stale or
    /// externally edited store may hold a parent value that contradicts its
    /// children, and the children win.
    pub fn heal(&self, settings: &Settings) -> Settings {
        let mut healed = settings.clone();
        self.recompute_parents(&mut healed);
        healed
    }

    fn recompute_parents(&self, settings: &mut Settings) {
        for group in rules::AND_GROUPS {
            let all = group.children.iter().all(|&c| settings.is_enabled(c));
            settings.insert(group.parent, all);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_types::ToggleKey::*;

    fn engine() -> CascadeEngine {
        CascadeEngine::new()
    }

    #[test]
    fn test_independent_key_only_updates_itself() {
        let s = engine().apply(&Settings::new(), HideShorts, true);
        assert!(s.is_enabled(HideShorts));
        assert_eq!(Settings::new().diff(&s), vec![HideShorts]);
    }

    #[test]
    fn test_masthead_forces_dependents() {
        let s = engine().apply(&Settings::new(), HideMasthead, true);
        for key in [HideSearchbar, HideNotifications, HideCreateButton, HideAvatar] {
            assert!(s.is_enabled(key), "{key} should follow hideMasthead");
        }

        let s = engine().apply(&s, HideMasthead, false);
        for key in [HideSearchbar, HideNotifications, HideCreateButton, HideAvatar] {
            assert!(!s.is_enabled(key));
        }
    }

    #[test]
    fn test_dependent_does_not_feed_back() {
        let s = engine().apply(&Settings::new(), HideSearchbar, true);
        assert!(s.is_enabled(HideSearchbar));
        assert!(!s.is_enabled(HideMasthead));
    }

    #[test]
    fn test_actions_parent_is_and_of_children() {
        let children = [
            HideActionLikeDislike,
            HideActionShare,
            HideActionSave,
            HideActionEllipsis,
            HideActionJoin,
            HideActionSubscribe,
            HideActionClip,
        ];

        let mut s = Settings::new();
        for (i, &child) in children.iter().enumerate() {
            s = engine().apply(&s, child, true);
            let expect_parent = i == children.len() - 1;
            assert_eq!(
                s.is_enabled(HideActions),
                expect_parent,
                "parent wrong after enabling child #{}",
                i + 1
            );
        }

        // Disabling any single child clears the parent again.
        s = engine().apply(&s, HideActionShare, false);
        assert!(!s.is_enabled(HideActions));
    }

    #[test]
    fn test_actions_parent_forces_children() {
        let s = engine().apply(&Settings::new(), HideActions, true);
        assert!(s.is_enabled(HideActionClip));
        assert!(s.is_enabled(HideActions));

        let s = engine().apply(&s, HideActions, false);
        assert!(!s.is_enabled(HideActionClip));
        assert!(!s.is_enabled(HideActions));
    }

    #[test]
    fn test_sidebar_hard_reset_zeroes_descendants() {
        // Clean-slate policy: descendants the user set independently do not
        // survive the master being turned off.
        let mut s = engine().apply(&Settings::new(), HideExploreMusic, true);
        s = engine().apply(&s, HideYouHistory, true);
        s = engine().apply(&s, HideSidebar, true);
        assert!(s.is_enabled(HideExploreTrending));
        assert!(s.is_enabled(HideSidebarExplore));

        s = engine().apply(&s, HideSidebar, false);
        for &d in veil_types::rules::hard_reset_rule(HideSidebar).unwrap().descendants {
            assert!(!s.is_enabled(d), "{d} should be zeroed by the hard reset");
        }
    }

    #[test]
    fn test_sidebar_enable_satisfies_group_parents() {
        let s = engine().apply(&Settings::new(), HideSidebar, true);
        assert!(s.is_enabled(HideSidebarExplore));
        assert!(s.is_enabled(HideSidebarYou));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let engine = engine();
        for &key in ToggleKey::ALL {
            for value in [true, false] {
                let once = engine.apply(&Settings::new(), key, value);
                let twice = engine.apply(&once, key, value);
                assert_eq!(once, twice, "apply({key}, {value}) drifted");
            }
        }
    }

    #[test]
    fn test_heal_rederives_parent_from_children() {
        // Simulate a stale store: parent claims true, children disagree.
        let mut s = Settings::new();
        s.insert(HideActions, true);
        s.insert(HideActionShare, true);

        let healed = engine().heal(&s);
        assert!(!healed.is_enabled(HideActions));
        assert!(healed.is_enabled(HideActionShare));
    }
}
