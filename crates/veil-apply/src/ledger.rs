//! The ownership ledger.
//!
//! Appliers mark elements they hide with a sentinel attribute so injected
//! stylesheets can see them, but restoration is driven by this ledger, not
//! by attribute presence: the ledger records exactly which elements *this*
//! applier instance hid and what inline `display` value each had before.
//! Elements hidden by the host page or other extensions are never touched.

use std::collections::BTreeMap;

use veil_types::ToggleKey;

use crate::dom::ElementId;

/// What we knew about an element when we hid it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimedElement {
    /// Inline `display` value before we overwrote it, if any.
    pub prior_display: Option<String>,
}

/// Per-applier record of hidden elements, keyed by the toggle that hid them.
#[derive(Clone, Debug, Default)]
pub struct OwnershipLedger {
    claims: BTreeMap<ToggleKey, BTreeMap<ElementId, ClaimedElement>>,
}

impl OwnershipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` hid `el`. Returns `false` (and records nothing) if
    /// this ledger already claims the element under any key.
    pub fn claim(&mut self, key: ToggleKey, el: ElementId, prior_display: Option<String>) -> bool {
        if self.is_claimed(el) {
            return false;
        }
        self.claims
            .entry(key)
            .or_default()
            .insert(el, ClaimedElement { prior_display });
        true
    }

    /// Whether any key in this ledger claims the element.
    pub fn is_claimed(&self, el: ElementId) -> bool {
        self.claims.values().any(|m| m.contains_key(&el))
    }

    /// Drop claims under `key` for elements not in `present`. The host page
    /// removes hidden elements at will (virtual scrolling does this
    /// constantly); their claims must not outlive them.
    pub fn prune(&mut self, key: ToggleKey, present: &[ElementId]) {
        if let Some(claims) = self.claims.get_mut(&key) {
            claims.retain(|el, _| present.contains(el));
            if claims.is_empty() {
                self.claims.remove(&key);
            }
        }
    }

    /// Remove and return every claim held under `key`.
    pub fn release(&mut self, key: ToggleKey) -> Vec<(ElementId, ClaimedElement)> {
        self.claims
            .remove(&key)
            .map(|m| m.into_iter().collect())
            .unwrap_or_default()
    }

    /// Total claimed elements across all keys.
    pub fn len(&self) -> usize {
        self.claims.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.values().all(|m| m.is_empty())
    }

    /// Drop every claim. Used when an applier instance is reset.
    pub fn clear(&mut self) {
        self.claims.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_release() {
        let mut ledger = OwnershipLedger::new();
        let el = ElementId(1);

        assert!(ledger.claim(ToggleKey::HideShorts, el, Some("flex".into())));
        assert!(ledger.is_claimed(el));
        assert_eq!(ledger.len(), 1);

        let released = ledger.release(ToggleKey::HideShorts);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].1.prior_display, Some("flex".into()));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_double_claim_rejected() {
        let mut ledger = OwnershipLedger::new();
        let el = ElementId(7);

        assert!(ledger.claim(ToggleKey::HideShorts, el, None));
        // Same key or a different one: the element is already ours.
        assert!(!ledger.claim(ToggleKey::HideShorts, el, None));
        assert!(!ledger.claim(ToggleKey::HideMixes, el, None));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_prune_drops_missing_elements_only() {
        let mut ledger = OwnershipLedger::new();
        ledger.claim(ToggleKey::HideShorts, ElementId(1), None);
        ledger.claim(ToggleKey::HideShorts, ElementId(2), Some("flex".into()));
        ledger.claim(ToggleKey::HideMixes, ElementId(3), None);

        ledger.prune(ToggleKey::HideShorts, &[ElementId(2)]);
        assert!(!ledger.is_claimed(ElementId(1)));
        assert!(ledger.is_claimed(ElementId(2)));
        // Claims under other keys are untouched.
        assert!(ledger.is_claimed(ElementId(3)));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_release_unclaimed_key_is_empty() {
        let mut ledger = OwnershipLedger::new();
        assert!(ledger.release(ToggleKey::HideMixes).is_empty());
    }
}
