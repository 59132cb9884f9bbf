//! The visibility applier contract and the selector-driven implementation.

use std::collections::BTreeMap;

use tracing::trace;

use veil_types::{ResolvedView, ToggleKey};

use crate::dom::{DocumentSurface, ElementId};
use crate::error::ApplyError;
use crate::ledger::OwnershipLedger;

/// Sentinel attribute left on every element we hide, valued with the wire
/// name of the toggle responsible. Injected stylesheets key off it.
pub const SENTINEL_ATTR: &str = "data-veil-hidden";

/// Translates resolved booleans into document mutations for one feature
/// area.
///
/// Implementations must be idempotent, reversible (restoring exactly the
/// pre-hide state for elements they hid), and tolerant of targets that do
/// not exist yet.
pub trait VisibilityApplier: Send {
    /// Short feature-area name, used in logs ("masthead", "shelves", …).
    fn feature(&self) -> &str;

    /// The toggle keys this applier consumes.
    fn keys(&self) -> &[ToggleKey];

    /// Reconcile the document with the resolved values. Re-runnable at any
    /// time against a document that changed underneath.
    fn apply(&mut self, doc: &dyn DocumentSurface, view: &ResolvedView) -> Result<(), ApplyError>;

    /// Forget all instance state (the ledger included) without touching the
    /// document. Used when the applier is rebound to a fresh document.
    fn reset(&mut self);
}

/// One toggle→selector binding inside a [`SelectorApplier`].
#[derive(Clone, Debug)]
pub struct Binding {
    pub key: ToggleKey,
    pub selector: String,
}

impl Binding {
    pub fn new(key: ToggleKey, selector: impl Into<String>) -> Self {
        Self {
            key,
            selector: selector.into(),
        }
    }
}

/// Applier that hides whatever its selectors match by overwriting the
/// inline `display` property, remembering the prior value in its ledger so
/// restoration is exact.
pub struct SelectorApplier {
    feature: String,
    bindings: Vec<Binding>,
    keys: Vec<ToggleKey>,
    ledger: OwnershipLedger,
}

impl SelectorApplier {
    pub fn new(feature: impl Into<String>, bindings: Vec<Binding>) -> Self {
        let keys = bindings.iter().map(|b| b.key).collect();
        Self {
            feature: feature.into(),
            bindings,
            keys,
            ledger: OwnershipLedger::new(),
        }
    }

    /// Number of elements this instance currently hides.
    pub fn hidden_count(&self) -> usize {
        self.ledger.len()
    }

    fn hide(&mut self, doc: &dyn DocumentSurface, key: ToggleKey, present: &[ElementId]) {
        for &el in present {
            let prior = doc.inline_style(el, "display");
            // Already invisible for reasons that are not ours; leave it be.
            if prior.as_deref() == Some("none") && !self.ledger.is_claimed(el) {
                continue;
            }
            if !self.ledger.claim(key, el, prior) {
                continue;
            }
            doc.set_inline_style(el, "display", "none");
            doc.set_attribute(el, SENTINEL_ATTR, key.as_str());
            trace!(feature = %self.feature, key = %key, %el, "hid element");
        }
    }

    fn unhide(&mut self, doc: &dyn DocumentSurface, key: ToggleKey) {
        for (el, claim) in self.ledger.release(key) {
            match claim.prior_display {
                Some(value) => doc.set_inline_style(el, "display", &value),
                None => doc.clear_inline_style(el, "display"),
            }
            doc.remove_attribute(el, SENTINEL_ATTR);
            trace!(feature = %self.feature, key = %key, %el, "restored element");
        }
    }
}

impl VisibilityApplier for SelectorApplier {
    fn feature(&self) -> &str {
        &self.feature
    }

    fn keys(&self) -> &[ToggleKey] {
        &self.keys
    }

    fn apply(&mut self, doc: &dyn DocumentSurface, view: &ResolvedView) -> Result<(), ApplyError> {
        let bindings = self.bindings.clone();
        // Collect the still-present matches per enabled key first, so stale
        // claims for elements the host removed can be pruned before hiding.
        let mut present: BTreeMap<ToggleKey, Vec<ElementId>> = BTreeMap::new();
        for binding in &bindings {
            if view.get(binding.key) {
                present
                    .entry(binding.key)
                    .or_default()
                    .extend(doc.select(&binding.selector));
            }
        }
        for (&key, els) in &present {
            self.ledger.prune(key, els);
            self.hide(doc, key, els);
        }
        for binding in &bindings {
            if !view.get(binding.key) {
                self.unhide(doc, binding.key);
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.ledger.clear();
    }
}
