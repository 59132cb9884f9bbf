//! The applier registry.
//!
//! Holds every registered applier and fans a settings snapshot out to them,
//! each receiving only the key subset it declared. One applier failing never
//! stops the others; the reconciliation loop must survive anything an
//! applier does.

use tracing::warn;

use veil_types::{ResolvedView, Settings};

use crate::applier::VisibilityApplier;
use crate::dom::DocumentSurface;

/// Outcome of one fan-out pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub ran: usize,
    pub failed: usize,
}

/// Ordered collection of appliers sharing one document.
#[derive(Default)]
pub struct ApplierRegistry {
    appliers: Vec<Box<dyn VisibilityApplier>>,
}

impl ApplierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, applier: Box<dyn VisibilityApplier>) {
        self.appliers.push(applier);
    }

    pub fn len(&self) -> usize {
        self.appliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appliers.is_empty()
    }

    /// Run every applier against the snapshot, in registration order.
    /// Applier failures are logged and counted, never propagated.
    pub fn apply_all(&mut self, doc: &dyn DocumentSurface, settings: &Settings) -> ApplyReport {
        let mut report = ApplyReport::default();
        for applier in &mut self.appliers {
            let keys = applier.keys().to_vec();
            let view = ResolvedView::for_keys(settings, &keys);
            match applier.apply(doc, &view) {
                Ok(()) => report.ran += 1,
                Err(e) => {
                    warn!(feature = applier.feature(), error = %e, "applier failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Reset every applier's instance state (ledgers included).
    pub fn reset_all(&mut self) {
        for applier in &mut self.appliers {
            applier.reset();
        }
    }
}
