//! Root marker attributes.
//!
//! For every key it watches, [`MarkerApplier`] mirrors the resolved boolean
//! onto a `data-veil-*` attribute of the document root. Injected stylesheets
//! react to those attributes without any script involvement, which is how
//! purely CSS-driven hiding (and the cinema layout) keys off the settings.

use veil_types::{ResolvedView, ToggleKey};

use crate::applier::VisibilityApplier;
use crate::dom::DocumentSurface;
use crate::error::ApplyError;

/// Attribute name for a toggle's root marker (`data-veil-hide-masthead`).
pub fn marker_attribute(key: ToggleKey) -> String {
    format!("data-veil-{}", key.as_kebab())
}

/// Mirrors resolved booleans onto root attributes. Stateless apart from its
/// key list; setting an attribute twice is naturally idempotent.
pub struct MarkerApplier {
    keys: Vec<ToggleKey>,
}

impl MarkerApplier {
    pub fn new(keys: Vec<ToggleKey>) -> Self {
        Self { keys }
    }

    /// Watch every known toggle.
    pub fn all_keys() -> Self {
        Self::new(ToggleKey::ALL.to_vec())
    }
}

impl VisibilityApplier for MarkerApplier {
    fn feature(&self) -> &str {
        "markers"
    }

    fn keys(&self) -> &[ToggleKey] {
        &self.keys
    }

    fn apply(&mut self, doc: &dyn DocumentSurface, view: &ResolvedView) -> Result<(), ApplyError> {
        for &key in &self.keys {
            let name = marker_attribute(key);
            if view.get(key) {
                doc.set_root_attribute(&name, Some(""));
            } else {
                doc.set_root_attribute(&name, None);
            }
        }
        Ok(())
    }

    fn reset(&mut self) {}
}
