//! # veil-apply
//!
//! Visibility appliers — the boundary between resolved toggle state and the
//! host document.
//!
//! The document is externally owned and rewritten constantly; appliers are
//! therefore built around three guarantees:
//!
//! - **Idempotent**: re-applying the same resolved state is a no-op.
//! - **Reversible**: turning a toggle off restores exactly the pre-hide
//!   state, driven by the per-instance [`OwnershipLedger`] rather than by
//!   sentinel-attribute sniffing, so elements hidden by anyone else are
//!   never touched.
//! - **Tolerant**: selectors matching nothing is normal; a later run picks
//!   up elements that appeared in the meantime.
//!
//! [`ScriptedDocument`] implements the document boundary in memory for
//! tests, including mid-test structural mutation.

pub mod applier;
pub mod dom;
pub mod error;
pub mod features;
pub mod ledger;
pub mod markers;
pub mod registry;

pub use applier::{Binding, SelectorApplier, VisibilityApplier, SENTINEL_ATTR};
pub use dom::{DocumentSurface, ElementId, ScriptedDocument};
pub use error::{ApplyError, Result};
pub use features::{masthead_applier, navigation_applier, shelves_applier, watch_applier};
pub use ledger::{ClaimedElement, OwnershipLedger};
pub use markers::{marker_attribute, MarkerApplier};
pub use registry::{ApplierRegistry, ApplyReport};
