//! # veil-types
//!
//! Shared types for the Veil declutter core: the toggle-key namespace, the
//! settings snapshot, the declarative cascade rule tables, and the built-in
//! profile catalog.
//!
//! ## Relationship classes
//!
//! Toggle keys fall into three relationship classes, all declared in
//! [`rules`]:
//!
//! - **Hard reset** — a master key (the sidebar) that forces a deep
//!   descendant whitelist to its own value in both directions.
//! - **One-way** — a key (masthead, below-the-fold) whose dependents follow
//!   it but never feed back.
//! - **AND group** — a parent (the action row, sidebar sections) recomputed
//!   as the AND of a fixed child list.
//!
//! Keys covered by no table are independent. The cascade engine in
//! `veil-cascade` is the only code that interprets these tables.

pub mod error;
pub mod keys;
pub mod profile;
pub mod rules;
pub mod settings;

pub use error::{Result, SettingsError};
pub use keys::ToggleKey;
pub use profile::{catalog, profile, Profile, ProfileId};
pub use rules::{AndGroup, HardResetRule, OneWayRule, AND_GROUPS, HARD_RESET, ONE_WAY};
pub use settings::{ResolvedView, Settings, ACTIVE_PROFILE_KEY, STASH_PREFIX};
