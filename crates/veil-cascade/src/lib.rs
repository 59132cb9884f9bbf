//! # veil-cascade
//!
//! The toggle-cascade engine and profile resolver — the pure core of Veil.
//!
//! Both components take a [`veil_types::Settings`] snapshot and return a new
//! one; neither performs I/O. Every snapshot either component produces
//! satisfies the parent-consistency invariant: for each AND group,
//! `parent == AND(children)`.
//!
//! - [`CascadeEngine`] — propagates one toggle change through the rule
//!   tables in `veil_types::rules`.
//! - [`ProfileResolver`] — applies and reverts named override bundles with
//!   an exact-restore stash, never stacking two profiles.

pub mod engine;
pub mod resolver;

pub use engine::CascadeEngine;
pub use resolver::ProfileResolver;
