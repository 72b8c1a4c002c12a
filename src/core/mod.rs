//! Core logic: reconciliation of clients against block rules, pending input.
//!
//! - [`reconcile`] / [`orphan_rules`] — pure merge of the two fetched collections
//! - [`HostView`] — the unified per-host view consumed by the UI layer
//! - [`PendingInputs`] — per-host not-yet-submitted operator input

pub mod pending;
pub mod reconcile;

pub use pending::{PendingInput, PendingInputs};
pub use reconcile::{normalized, orphan_rules, reconcile, HostView};
