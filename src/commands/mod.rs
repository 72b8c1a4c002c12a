//! Operator command layer, organized by concern.
//!
//! - `rules`: the command orchestrator (block / unblock / bulk operations)
//! - `logic`: pure validation functions (unit-testable)

pub mod logic;
pub mod rules;

pub use rules::{BulkOutcome, CommandState, DashboardState, Orchestrator};
