//! netwarden: access-control dashboard core.
//!
//! Observes network clients and enforcement-service block rules, reconciles
//! them into a single per-host view, and mediates every block/unblock command
//! to the service. The UI layer sits on top of [`Orchestrator`] and
//! [`DashboardState`]; everything visual is out of scope here.

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod remote;

pub use commands::{BulkOutcome, CommandState, DashboardState, Orchestrator};
pub use config::ServiceConfig;
pub use core::{HostView, PendingInput, PendingInputs};
pub use error::AppError;
pub use remote::{BlockRule, Client, EnforcementClient, HttpEnforcementClient, Snapshot};
