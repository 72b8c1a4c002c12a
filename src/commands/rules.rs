//! Command orchestrator: block / unblock / bulk operations.
//!
//! Every state-changing command runs through here. The per-host flow is an
//! explicit state machine (`Idle -> AwaitingReason -> Submitting -> Idle`)
//! rather than being implicit in UI callback ordering. Writes are
//! fire-and-forget against the enforcement service; local state is never
//! optimistically mutated, a full re-fetch after each successful write is the
//! single source of truth.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::DEFAULT_BULK_BLOCK_REASON;
use crate::core::reconcile::{normalized, orphan_rules, reconcile, HostView};
use crate::core::PendingInputs;
use crate::error::AppError;
use crate::remote::{BlockRule, EnforcementClient};

use super::logic::{parse_port, validate_address, validate_reason};

/// Per-host command flow state. Absence from the flow map means `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandState {
    Idle,
    /// A block was requested; waiting for the operator to confirm a reason.
    AwaitingReason,
    /// A write is in flight.
    Submitting,
}

/// The reconciled dashboard, replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    /// One view per observed client, in fetch order.
    pub hosts: Vec<HostView>,
    /// Rules with no currently observed client ("blocked but not seen").
    pub orphans: Vec<BlockRule>,
    /// All active rules as last fetched.
    pub rules: Vec<BlockRule>,
    /// True when either fetch failed and its collection degraded to empty.
    /// The UI should flag the data as possibly stale rather than trust it.
    pub degraded: bool,
}

/// Outcome of a bulk operation. Per-item successes are not tracked beyond
/// counts; the end-of-run refresh shows the true state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Write commands actually issued.
    pub attempted: usize,
    /// Of those, how many the service rejected or that failed in transit.
    pub failed: usize,
    /// True when the run stopped early on the cancellation token.
    pub cancelled: bool,
}

/// Mediates every state-changing command to the enforcement service.
pub struct Orchestrator {
    client: Arc<dyn EnforcementClient>,
    pending: PendingInputs,
    flows: DashMap<String, CommandState>,
    state: Mutex<DashboardState>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn EnforcementClient>) -> Self {
        Self {
            client,
            pending: PendingInputs::new(),
            flows: DashMap::new(),
            state: Mutex::new(DashboardState::default()),
        }
    }

    /// The pending-input buffer, written directly by the UI layer.
    pub fn pending(&self) -> &PendingInputs {
        &self.pending
    }

    /// Latest reconciled dashboard state.
    pub fn dashboard(&self) -> DashboardState {
        self.state.lock().unwrap().clone()
    }

    /// Current flow state for `address`.
    pub fn flow_state(&self, address: &str) -> CommandState {
        match normalized(address) {
            Some(key) => self.flows.get(key).map(|s| *s).unwrap_or(CommandState::Idle),
            None => CommandState::Idle,
        }
    }

    fn set_flow(&self, key: &str, state: CommandState) {
        if state == CommandState::Idle {
            self.flows.remove(key);
        } else {
            self.flows.insert(key.to_string(), state);
        }
    }

    /// Re-fetch both collections and swap in the reconciled result.
    ///
    /// Fetch results are immutable once received; the swap under the lock is
    /// the only mutation, so readers always see a consistent snapshot.
    pub async fn refresh(&self) -> DashboardState {
        let (clients, rules) = tokio::join!(
            self.client.fetch_clients(),
            self.client.fetch_block_rules()
        );

        let degraded = clients.is_unavailable() || rules.is_unavailable();
        if degraded {
            warn!("Dashboard refresh degraded: one or more fetches failed");
        }

        let next = DashboardState {
            hosts: reconcile(clients.items(), rules.items()),
            orphans: orphan_rules(clients.items(), rules.items()),
            rules: rules.items().to_vec(),
            degraded,
        };

        let mut state = self.state.lock().unwrap();
        *state = next.clone();
        next
    }

    // ---- Single-host block flow ----

    /// `Idle -> AwaitingReason`: the operator asked to block `address`.
    /// Any stale pending reason for the host is discarded.
    pub fn begin_block(&self, address: &str) -> Result<(), AppError> {
        let key = validate_address(address)?;
        self.pending.clear_reason(&key);
        self.set_flow(&key, CommandState::AwaitingReason);
        Ok(())
    }

    /// `AwaitingReason -> Idle`: the operator dismissed the block flow.
    pub fn cancel_block(&self, address: &str) {
        if let Some(key) = normalized(address) {
            self.pending.clear(key);
            self.set_flow(key, CommandState::Idle);
        }
    }

    /// `AwaitingReason -> Submitting -> Idle`: the operator confirmed.
    ///
    /// The pending reason and port are validated before any network call; on
    /// validation or write failure the flow returns to `AwaitingReason` with
    /// the typed reason intact so the operator can retry without re-entering it.
    pub async fn confirm_block(&self, address: &str) -> Result<(), AppError> {
        let key = validate_address(address)?;
        if self.flow_state(&key) != CommandState::AwaitingReason {
            return Err(AppError::InvalidInput(format!(
                "No block awaiting confirmation for {key}"
            )));
        }

        let input = self.pending.get(&key);
        let reason = validate_reason(&input.reason)?;
        let port = parse_port(&input.port)?;

        self.set_flow(&key, CommandState::Submitting);
        match self.client.add_block_rule(&key, port, &reason).await {
            Ok(()) => {
                info!("Blocked {key} (port: {port:?}, reason: {reason})");
                self.pending.take(&key);
                self.set_flow(&key, CommandState::Idle);
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!("Block of {key} failed: {e}");
                self.set_flow(&key, CommandState::AwaitingReason);
                Err(e)
            }
        }
    }

    // ---- Unblock ----

    /// One-shot `Idle -> Submitting -> Idle` for a known blocked host.
    pub async fn unblock(&self, address: &str) -> Result<(), AppError> {
        let key = validate_address(address)?;
        self.set_flow(&key, CommandState::Submitting);
        let result = self.client.remove_block_rule(&key).await;
        self.set_flow(&key, CommandState::Idle);

        match result {
            Ok(()) => {
                info!("Unblocked {key}");
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!("Unblock of {key} failed: {e}");
                Err(e)
            }
        }
    }

    /// Unblock a manually typed address. There is no client entry to check it
    /// against, so the address itself is validated before submission.
    pub async fn manual_unblock(&self, address: &str) -> Result<(), AppError> {
        let key = validate_address(address)?;
        self.unblock(&key).await
    }

    // ---- Bulk operations ----

    /// Block every currently active (not-yet-blocked) host, sequentially and
    /// in view order. Each host gets its pending reason when one has been
    /// entered, otherwise the default bulk reason. Per-item failures are
    /// counted and do not halt the run; the token is checked between steps;
    /// exactly one refresh happens at the end, cancelled or not.
    pub async fn block_all(&self, cancel: &CancellationToken) -> BulkOutcome {
        let targets: Vec<HostView> = {
            let state = self.state.lock().unwrap();
            state.hosts.iter().filter(|h| !h.is_blocked).cloned().collect()
        };

        let mut outcome = BulkOutcome { attempted: 0, failed: 0, cancelled: false };
        for host in &targets {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }
            let pending_reason = self.pending.get(&host.address).reason;
            let reason = match validate_reason(&pending_reason) {
                Ok(reason) => reason,
                Err(_) => DEFAULT_BULK_BLOCK_REASON.to_string(),
            };

            outcome.attempted += 1;
            if let Err(e) = self.client.add_block_rule(&host.address, None, &reason).await {
                warn!("Bulk block of {} failed: {e}", host.address);
                outcome.failed += 1;
            } else {
                self.pending.clear(&host.address);
            }
        }

        info!(
            "Bulk block finished: {}/{} issued, {} failed, cancelled: {}",
            outcome.attempted,
            targets.len(),
            outcome.failed,
            outcome.cancelled
        );
        self.refresh().await;
        outcome
    }

    /// Remove every active rule, sequentially. Same failure, cancellation,
    /// and single-refresh semantics as [`Self::block_all`].
    pub async fn unblock_all(&self, cancel: &CancellationToken) -> BulkOutcome {
        let targets: Vec<BlockRule> = self.state.lock().unwrap().rules.clone();

        let mut outcome = BulkOutcome { attempted: 0, failed: 0, cancelled: false };
        for rule in &targets {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }
            outcome.attempted += 1;
            if let Err(e) = self.client.remove_block_rule(&rule.address).await {
                warn!("Bulk unblock of {} failed: {e}", rule.address);
                outcome.failed += 1;
            }
        }

        info!(
            "Bulk unblock finished: {}/{} issued, {} failed, cancelled: {}",
            outcome.attempted,
            targets.len(),
            outcome.failed,
            outcome.cancelled
        );
        self.refresh().await;
        outcome
    }
}
