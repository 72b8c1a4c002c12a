//! In-progress operator input, keyed by host address using DashMap.
//!
//! Holds candidate port and reason text for hosts the operator is about to
//! block, plus nothing else: values here are not validated (that happens in
//! the command layer at submission time), not persisted, and never
//! synchronized with server state. Entries are cleared on commit or cancel.

use dashmap::DashMap;

use crate::core::reconcile::normalized;

/// Candidate input for one host, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInput {
    /// Candidate port in string form; parsed lazily at submission.
    pub port: String,
    /// Candidate free-text reason.
    pub reason: String,
}

/// Keyed store of per-host pending input. Thread-safe, one entry per address.
#[derive(Debug, Default)]
pub struct PendingInputs {
    entries: DashMap<String, PendingInput>,
}

impl PendingInputs {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    /// Key for `address`, or None when the address is not comparable.
    fn key(address: &str) -> Option<String> {
        normalized(address).map(str::to_string)
    }

    pub fn set_port(&self, address: &str, port: impl Into<String>) {
        if let Some(key) = Self::key(address) {
            self.entries.entry(key).or_default().port = port.into();
        }
    }

    pub fn set_reason(&self, address: &str, reason: impl Into<String>) {
        if let Some(key) = Self::key(address) {
            self.entries.entry(key).or_default().reason = reason.into();
        }
    }

    /// Discard any stale reason for `address`, keeping a typed port.
    /// Called when the operator re-opens the block flow for a host.
    pub fn clear_reason(&self, address: &str) {
        if let Some(key) = Self::key(address) {
            if let Some(mut entry) = self.entries.get_mut(&key) {
                entry.reason.clear();
            }
        }
    }

    /// Current input for `address`, defaulting to empty fields.
    pub fn get(&self, address: &str) -> PendingInput {
        Self::key(address)
            .and_then(|key| self.entries.get(&key).map(|e| e.value().clone()))
            .unwrap_or_default()
    }

    /// Remove and return the entry for `address` (commit or cancel).
    pub fn take(&self, address: &str) -> PendingInput {
        Self::key(address)
            .and_then(|key| self.entries.remove(&key).map(|(_, v)| v))
            .unwrap_or_default()
    }

    pub fn clear(&self, address: &str) {
        if let Some(key) = Self::key(address) {
            self.entries.remove(&key);
        }
    }
}
