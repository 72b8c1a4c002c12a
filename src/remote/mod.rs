//! Typed façade over the remote enforcement service.
//!
//! The service holds the authoritative block-rule state; this module only
//! issues commands to it and consumes its snapshots. Four operations, none
//! retried automatically:
//! - list clients (`GET /clients`)
//! - list block rules (`GET /list`)
//! - add a block rule (`POST /block`)
//! - remove a block rule (`POST /unblock`)
//!
//! Writes are fire-and-forget acks: the only confirmation that a rule was
//! applied is a subsequent fetch.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use http::HttpEnforcementClient;

/// A network client observed by the enforcement service. Read-only to us.
///
/// The upstream schema names these `ipAddress` / `macAddress`; they are
/// normalized into the unified `address` vocabulary here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ipAddress")]
    pub address: String,
    #[serde(rename = "macAddress", default)]
    pub hardware_address: String,
    #[serde(default)]
    pub vendor: String,
}

/// A block rule held by the enforcement service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRule {
    #[serde(rename = "ip")]
    pub address: String,
    /// Absent means the rule covers all ports.
    #[serde(default)]
    pub port: Option<u16>,
    /// Non-empty once committed through this crate; tolerated as absent in
    /// data the service already holds.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Result of a read against the enforcement service.
///
/// A failed fetch degrades to an empty collection so the dashboard never
/// crashes on a transient error, but `Unavailable` stays distinguishable from
/// a confirmed-empty answer so the UI can flag possibly-stale data instead of
/// silently showing "no clients".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot<T> {
    /// The service answered; this is the full current collection.
    Confirmed(Vec<T>),
    /// The fetch failed (transport or decode); contents unknown.
    Unavailable,
}

impl<T> Snapshot<T> {
    /// The fetched items, degrading to empty when the fetch failed.
    pub fn items(&self) -> &[T] {
        match self {
            Snapshot::Confirmed(items) => items,
            Snapshot::Unavailable => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Snapshot::Unavailable)
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Snapshot::Confirmed(Vec::new())
    }
}

/// The seam between the command layer and the enforcement service.
///
/// Production code talks to [`HttpEnforcementClient`]; tests substitute a
/// recording fake to observe call order without a network.
#[async_trait]
pub trait EnforcementClient: Send + Sync {
    /// List currently observed clients. Failure degrades to `Unavailable`.
    async fn fetch_clients(&self) -> Snapshot<Client>;

    /// List active block rules. Failure degrades to `Unavailable`.
    async fn fetch_block_rules(&self) -> Snapshot<BlockRule>;

    /// Create a block rule. `reason` must already be validated non-empty and
    /// `port`, if present, positive; this call does not confirm application.
    async fn add_block_rule(
        &self,
        address: &str,
        port: Option<u16>,
        reason: &str,
    ) -> Result<(), AppError>;

    /// Remove the rule for `address`. Removing a non-existent rule is not an
    /// error from our side; the follow-up fetch shows the true state.
    async fn remove_block_rule(&self, address: &str) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_items_degrade_to_empty() {
        let snap: Snapshot<Client> = Snapshot::Unavailable;
        assert!(snap.items().is_empty());
        assert!(snap.is_unavailable());
    }

    #[test]
    fn test_snapshot_confirmed_keeps_items() {
        let snap = Snapshot::Confirmed(vec![1, 2, 3]);
        assert_eq!(snap.items(), &[1, 2, 3]);
        assert!(!snap.is_unavailable());
    }

    #[test]
    fn test_client_decodes_upstream_field_names() {
        let json = r#"{"ipAddress": "10.0.0.2", "macAddress": "AA:BB", "vendor": "Acme"}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.address, "10.0.0.2");
        assert_eq!(client.hardware_address, "AA:BB");
        assert_eq!(client.vendor, "Acme");
    }

    #[test]
    fn test_client_tolerates_missing_informational_fields() {
        let json = r#"{"ipAddress": "10.0.0.2"}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.address, "10.0.0.2");
        assert!(client.hardware_address.is_empty());
        assert!(client.vendor.is_empty());
    }

    #[test]
    fn test_block_rule_decodes_optional_port_and_reason() {
        let full: BlockRule =
            serde_json::from_str(r#"{"ip": "10.0.0.9", "port": 443, "reason": "scan"}"#).unwrap();
        assert_eq!(full.port, Some(443));
        assert_eq!(full.reason.as_deref(), Some("scan"));

        let bare: BlockRule = serde_json::from_str(r#"{"ip": "10.0.0.9"}"#).unwrap();
        assert_eq!(bare.port, None);
        assert_eq!(bare.reason, None);
    }
}
