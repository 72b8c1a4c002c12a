//! Pure reconciliation of the two independently-fetched collections.
//!
//! The client list and the block-rule list arrive from separate endpoints and
//! can disagree in shape (different field names, trailing whitespace, rules
//! for hosts that are no longer on the network). [`reconcile`] merges them
//! into one per-host view; both the "active" and "blocked" UI views derive
//! from that single call, so the two can never diverge.

use serde::Serialize;

use crate::remote::{BlockRule, Client};

/// Unified per-host view, rebuilt wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostView {
    pub address: String,
    pub hardware_address: String,
    pub vendor: String,
    pub is_blocked: bool,
    /// The authoritative rule for this host, if blocked.
    pub active_rule: Option<BlockRule>,
}

/// Address comparison key: trimmed, with empty meaning "not comparable".
///
/// An empty or whitespace-only address never matches anything, including
/// another empty address.
pub fn normalized(address: &str) -> Option<&str> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Find the authoritative rule for `address`: first match wins.
///
/// Duplicate rules for one address are a data-quality problem on the service
/// side, reported as a warning, never an error.
fn find_rule<'r>(address: &str, rules: &'r [BlockRule]) -> Option<&'r BlockRule> {
    let key = normalized(address)?;
    let mut matches = rules.iter().filter(|r| normalized(&r.address) == Some(key));
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        tracing::warn!("Duplicate block rules for {key}; using the first");
    }
    first
}

/// Merge clients and rules into one host view per client.
///
/// Pure function: no side effects, no hidden state, output order preserves
/// the input order of `clients`.
pub fn reconcile(clients: &[Client], rules: &[BlockRule]) -> Vec<HostView> {
    clients
        .iter()
        .map(|client| {
            let active_rule = find_rule(&client.address, rules).cloned();
            HostView {
                address: client.address.clone(),
                hardware_address: client.hardware_address.clone(),
                vendor: client.vendor.clone(),
                is_blocked: active_rule.is_some(),
                active_rule,
            }
        })
        .collect()
}

/// Rules whose address matches no currently observed client.
///
/// These hosts are blocked but not seen on the network right now; they are
/// absent from [`reconcile`]'s output and surfaced separately so the UI can
/// still list (and unblock) them.
pub fn orphan_rules(clients: &[Client], rules: &[BlockRule]) -> Vec<BlockRule> {
    rules
        .iter()
        .filter(|rule| match normalized(&rule.address) {
            Some(key) => !clients
                .iter()
                .any(|c| normalized(&c.address) == Some(key)),
            // A rule without a comparable address can never match a client.
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client(address: &str) -> Client {
        Client {
            address: address.to_string(),
            hardware_address: "AA:BB:CC:DD:EE:FF".to_string(),
            vendor: "Acme".to_string(),
        }
    }

    fn make_rule(address: &str, reason: &str) -> BlockRule {
        BlockRule {
            address: address.to_string(),
            port: None,
            reason: Some(reason.to_string()),
        }
    }

    #[test]
    fn test_normalized_trims_and_rejects_empty() {
        assert_eq!(normalized(" 10.0.0.5"), Some("10.0.0.5"));
        assert_eq!(normalized("10.0.0.5 "), Some("10.0.0.5"));
        assert_eq!(normalized("10.0.0.5"), Some("10.0.0.5"));
        assert_eq!(normalized(""), None);
        assert_eq!(normalized("   "), None);
    }

    #[test]
    fn test_reconcile_marks_blocked_hosts() {
        let clients = vec![make_client("10.0.0.2"), make_client("10.0.0.3")];
        let rules = vec![make_rule("10.0.0.3", "port scan")];

        let hosts = reconcile(&clients, &rules);
        assert_eq!(hosts.len(), 2);
        assert!(!hosts[0].is_blocked);
        assert!(hosts[0].active_rule.is_none());
        assert!(hosts[1].is_blocked);
        assert_eq!(
            hosts[1].active_rule.as_ref().unwrap().reason.as_deref(),
            Some("port scan")
        );
    }

    #[test]
    fn test_reconcile_preserves_client_order() {
        let clients = vec![
            make_client("10.0.0.9"),
            make_client("10.0.0.1"),
            make_client("10.0.0.5"),
        ];
        let hosts = reconcile(&clients, &[]);
        let addresses: Vec<&str> = hosts.iter().map(|h| h.address.as_str()).collect();
        assert_eq!(addresses, vec!["10.0.0.9", "10.0.0.1", "10.0.0.5"]);
    }

    #[test]
    fn test_reconcile_matches_across_whitespace_variants() {
        let clients = vec![make_client(" 10.0.0.5")];
        let rules = vec![make_rule("10.0.0.5 ", "noisy")];

        let hosts = reconcile(&clients, &rules);
        assert!(hosts[0].is_blocked);
    }

    #[test]
    fn test_reconcile_empty_address_never_matches() {
        let clients = vec![make_client("  ")];
        let rules = vec![make_rule("", "bad data")];

        let hosts = reconcile(&clients, &rules);
        assert!(!hosts[0].is_blocked);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let clients = vec![make_client("10.0.0.2"), make_client("10.0.0.3")];
        let rules = vec![make_rule("10.0.0.2", "r1"), make_rule("10.0.0.3", "r2")];
        assert_eq!(reconcile(&clients, &rules), reconcile(&clients, &rules));
    }

    #[test]
    fn test_reconcile_partition_invariant() {
        let clients = vec![
            make_client("10.0.0.1"),
            make_client("10.0.0.2"),
            make_client("10.0.0.3"),
        ];
        let rules = vec![make_rule("10.0.0.2", "r")];

        let hosts = reconcile(&clients, &rules);
        let active: Vec<&HostView> = hosts.iter().filter(|h| !h.is_blocked).collect();
        let blocked: Vec<&HostView> = hosts.iter().filter(|h| h.is_blocked).collect();

        assert_eq!(active.len() + blocked.len(), hosts.len());
        for host in &hosts {
            let in_active = active.iter().any(|h| h.address == host.address);
            let in_blocked = blocked.iter().any(|h| h.address == host.address);
            assert!(in_active != in_blocked, "host {} must be in exactly one view", host.address);
        }
    }

    #[test]
    fn test_duplicate_rules_first_match_wins() {
        let clients = vec![make_client("10.0.0.2")];
        let rules = vec![make_rule("10.0.0.2", "first"), make_rule("10.0.0.2", "second")];

        let hosts = reconcile(&clients, &rules);
        assert_eq!(
            hosts[0].active_rule.as_ref().unwrap().reason.as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_orphan_rules_surfaced_separately() {
        let rules = vec![make_rule("9.9.9.9", "gone")];
        let clients: Vec<Client> = vec![];

        assert_eq!(orphan_rules(&clients, &rules), rules);
        assert!(reconcile(&clients, &rules).is_empty());
    }

    #[test]
    fn test_orphan_rules_excludes_matched_rules() {
        let clients = vec![make_client("10.0.0.2")];
        let rules = vec![make_rule("10.0.0.2", "seen"), make_rule("9.9.9.9", "gone")];

        let orphans = orphan_rules(&clients, &rules);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].address, "9.9.9.9");
    }

    #[test]
    fn test_orphan_rules_includes_uncomparable_addresses() {
        let clients = vec![make_client("10.0.0.2")];
        let rules = vec![make_rule("   ", "junk")];

        assert_eq!(orphan_rules(&clients, &rules).len(), 1);
    }
}
