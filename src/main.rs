//! Thin CLI front door over the dashboard core.
//!
//! The real consumer is a UI layer; this binary exists so the core can be
//! driven and inspected from a terminal:
//!
//! ```text
//! netwarden status
//! netwarden block <address> <reason> [port]
//! netwarden unblock <address>
//! netwarden block-all
//! netwarden unblock-all
//! ```
//!
//! Service location and credential come from `NETWARDEN_URL` / `NETWARDEN_TOKEN`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use netwarden::{
    BulkOutcome, DashboardState, HttpEnforcementClient, Orchestrator, ServiceConfig,
};

const USAGE: &str = "usage: netwarden <status | block <address> <reason> [port] | unblock <address> | block-all | unblock-all>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netwarden=info".into()),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    let orch = Orchestrator::new(Arc::new(HttpEnforcementClient::new(config)));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["status"] | [] => {
            print_dashboard(&orch.refresh().await);
        }
        ["block", address, reason] => {
            block(&orch, address, reason, None).await?;
        }
        ["block", address, reason, port] => {
            block(&orch, address, reason, Some(port)).await?;
        }
        ["unblock", address] => {
            orch.manual_unblock(address).await?;
            println!("Unblocked {address}");
        }
        ["block-all"] => {
            orch.refresh().await;
            let outcome = orch.block_all(&cancel_on_ctrl_c()).await;
            print_outcome("block-all", outcome);
            print_dashboard(&orch.dashboard());
        }
        ["unblock-all"] => {
            orch.refresh().await;
            let outcome = orch.unblock_all(&cancel_on_ctrl_c()).await;
            print_outcome("unblock-all", outcome);
            print_dashboard(&orch.dashboard());
        }
        _ => anyhow::bail!("{USAGE}"),
    }

    Ok(())
}

async fn block(
    orch: &Orchestrator,
    address: &str,
    reason: &str,
    port: Option<&str>,
) -> anyhow::Result<()> {
    orch.refresh().await;
    orch.begin_block(address)?;
    orch.pending().set_reason(address, reason);
    if let Some(port) = port {
        orch.pending().set_port(address, port);
    }
    orch.confirm_block(address).await?;
    println!("Blocked {address}");
    Ok(())
}

/// A token that flips when the operator hits ctrl-c, aborting a bulk run
/// between its sequential steps.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling after the in-flight request completes...");
            handle.cancel();
        }
    });
    token
}

fn print_outcome(op: &str, outcome: BulkOutcome) {
    println!(
        "{op}: {} issued, {} failed{}",
        outcome.attempted,
        outcome.failed,
        if outcome.cancelled { " (cancelled)" } else { "" }
    );
}

fn print_dashboard(state: &DashboardState) {
    if state.degraded {
        println!("WARNING: a fetch failed; the data below may be stale or incomplete.\n");
    }

    println!("{:<18} {:<20} {:<16} {:<8} reason", "address", "hardware", "vendor", "state");
    for host in &state.hosts {
        let (label, reason) = match &host.active_rule {
            Some(rule) => {
                let scope = rule.port.map(|p| format!(" (port {p})")).unwrap_or_default();
                ("BLOCKED", format!("{}{scope}", rule.reason.as_deref().unwrap_or("-")))
            }
            None => ("active", String::from("-")),
        };
        println!(
            "{:<18} {:<20} {:<16} {:<8} {reason}",
            host.address, host.hardware_address, host.vendor, label
        );
    }

    if !state.orphans.is_empty() {
        println!("\nBlocked but not currently seen on the network:");
        for rule in &state.orphans {
            println!(
                "  {} ({})",
                rule.address,
                rule.reason.as_deref().unwrap_or("no reason recorded")
            );
        }
    }
}
