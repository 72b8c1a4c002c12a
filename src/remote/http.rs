//! HTTP implementation of [`EnforcementClient`] using reqwest.
//!
//! One shared connection-pooled client per instance; the base URL and bearer
//! credential come from an explicit [`ServiceConfig`] and are never mutated
//! after construction. Reads absorb failures into [`Snapshot::Unavailable`]
//! (logged, non-fatal); writes surface failures to the caller.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::error::AppError;

use super::{BlockRule, Client, EnforcementClient, Snapshot};

pub struct HttpEnforcementClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl HttpEnforcementClient {
    pub fn new(config: ServiceConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// POST a JSON body to an authenticated rule endpoint and map the ack.
    async fn post_rule_command(&self, path: &str, body: Value) -> Result<(), AppError> {
        debug!(path, %body, "Sending rule command");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Service(format!(
                "enforcement service returned HTTP {} for {}",
                status.as_u16(),
                path
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EnforcementClient for HttpEnforcementClient {
    async fn fetch_clients(&self) -> Snapshot<Client> {
        let response = match self.http.get(self.url("/clients")).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Client list fetch failed: {e}");
                return Snapshot::Unavailable;
            }
        };
        if !response.status().is_success() {
            warn!("Client list fetch returned HTTP {}", response.status().as_u16());
            return Snapshot::Unavailable;
        }
        match response.json::<Vec<Client>>().await {
            Ok(clients) => {
                debug!(count = clients.len(), "Client list fetched");
                Snapshot::Confirmed(clients)
            }
            Err(e) => {
                warn!("Client list decode failed: {e}");
                Snapshot::Unavailable
            }
        }
    }

    async fn fetch_block_rules(&self) -> Snapshot<BlockRule> {
        let response = match self
            .http
            .get(self.url("/list"))
            .bearer_auth(&self.config.token)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Block rule fetch failed: {e}");
                return Snapshot::Unavailable;
            }
        };
        if !response.status().is_success() {
            warn!("Block rule fetch returned HTTP {}", response.status().as_u16());
            return Snapshot::Unavailable;
        }
        let body = match response.json::<Value>().await {
            Ok(v) => v,
            Err(e) => {
                warn!("Block rule decode failed: {e}");
                return Snapshot::Unavailable;
            }
        };
        // The rule list is nested under `blocks`; anything that is not a
        // sequence there counts as "no rules".
        match body.get("blocks") {
            Some(Value::Array(_)) => {
                match serde_json::from_value::<Vec<BlockRule>>(body["blocks"].clone()) {
                    Ok(rules) => {
                        debug!(count = rules.len(), "Block rule list fetched");
                        Snapshot::Confirmed(rules)
                    }
                    Err(e) => {
                        warn!("Block rule decode failed: {e}");
                        Snapshot::Unavailable
                    }
                }
            }
            _ => Snapshot::Confirmed(Vec::new()),
        }
    }

    async fn add_block_rule(
        &self,
        address: &str,
        port: Option<u16>,
        reason: &str,
    ) -> Result<(), AppError> {
        self.post_rule_command(
            "/block",
            serde_json::json!({ "ip": address, "port": port, "reason": reason }),
        )
        .await
    }

    async fn remove_block_rule(&self, address: &str) -> Result<(), AppError> {
        self.post_rule_command("/unblock", serde_json::json!({ "ip": address }))
            .await
    }
}
