//! Centralized runtime constants and service configuration for netwarden.
//!
//! All tunables live here so they can be found and adjusted in a single place.
//! Credentials and the service base address are explicit configuration passed
//! into the client at construction, never module-level constants.

use std::time::Duration;

/// Timeout applied to every request against the enforcement service (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Reason attached to rules created by a bulk block when the operator has not
/// entered a per-host reason. A batch action has no modal to collect one, and
/// the service rejects rules without a reason.
pub const DEFAULT_BULK_BLOCK_REASON: &str = "Blocked by bulk action";

/// Environment variable holding the enforcement service base URL.
pub const ENV_SERVICE_URL: &str = "NETWARDEN_URL";

/// Environment variable holding the static bearer credential.
pub const ENV_SERVICE_TOKEN: &str = "NETWARDEN_TOKEN";

/// Connection settings for the enforcement service.
///
/// Immutable after construction; the HTTP client holds one copy and never
/// mutates it. The bearer token is an opaque shared secret, attached verbatim
/// to every authenticated request.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the enforcement service, without a trailing slash.
    pub base_url: String,
    /// Static bearer credential for the rule endpoints.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            token: token.into(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Build a config from `NETWARDEN_URL` / `NETWARDEN_TOKEN`.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var(ENV_SERVICE_URL)
            .map_err(|_| anyhow::anyhow!("{ENV_SERVICE_URL} is not set"))?;
        let token = std::env::var(ENV_SERVICE_TOKEN)
            .map_err(|_| anyhow::anyhow!("{ENV_SERVICE_TOKEN} is not set"))?;
        Ok(Self::new(base_url, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_trailing_slashes() {
        let cfg = ServiceConfig::new("http://127.0.0.1:8000///", "tok");
        assert_eq!(cfg.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_new_keeps_clean_url() {
        let cfg = ServiceConfig::new("http://10.0.0.1:8000", "tok");
        assert_eq!(cfg.base_url, "http://10.0.0.1:8000");
        assert_eq!(cfg.token, "tok");
        assert_eq!(cfg.timeout, Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn test_default_bulk_reason_is_non_empty() {
        assert!(!DEFAULT_BULK_BLOCK_REASON.trim().is_empty());
    }
}
