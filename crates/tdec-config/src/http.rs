//! HTTP transport settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_accept_invalid_certs() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("tdec/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Skip TLS certificate verification. On by default: most 3decision
    /// deployments sit behind self-signed certificates.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: default_accept_invalid_certs(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = HttpConfig::default();
        assert!(config.accept_invalid_certs);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.user_agent.starts_with("tdec/"));
    }
}
