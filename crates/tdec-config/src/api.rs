//! Connection settings for the 3decision API.

use serde::{Deserialize, Serialize};

/// `[api]` section. Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Server root, e.g. `https://3decision.example.com/api`.
    #[serde(default)]
    pub base_url: String,

    /// Long-lived key exchanged for a bearer token at login.
    #[serde(default)]
    pub api_key: String,

    /// Bearer token from the last successful login.
    #[serde(default)]
    pub token: String,
}

impl ApiConfig {
    /// Both a base URL and an API key are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        Some(self.token.trim()).filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_url_and_key() {
        let mut config = ApiConfig::default();
        assert!(!config.is_configured());
        config.base_url = "https://3dec.example".into();
        assert!(!config.is_configured());
        config.api_key = "  ".into();
        assert!(!config.is_configured());
        config.api_key = "key".into();
        assert!(config.is_configured());
    }

    #[test]
    fn blank_token_is_unset() {
        let config = ApiConfig {
            token: " ".into(),
            ..ApiConfig::default()
        };
        assert_eq!(config.token(), None);
    }
}
