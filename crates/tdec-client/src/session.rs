//! Session state and the authenticated transport.
//!
//! The session holds the base URL, the API key and (after login) a bearer
//! token. Every call carries `X-API-Version: 1` and the configured user agent;
//! the `Dng-Api-Key` header is sent only while no token is held, after which
//! `Authorization: Bearer <token>` replaces it.
//!
//! [`DecisionClient::execute`] retries exactly once after a 401/403: it clears
//! the token, logs in again, and resends the original request.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tdec_config::ApiConfig;
use tdec_core::NamingAttribute;
use tracing::{debug, warn};

use crate::DecisionClient;
use crate::error::ClientError;
use crate::http::{is_auth_failure, read_json};
use crate::request::{ApiRequest, Method, has_scheme};

/// Header carrying the API key before login.
pub const API_KEY_HEADER: &str = "Dng-Api-Key";

/// Path of the key-for-token exchange.
const LOGIN_PATH: &str = "/auth/api/login";

/// Connection identity. A token is only ever held alongside a base URL and
/// API key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    base_url: Option<String>,
    api_key: Option<String>,
    token: Option<String>,
}

impl Session {
    /// Restore a session from persisted settings.
    #[must_use]
    pub fn from_api_config(api: &ApiConfig) -> Self {
        let mut session = Self::default();
        session.configure(&api.base_url, &api.api_key);
        if session.is_configured() {
            session.token = api.token().map(str::to_string);
        }
        session
    }

    /// Set connection details and drop any token. Never fails; blank input
    /// leaves the session unconfigured.
    pub fn configure(&mut self, base_url: &str, api_key: &str) {
        self.base_url = normalize_base_url(base_url);
        let key = api_key.trim();
        self.api_key = (!key.is_empty()).then(|| key.to_string());
        self.token = None;
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn set_token(&mut self, token: String) {
        if self.is_configured() {
            self.token = Some(token);
        }
    }

    pub(crate) fn clear_token(&mut self) {
        self.token = None;
    }

    pub(crate) fn write_into(&self, api: &mut ApiConfig) {
        api.base_url = self.base_url.clone().unwrap_or_default();
        api.api_key = self.api_key.clone().unwrap_or_default();
        api.token = self.token.clone().unwrap_or_default();
    }
}

/// Trim, default the scheme to `http://`, and drop trailing slashes.
///
/// Returns `None` for blank input.
#[must_use]
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let with_scheme = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    Some(with_scheme.trim_end_matches('/').to_string())
}

impl DecisionClient {
    /// Point the client at a server. Clears any held token; does not persist.
    pub fn configure(&self, base_url: &str, api_key: &str) {
        self.write_state().session.configure(base_url, api_key);
        debug!(base_url = ?self.session().base_url(), "client configured");
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.read_state().session.is_configured()
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.read_state().session.token().is_some()
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.read_state().session.clone()
    }

    /// Exchange the API key for a bearer token and persist it.
    pub async fn login(&self) -> bool {
        match self.try_login().await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "login failed");
                false
            }
        }
    }

    /// A held token is trusted without a network call; otherwise log in.
    pub async fn test_connection(&self) -> bool {
        if !self.is_configured() {
            return false;
        }
        if self.has_token() {
            debug!("using existing token");
            return true;
        }
        self.login().await
    }

    /// Configured and [`DecisionClient::test_connection`] succeeds.
    pub async fn is_authenticated(&self) -> bool {
        self.is_configured() && self.test_connection().await
    }

    /// Configure, then test; on failure the previous base URL, key and token
    /// are put back.
    pub async fn reconfigure_and_test(&self, base_url: &str, api_key: &str) -> bool {
        let previous = self.session();
        self.configure(base_url, api_key);
        if self.test_connection().await {
            return true;
        }
        warn!("connection test failed; restoring previous connection settings");
        self.write_state().session = previous;
        false
    }

    /// Drop the token and persist.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the settings file cannot be written.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.write_state().session.clear_token();
        self.save_config()
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the settings file cannot be written.
    pub fn set_logging_enabled(&self, enabled: bool) -> Result<(), ClientError> {
        self.write_state().settings.general.logging_enabled = enabled;
        self.save_config()
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the settings file cannot be written.
    pub fn set_naming_attribute(&self, attribute: NamingAttribute) -> Result<(), ClientError> {
        self.write_state().settings.general.naming_attribute = attribute;
        self.save_config()
    }

    /// Rewrite the settings file with the current session and preferences.
    /// A client without a store keeps everything in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the settings file cannot be written.
    pub fn save_config(&self) -> Result<(), ClientError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save(&self.settings())?;
        Ok(())
    }

    /// Perform `request`, re-authenticating once on 401/403.
    ///
    /// The returned response may still carry an error status; callers run it
    /// through their own status checks.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotConfigured`] without a base URL and key,
    /// [`ClientError::AuthenticationFailure`] when the re-login fails, and
    /// [`ClientError::Http`] on transport errors.
    pub async fn execute(&self, request: ApiRequest) -> Result<reqwest::Response, ClientError> {
        let response = self.send(&request).await?;
        if !is_auth_failure(response.status()) {
            return Ok(response);
        }

        debug!(
            description = request.description,
            status = response.status().as_u16(),
            "credentials rejected; logging in again"
        );
        self.write_state().session.clear_token();
        if let Err(error) = self.try_login().await {
            warn!(description = request.description, %error, "re-login failed");
            return Err(ClientError::AuthenticationFailure(format!(
                "re-login failed during {}: {error}",
                request.description
            )));
        }

        debug!(description = request.description, "re-login succeeded; retrying once");
        self.send(&request).await
    }

    /// Fail fast with a typed error when no working credentials are held.
    pub(crate) async fn require_connection(&self) -> Result<(), ClientError> {
        if !self.is_configured() {
            return Err(ClientError::NotConfigured);
        }
        if self.has_token() {
            return Ok(());
        }
        self.try_login().await
    }

    async fn try_login(&self) -> Result<(), ClientError> {
        let (url, api_key) = {
            let state = self.read_state();
            match (state.session.base_url(), state.session.api_key()) {
                (Some(base), Some(key)) => (format!("{base}{LOGIN_PATH}"), key.to_string()),
                _ => return Err(ClientError::NotConfigured),
            }
        };

        debug!(%url, "logging in");
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), %body, "login rejected");
            return Err(ClientError::AuthenticationFailure(format!(
                "login returned status {}",
                status.as_u16()
            )));
        }

        let body = read_json(response).await?;
        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ClientError::AuthenticationFailure("login response has no access_token".into())
            })?
            .to_string();

        self.write_state().session.set_token(token);
        if let Err(error) = self.save_config() {
            warn!(%error, "could not persist the new token");
        }
        debug!("login successful");
        Ok(())
    }

    async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, ClientError> {
        let (url, auth_name, auth_value) = {
            let state = self.read_state();
            let session = &state.session;
            let Some(base_url) = session.base_url() else {
                return Err(ClientError::NotConfigured);
            };
            let (name, value) = match (session.token(), session.api_key()) {
                (Some(token), _) => (AUTHORIZATION, format!("Bearer {token}")),
                (None, Some(key)) => (HeaderName::from_static("dng-api-key"), key.to_string()),
                (None, None) => return Err(ClientError::NotConfigured),
            };
            (request.url(base_url), name, value)
        };

        let mut headers = HeaderMap::new();
        headers.insert(auth_name, header_value(&auth_value)?);
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidInput(format!("header name {name:?}: {e}")))?;
            headers.insert(name, header_value(value)?);
        }

        let builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        }
        .headers(headers);
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        debug!(description = request.description, method = ?request.method, %url, "sending");
        let response = builder.send().await?;
        debug!(
            description = request.description,
            status = response.status().as_u16(),
            "received"
        );
        Ok(response)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::InvalidInput(format!("header value: {e}")))
}
