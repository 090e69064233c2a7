//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (401/403 → [`ClientError::AuthenticationFailure`],
//! other non-success → [`ClientError::RequestFailure`]) and body decoding so
//! the endpoint modules stay focused on request construction and response
//! mapping.

use serde_json::Value;

use crate::error::ClientError;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// 401 and 403 both mean the bearer token was rejected.
pub(crate) fn is_auth_failure(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
}

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success.
pub(crate) async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = truncate(resp.text().await.unwrap_or_default());
    tracing::debug!(status = status.as_u16(), %body, "request failed");
    if is_auth_failure(status) {
        return Err(ClientError::AuthenticationFailure(format!(
            "server rejected credentials ({})",
            status.as_u16()
        )));
    }
    Err(ClientError::RequestFailure {
        status: status.as_u16(),
        message: body,
    })
}

/// Decode a JSON body, mapping parse errors to [`ClientError::MalformedResponse`].
pub(crate) async fn read_json(resp: reqwest::Response) -> Result<Value, ClientError> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::debug!(body = %truncate(text.clone()), "non-JSON response body");
        ClientError::MalformedResponse(format!("expected JSON: {e}"))
    })
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
