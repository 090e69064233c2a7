use serde::Serialize;
use serde_json::json;
use tdec_client::ClientError;
use tdec_core::NamingAttribute;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct StatusResponse {
    configured: bool,
    base_url: Option<String>,
    has_token: bool,
    authenticated: bool,
    logging_enabled: bool,
    naming_attribute: NamingAttribute,
    config_path: String,
}

/// Handle `tdec login`: always asks the server for a fresh token.
pub async fn handle_login(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !ctx.client.is_configured() {
        return Err(ClientError::NotConfigured.into());
    }
    if !ctx.client.login().await {
        return Err(ClientError::AuthenticationFailure("the server rejected the API key".into()).into());
    }

    let session = ctx.client.session();
    output(
        &json!({ "logged_in": true, "base_url": session.base_url() }),
        flags.format,
    )
}

/// Handle `tdec logout`.
pub fn handle_logout(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.client.logout()?;
    output(&json!({ "logged_out": true }), flags.format)
}

/// Handle `tdec status`. Logs in only when no token is held.
pub async fn handle_status(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let authenticated = client.is_authenticated().await;
    let session = client.session();

    output(
        &StatusResponse {
            configured: session.is_configured(),
            base_url: session.base_url().map(str::to_string),
            has_token: client.has_token(),
            authenticated,
            logging_enabled: client.logging_enabled(),
            naming_attribute: client.naming_attribute(),
            config_path: ctx.config_path.display().to_string(),
        },
        flags.format,
    )
}
