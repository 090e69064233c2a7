use serde::Serialize;
use tdec_client::normalize_base_url;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ConfigureArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct ConfigureResponse {
    configured: bool,
    base_url: String,
    config_path: String,
}

/// Handle `tdec configure`.
pub async fn handle(args: &ConfigureArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(base_url) = normalize_base_url(&args.url) else {
        anyhow::bail!("server URL is empty");
    };
    if args.api_key.trim().is_empty() {
        anyhow::bail!("API key is empty");
    }

    if !ctx.client.reconfigure_and_test(&base_url, args.api_key.trim()).await {
        anyhow::bail!("could not log in to {base_url}; previous settings kept");
    }
    ctx.client.save_config()?;

    output(
        &ConfigureResponse {
            configured: true,
            base_url,
            config_path: ctx.config_path.display().to_string(),
        },
        flags.format,
    )
}
