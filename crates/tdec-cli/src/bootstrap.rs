use anyhow::Context;
use tdec_client::DecisionClient;
use tdec_config::ConfigStore;

use crate::cli::GlobalFlags;
use crate::context::AppContext;

/// Load `.env`, then the settings file, and build the client around it.
pub fn load_context(flags: &GlobalFlags) -> anyhow::Result<AppContext> {
    load_dotenv()?;

    let store = match &flags.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::default_location()
            .context("no config directory; pass --config <file>")?,
    };
    let config_path = store.path().to_path_buf();
    let client = DecisionClient::from_store(store)
        .with_context(|| format!("failed to load settings from {}", config_path.display()))?;

    Ok(AppContext::new(client, config_path))
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded dotenv file");
            Ok(())
        }
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(error).context("failed to load .env"),
    }
}
