use std::path::PathBuf;
use std::sync::Arc;

use tdec_client::DecisionClient;

/// Shared resources every command handler receives.
pub struct AppContext {
    pub client: Arc<DecisionClient>,
    /// Settings file the client reads from and persists to.
    pub config_path: PathBuf,
}

impl AppContext {
    #[must_use]
    pub fn new(client: DecisionClient, config_path: PathBuf) -> Self {
        Self {
            client: Arc::new(client),
            config_path,
        }
    }
}
