//! # tdec-client
//!
//! Async client for the 3decision structural-biology database API.
//!
//! [`DecisionClient`] owns the session (base URL, API key, bearer token) and
//! the user's settings. Its methods are spread over one module per concern:
//! - [`session`]: configure, login, authenticated transport with one
//!   re-login retry
//! - [`search`]: submit a search and poll its queue job
//! - [`resolver`]: batched GraphQL lookup of structure details
//! - [`export`]: domain-event exports, single, transformed and ZIP
//! - [`catalog`]: projects and their structure assignments
//! - [`files`]: associated files of a structure
//! - [`annotation`]: the "Internal ID" annotation of a structure
//!
//! Long operations take a [`JobContext`] for progress and cancellation; the
//! `spawn_*` helpers run them as a [`JobTask`].
//!
//! ```no_run
//! # async fn run() -> Result<(), tdec_client::ClientError> {
//! use std::sync::Arc;
//! use tdec_client::DecisionClient;
//! use tdec_config::TdecConfig;
//!
//! let client = Arc::new(DecisionClient::new(TdecConfig::default())?);
//! client.configure("https://3dec.example.com/api", "my-api-key");
//! let task = client.spawn_search("ABL1");
//! let records = task.join().await?;
//! println!("{} structures", records.len());
//! # Ok(())
//! # }
//! ```

pub mod annotation;
pub mod archive;
pub mod catalog;
pub mod export;
pub mod files;
pub mod poller;
pub mod request;
pub mod resolver;
pub mod search;
pub mod session;
pub mod task;

mod error;
mod http;
mod shapes;

pub use archive::unpack_structure_archive;
pub use error::ClientError;
pub use poller::{PollPolicy, PollStep, poll_until};
pub use request::{ApiRequest, Method};
pub use search::SearchSubmission;
pub use session::{Session, normalize_base_url};
pub use task::{CancelToken, JobContext, JobProgress, JobTask};

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tdec_config::{CatalogConfig, ConfigStore, TdecConfig};
use tdec_core::{NamingAttribute, StructureRecord, TransformedExportRequest};

/// Version header every call carries, with value `1`.
pub const API_VERSION_HEADER: &str = "x-api-version";

struct ClientState {
    session: Session,
    settings: TdecConfig,
}

/// Client for one 3decision server.
///
/// Share it behind an [`Arc`]; session state sits behind a lock that is never
/// held across an `.await`.
pub struct DecisionClient {
    http: reqwest::Client,
    state: RwLock<ClientState>,
    store: Option<ConfigStore>,
}

impl std::fmt::Debug for DecisionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("DecisionClient")
            .field("base_url", &state.session.base_url())
            .field("configured", &state.session.is_configured())
            .field("has_token", &state.session.token().is_some())
            .field("store", &self.store.as_ref().map(ConfigStore::path))
            .finish_non_exhaustive()
    }
}

impl DecisionClient {
    /// A client whose settings live in memory only.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: TdecConfig) -> Result<Self, ClientError> {
        Self::build(settings, None)
    }

    /// A client that persists token and preference changes to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn with_store(settings: TdecConfig, store: ConfigStore) -> Result<Self, ClientError> {
        Self::build(settings, Some(store))
    }

    /// Load settings from `store` (plus `TDEC_*` env) and persist back to it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the settings cannot be loaded.
    pub fn from_store(store: ConfigStore) -> Result<Self, ClientError> {
        let settings = store.load()?;
        Self::with_store(settings, store)
    }

    fn build(settings: TdecConfig, store: Option<ConfigStore>) -> Result<Self, ClientError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static("1"),
        );

        let http = reqwest::Client::builder()
            .user_agent(settings.http.user_agent.clone())
            .timeout(settings.http.timeout())
            .danger_accept_invalid_certs(settings.http.accept_invalid_certs)
            .default_headers(default_headers)
            .build()?;

        let session = Session::from_api_config(&settings.api);
        Ok(Self {
            http,
            state: RwLock::new(ClientState { session, settings }),
            store,
        })
    }

    /// Current settings, with the live session folded into `[api]`.
    #[must_use]
    pub fn settings(&self) -> TdecConfig {
        let state = self.read_state();
        let mut settings = state.settings.clone();
        state.session.write_into(&mut settings.api);
        settings
    }

    #[must_use]
    pub fn logging_enabled(&self) -> bool {
        self.read_state().settings.general.logging_enabled
    }

    #[must_use]
    pub fn naming_attribute(&self) -> NamingAttribute {
        self.read_state().settings.general.naming_attribute
    }

    #[must_use]
    pub fn store(&self) -> Option<&ConfigStore> {
        self.store.as_ref()
    }

    pub(crate) fn catalog_settings(&self) -> CatalogConfig {
        self.read_state().settings.catalog.clone()
    }

    pub(crate) fn poll_policy(
        &self,
        pick: impl FnOnce(&tdec_config::PollingConfig) -> u32,
    ) -> PollPolicy {
        let state = self.read_state();
        let polling = &state.settings.polling;
        PollPolicy::new(polling.interval(), pick(polling))
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ClientState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ClientState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run [`DecisionClient::search`] in the background.
    #[must_use]
    pub fn spawn_search(
        self: &Arc<Self>,
        query: impl Into<String>,
    ) -> JobTask<Vec<StructureRecord>> {
        let client = Arc::clone(self);
        let query = query.into();
        JobTask::spawn(move |ctx| async move { client.search(&query, &ctx).await })
    }

    /// Run [`DecisionClient::export_single`] in the background.
    #[must_use]
    pub fn spawn_export(self: &Arc<Self>, structure_id: i64) -> JobTask<String> {
        let client = Arc::clone(self);
        JobTask::spawn(move |ctx| async move { client.export_single(structure_id, &ctx).await })
    }

    /// Run [`DecisionClient::export_with_transforms`] in the background.
    #[must_use]
    pub fn spawn_export_with_transforms(
        self: &Arc<Self>,
        requests: Vec<TransformedExportRequest>,
    ) -> JobTask<BTreeMap<String, String>> {
        let client = Arc::clone(self);
        JobTask::spawn(move |ctx| async move {
            client.export_with_transforms(&requests, &ctx).await
        })
    }
}
