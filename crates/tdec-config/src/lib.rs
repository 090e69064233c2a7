//! # tdec-config
//!
//! Layered settings for tdec using figment.
//!
//! Sources (in priority order, highest wins):
//! 1. Environment variables (`TDEC_*` prefix, `__` as separator)
//! 2. The settings file (`<config_dir>/tdec/config.toml`, or an explicit path)
//! 3. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TDEC_API__BASE_URL` -> `api.base_url`,
//! `TDEC_POLLING__INTERVAL_MS` -> `polling.interval_ms`, etc.
//!
//! The settings file is also where the client persists what changes at
//! runtime (the bearer token, the logging flag, the naming attribute); see
//! [`ConfigStore`].
//!
//! # Usage
//!
//! ```no_run
//! use tdec_config::TdecConfig;
//!
//! let config = TdecConfig::load_with_dotenv().expect("config");
//! if config.api.is_configured() {
//!     println!("3decision at {}", config.api.base_url);
//! }
//! ```

mod api;
mod catalog;
mod error;
mod general;
mod http;
mod polling;
mod store;

pub use api::ApiConfig;
pub use catalog::CatalogConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use http::HttpConfig;
pub use polling::PollingConfig;
pub use store::ConfigStore;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of the environment overrides.
pub const ENV_PREFIX: &str = "TDEC_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TdecConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl TdecConfig {
    /// Load from defaults, the user settings file and the environment.
    ///
    /// Does NOT call `dotenvy`; use [`TdecConfig::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source holds a value of the
    /// wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load a `.env` file from the current directory first, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// See [`TdecConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load with an explicit settings file instead of the user one.
    ///
    /// # Errors
    ///
    /// See [`TdecConfig::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::figment_for(Some(path))
            .extract()
            .map_err(ConfigError::from)
    }

    /// The provider chain over the user settings file.
    pub fn figment() -> Figment {
        Self::figment_for(Self::default_config_path().as_deref())
    }

    /// The provider chain over `path` (skipped when it does not exist).
    ///
    /// Public so tests can inspect the figment or add providers on top.
    pub fn figment_for(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// `<config_dir>/tdec/config.toml`.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tdec").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdec_core::NamingAttribute;

    #[test]
    fn default_config_is_unconfigured() {
        let config = TdecConfig::default();
        assert!(!config.api.is_configured());
        assert!(!config.general.logging_enabled);
        assert_eq!(config.general.naming_attribute, NamingAttribute::Label);
        assert_eq!(config.polling.interval_ms, 2000);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: TdecConfig = TdecConfig::figment_for(None).extract()?;
            assert_eq!(config, TdecConfig::default());
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_skipped() {
        figment::Jail::expect_with(|jail| {
            let path = jail.directory().join("absent.toml");
            let config = TdecConfig::load_from(&path).expect("loads defaults");
            assert_eq!(config.polling.search_max_attempts, 60);
            Ok(())
        });
    }
}
