use std::fs;
use std::path::{Path, PathBuf};

use crate::TdecConfig;
use crate::error::ConfigError;

/// The persisted settings file.
///
/// Every save rewrites the whole document. On Unix the file is chmod 0600
/// since it holds the API key and bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at `<config_dir>/tdec/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when the platform has no config
    /// directory.
    pub fn default_location() -> Result<Self, ConfigError> {
        TdecConfig::default_config_path()
            .map(Self::new)
            .ok_or(ConfigError::NoConfigDir)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Layered load over this file (defaults, file, then `TDEC_*` env).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] on type mismatches in a source.
    pub fn load(&self) -> Result<TdecConfig, ConfigError> {
        TdecConfig::load_from(&self.path)
    }

    /// Write `config` as pretty TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the directory or file cannot be written
    /// and [`ConfigError::Serialize`] if the document cannot be rendered.
    pub fn save(&self, config: &TdecConfig) -> Result<(), ConfigError> {
        let rendered = toml::to_string_pretty(config)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, rendered).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(error) = fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
            {
                tracing::warn!(%error, path = %self.path.display(), "failed to chmod 0600 settings file");
            }
        }

        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
