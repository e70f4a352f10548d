//! Configuration file management.
//!
//! Handles reading, writing, and validating `.envsync.toml`. The file is
//! optional; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::core::domain::Mode;
use crate::core::validation;
use crate::error::{ConfigError, Result};

/// Tool configuration stored in `.envsync.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

/// Which transport reaches the remote store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Deployment HTTP API.
    #[default]
    Http,
    /// The deployment's command-line tool.
    Cli,
}

/// `[remote]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub backend: BackendKind,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Deployment URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Program and leading arguments for the `cli` backend.
    pub command: Vec<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Http,
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            url: None,
            command: constants::DEFAULT_CLI_COMMAND
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[credentials]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Explicit mode. Lowest precedence; `ENVSYNC_MODE` and `--mode` win.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Command printing a self-hosted admin key on its last stdout line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admin_key_command: Vec<String>,
}

/// `[sync]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub env_file: PathBuf,
    /// Extra keys never taken from the bulk source.
    pub exclude: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(constants::ENV_FILE),
            exclude: Vec::new(),
        }
    }
}

/// `[keys]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeysConfig {
    pub private_key_var: String,
    pub jwks_var: String,
    pub bits: usize,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            private_key_var: constants::PRIVATE_KEY_VAR.to_string(),
            jwks_var: constants::JWKS_VAR.to_string(),
            bits: constants::DEFAULT_KEY_BITS,
        }
    }
}

impl Config {
    /// Default path in the current directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load configuration.
    ///
    /// With `path = None`, reads `.envsync.toml` if present and falls back to
    /// defaults otherwise. An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile`, `ConfigError::Parse`, or a validation
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        if !explicit && !path.exists() {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        Self::parse(&contents)
    }

    /// Parse and validate TOML contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving config");
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue`/`MissingField`, or a
    /// `ValidationError` for a bad variable name.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.timeout_secs",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        if self.remote.backend == BackendKind::Cli && self.remote.command.is_empty() {
            return Err(ConfigError::MissingField {
                field: "remote.command",
            }
            .into());
        }

        if let Some(url) = &self.remote.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: "remote.url",
                    reason: format!("not an http(s) URL: {}", url),
                }
                .into());
            }
        }

        if !matches!(self.keys.bits, 2048 | 3072 | 4096) {
            return Err(ConfigError::InvalidValue {
                field: "keys.bits",
                reason: format!("{} is not one of 2048, 3072, 4096", self.keys.bits),
            }
            .into());
        }

        validation::validate_key(&self.keys.private_key_var)?;
        validation::validate_key(&self.keys.jwks_var)?;
        for key in &self.sync.exclude {
            validation::validate_key(key)?;
        }

        Ok(())
    }
}
