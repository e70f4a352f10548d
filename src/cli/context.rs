//! Per-command setup: configuration, credentials and the remote store.

use std::path::PathBuf;
use tracing::debug;

use crate::core::config::Config;
use crate::core::credentials::{CommandAdminKey, CredentialInputs, Resolver};
use crate::core::domain::{CredentialContext, Mode};
use crate::core::store::{self, RemoteStore};
use crate::error::Result;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub config: Option<PathBuf>,
    pub mode: Option<Mode>,
    pub preview_name: Option<String>,
}

/// Everything a remote command needs.
pub struct Context {
    pub config: Config,
    pub credentials: CredentialContext,
}

impl Context {
    /// Load config and resolve credentials from the process environment.
    ///
    /// Mode precedence: `--mode`, then `ENVSYNC_MODE`, then
    /// `[credentials] mode`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unreadable or invalid config file and
    /// `CredentialError` if credentials are missing or ambiguous.
    pub fn load(globals: &Globals) -> Result<Self> {
        let config = Config::load(globals.config.as_deref())?;
        Self::resolve(globals, config)
    }

    /// Resolve credentials against an already loaded config.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if credentials are missing or ambiguous.
    pub fn resolve(globals: &Globals, config: Config) -> Result<Self> {
        let mut inputs = CredentialInputs::from_env()?;
        if let Some(name) = globals.preview_name.as_deref().filter(|n| !n.trim().is_empty()) {
            inputs.preview_name = Some(name.to_string());
        }

        let mut resolver = Resolver::new(inputs)
            .with_default_mode(config.credentials.mode)
            .with_mode(globals.mode);

        if !config.credentials.admin_key_command.is_empty() {
            resolver = resolver.with_admin_key_provider(Box::new(CommandAdminKey::new(
                config.credentials.admin_key_command.clone(),
            )));
        }

        let credentials = resolver.resolve()?;
        debug!(deployment = %credentials.describe(), "credentials resolved");

        Ok(Self {
            config,
            credentials,
        })
    }

    /// Open the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if no deployment URL can be derived or the client
    /// cannot be built.
    pub fn open_store(&self) -> Result<Box<dyn RemoteStore>> {
        store::open(&self.config, &self.credentials)
    }
}
