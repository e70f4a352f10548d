//! Credential resolution.
//!
//! Turns a snapshot of recognized inputs into exactly one
//! [`CredentialContext`]. When inputs for both modes are present the caller
//! must pick one explicitly; nothing silently takes precedence.
//!
//! ```text
//! override   local inputs   cloud inputs   result
//! ---------  -------------  -------------  ---------------------
//! none       yes            yes            Ambiguous
//! none       yes            no             Local
//! none       no             yes            Cloud
//! none       no             no             NoCredentials
//! local      *              *              Local (cloud ignored)
//! cloud      *              *              Cloud (local ignored)
//! ```

mod admin_key;

pub use admin_key::{AdminKeyProvider, CommandAdminKey, StaticAdminKey};

use tracing::debug;

use crate::core::constants::{
    DEPLOY_KEY_VAR, MODE_VAR, PREVIEW_NAME_VAR, SELF_HOSTED_ADMIN_KEY_VAR, SELF_HOSTED_URL_VAR,
};
use crate::core::domain::{CloudTarget, Credential, CredentialContext, Mode};
use crate::error::{CredentialError, Result};

/// Recognized credential inputs. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct CredentialInputs {
    pub url: Option<String>,
    pub admin_key: Option<Credential>,
    pub deploy_key: Option<Credential>,
    pub preview_name: Option<String>,
    pub mode: Option<Mode>,
}

impl CredentialInputs {
    /// Snapshot the process environment once.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidMode` if `ENVSYNC_MODE` is set to an
    /// unknown value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup (e.g. a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mode = match get(MODE_VAR) {
            Some(raw) => Some(raw.parse::<Mode>()?),
            None => None,
        };

        Ok(Self {
            url: get(SELF_HOSTED_URL_VAR),
            admin_key: get(SELF_HOSTED_ADMIN_KEY_VAR).map(Credential::new),
            deploy_key: get(DEPLOY_KEY_VAR).map(Credential::new),
            preview_name: get(PREVIEW_NAME_VAR),
            mode,
        })
    }

    fn has_local(&self) -> bool {
        self.url.is_some() || self.admin_key.is_some()
    }

    fn has_cloud(&self) -> bool {
        self.deploy_key.is_some()
    }
}

/// Resolves [`CredentialInputs`] into a [`CredentialContext`].
pub struct Resolver {
    inputs: CredentialInputs,
    admin_keys: Option<Box<dyn AdminKeyProvider>>,
}

impl Resolver {
    pub fn new(inputs: CredentialInputs) -> Self {
        Self {
            inputs,
            admin_keys: None,
        }
    }

    /// Provider consulted when local mode has a URL but no admin key.
    pub fn with_admin_key_provider(mut self, provider: Box<dyn AdminKeyProvider>) -> Self {
        self.admin_keys = Some(provider);
        self
    }

    /// Apply a mode override unless a higher-precedence one is already set.
    pub fn with_default_mode(mut self, mode: Option<Mode>) -> Self {
        if self.inputs.mode.is_none() {
            self.inputs.mode = mode;
        }
        self
    }

    /// Force a mode, replacing any existing override.
    pub fn with_mode(mut self, mode: Option<Mode>) -> Self {
        if mode.is_some() {
            self.inputs.mode = mode;
        }
        self
    }

    /// Produce exactly one credential context.
    ///
    /// # Errors
    ///
    /// - `CredentialError::Ambiguous` if both modes have inputs and no mode
    ///   override is set
    /// - `CredentialError::NoCredentials` if neither has
    /// - `CredentialError::MissingCredential`, `InvalidDeployKey`,
    ///   `MissingPreviewName` or `AdminKey` if the selected mode is incomplete
    pub fn resolve(&self) -> Result<CredentialContext> {
        let inputs = &self.inputs;

        let mode = match inputs.mode {
            Some(mode) => {
                debug!(mode = %mode, "credential mode set explicitly");
                mode
            }
            None => match (inputs.has_local(), inputs.has_cloud()) {
                (true, true) => {
                    return Err(CredentialError::Ambiguous {
                        local: SELF_HOSTED_URL_VAR,
                        cloud: DEPLOY_KEY_VAR,
                    }
                    .into())
                }
                (true, false) => Mode::Local,
                (false, true) => Mode::Cloud,
                (false, false) => return Err(CredentialError::NoCredentials.into()),
            },
        };

        match mode {
            Mode::Local => self.resolve_local(),
            Mode::Cloud => self.resolve_cloud(),
        }
    }

    fn resolve_local(&self) -> Result<CredentialContext> {
        let inputs = &self.inputs;
        if inputs.has_cloud() {
            debug!("ignoring deploy key in local mode");
        }

        let url = inputs
            .url
            .clone()
            .ok_or(CredentialError::MissingCredential {
                mode: "local",
                name: SELF_HOSTED_URL_VAR,
            })?;

        let admin_key = match (&inputs.admin_key, &self.admin_keys) {
            (Some(key), _) => key.clone(),
            (None, Some(provider)) => {
                debug!(provider = provider.name(), "admin key not set, asking provider");
                provider.fetch()?
            }
            (None, None) => {
                return Err(CredentialError::MissingCredential {
                    mode: "local",
                    name: SELF_HOSTED_ADMIN_KEY_VAR,
                }
                .into())
            }
        };

        Ok(CredentialContext::Local {
            url: url.trim_end_matches('/').to_string(),
            admin_key,
        })
    }

    fn resolve_cloud(&self) -> Result<CredentialContext> {
        let inputs = &self.inputs;
        if inputs.has_local() {
            debug!("ignoring self-hosted inputs in cloud mode");
        }

        let deploy_key = inputs
            .deploy_key
            .clone()
            .ok_or(CredentialError::MissingCredential {
                mode: "cloud",
                name: DEPLOY_KEY_VAR,
            })?;

        let target = parse_target(deploy_key.expose(), inputs.preview_name.as_deref())?;

        Ok(CredentialContext::Cloud { deploy_key, target })
    }
}

/// Derive the target from a deploy key of the form `<kind>:<name…>|<secret>`.
///
/// # Errors
///
/// Returns `CredentialError::InvalidDeployKey` for an unknown shape and
/// `CredentialError::MissingPreviewName` for a preview key without a name.
pub fn parse_target(deploy_key: &str, preview_name: Option<&str>) -> Result<CloudTarget> {
    let (prefix, secret) = deploy_key
        .split_once('|')
        .ok_or_else(|| CredentialError::InvalidDeployKey("missing '|' separator".to_string()))?;

    if secret.is_empty() {
        return Err(CredentialError::InvalidDeployKey("empty key material".to_string()).into());
    }

    let (kind, rest) = prefix
        .split_once(':')
        .ok_or_else(|| CredentialError::InvalidDeployKey(format!("unrecognized prefix '{}'", prefix)))?;

    match kind {
        "prod" if !rest.is_empty() && !rest.contains(':') => Ok(CloudTarget::Prod {
            deployment: rest.to_string(),
        }),
        "preview" if !rest.is_empty() => match preview_name {
            Some(name) if !name.trim().is_empty() => Ok(CloudTarget::Preview(name.to_string())),
            _ => Err(CredentialError::MissingPreviewName.into()),
        },
        _ => Err(CredentialError::InvalidDeployKey(format!(
            "unrecognized prefix '{}': expected prod:<deployment> or preview:<team>:<project>",
            prefix
        ))
        .into()),
    }
}
