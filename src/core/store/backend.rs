//! Backend selection.
//!
//! Picks the transport from `[remote] backend` and derives the deployment
//! URL from the resolved credentials.

use tracing::info;

use super::{Cli, Http, RemoteStore};
use crate::core::config::{BackendKind, Config};
use crate::core::constants::CLOUD_HOST_SUFFIX;
use crate::core::domain::{CloudTarget, CredentialContext};
use crate::error::{ConfigError, Result};

/// Open the configured remote store for `credentials`.
///
/// # Errors
///
/// Returns `ConfigError::MissingField` if no deployment URL can be derived
/// for the HTTP backend, or `RemoteError` if the client cannot be built.
pub fn open(config: &Config, credentials: &CredentialContext) -> Result<Box<dyn RemoteStore>> {
    let timeout = config.remote.timeout();

    match config.remote.backend {
        BackendKind::Http => {
            let url = deployment_url(config, credentials)?;
            info!(url = %url, mode = %credentials.mode(), "using HTTP backend");
            Ok(Box::new(Http::new(&url, credentials.secret().clone(), timeout)?))
        }
        BackendKind::Cli => {
            info!(command = ?config.remote.command, mode = %credentials.mode(), "using CLI backend");
            Ok(Box::new(Cli::new(
                config.remote.command.clone(),
                credentials.clone(),
                timeout,
            )))
        }
    }
}

/// Deployment URL for the HTTP backend.
///
/// `[remote] url` wins; otherwise the self-hosted URL, or
/// `https://<deployment>.convex.cloud` for a production deploy key.
/// Preview deployments need an explicit URL.
///
/// # Errors
///
/// Returns `ConfigError::MissingField` for a preview target without
/// `[remote] url`.
pub fn deployment_url(config: &Config, credentials: &CredentialContext) -> Result<String> {
    if let Some(url) = &config.remote.url {
        return Ok(url.trim_end_matches('/').to_string());
    }

    match credentials {
        CredentialContext::Local { url, .. } => Ok(url.clone()),
        CredentialContext::Cloud {
            target: CloudTarget::Prod { deployment },
            ..
        } => Ok(format!("https://{}.{}", deployment, CLOUD_HOST_SUFFIX)),
        CredentialContext::Cloud {
            target: CloudTarget::Preview(_),
            ..
        } => Err(ConfigError::MissingField {
            field: "remote.url",
        }
        .into()),
    }
}
