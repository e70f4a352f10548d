//! Credential types.
//!
//! [`CredentialContext`] is the single, explicitly resolved way of reaching
//! the remote store. [`Credential`] wraps key material so it never leaks
//! through `Debug` or logs.

use std::fmt;
use zeroize::Zeroizing;

use crate::core::types::DeploymentName;
use crate::error::CredentialError;

/// A secret credential string (admin key or deploy key).
///
/// Zeroized on drop; `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The raw credential. Only pass this to the transport.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// A short, non-reversible preview for display, e.g. `prod:happy…(72 chars)`.
    pub fn redacted(&self) -> String {
        let prefix: String = self
            .0
            .split('|')
            .next()
            .unwrap_or_default()
            .chars()
            .take(24)
            .collect();
        format!("{}…({} chars)", prefix, self.0.len())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Credential mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Self-hosted deployment reached with an admin key.
    Local,
    /// Cloud deployment reached with a deploy key.
    Cloud,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Local => "local",
            Mode::Cloud => "cloud",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "self-hosted" => Ok(Mode::Local),
            "cloud" => Ok(Mode::Cloud),
            other => Err(CredentialError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which cloud deployment a deploy key targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudTarget {
    /// Production deployment named in the key.
    Prod { deployment: DeploymentName },
    /// Named preview deployment.
    Preview(String),
}

/// The resolved way of reaching the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialContext {
    Local { url: String, admin_key: Credential },
    Cloud { deploy_key: Credential, target: CloudTarget },
}

impl CredentialContext {
    pub fn mode(&self) -> Mode {
        match self {
            CredentialContext::Local { .. } => Mode::Local,
            CredentialContext::Cloud { .. } => Mode::Cloud,
        }
    }

    /// The key sent in the `Authorization` header or CLI environment.
    pub fn secret(&self) -> &Credential {
        match self {
            CredentialContext::Local { admin_key, .. } => admin_key,
            CredentialContext::Cloud { deploy_key, .. } => deploy_key,
        }
    }

    /// Human-readable target, without key material.
    pub fn describe(&self) -> String {
        match self {
            CredentialContext::Local { url, .. } => format!("self-hosted at {}", url),
            CredentialContext::Cloud {
                target: CloudTarget::Prod { deployment },
                ..
            } => format!("cloud production deployment {}", deployment),
            CredentialContext::Cloud {
                target: CloudTarget::Preview(name),
                ..
            } => format!("cloud preview deployment {}", name),
        }
    }
}
