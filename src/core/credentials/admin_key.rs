//! Admin key providers.
//!
//! A self-hosted deployment's admin key is usually produced by a script
//! inside the backend container. [`AdminKeyProvider`] hides how the key is
//! obtained so the resolver never shells out on its own.

use std::process::{Command, Stdio};
use tracing::{debug, trace};

use crate::core::domain::Credential;
use crate::error::{CredentialError, Result};

/// Something that can produce a self-hosted admin key on demand.
pub trait AdminKeyProvider {
    /// Short label for logs and errors.
    fn name(&self) -> &'static str;

    /// Fetch the admin key.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::AdminKey` if no key could be produced.
    fn fetch(&self) -> Result<Credential>;
}

/// A fixed admin key.
pub struct StaticAdminKey(Credential);

impl StaticAdminKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Credential::new(key))
    }
}

impl AdminKeyProvider for StaticAdminKey {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch(&self) -> Result<Credential> {
        Ok(self.0.clone())
    }
}

/// Runs a command and uses the last non-empty line of its stdout.
///
/// Typical argv: `docker compose exec backend ./generate_admin_key.sh`.
pub struct CommandAdminKey {
    argv: Vec<String>,
}

impl CommandAdminKey {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl AdminKeyProvider for CommandAdminKey {
    fn name(&self) -> &'static str {
        "command"
    }

    fn fetch(&self) -> Result<Credential> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| CredentialError::AdminKey("empty admin key command".to_string()))?;

        debug!(program = %program, "fetching admin key from command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CredentialError::AdminKey(format!("failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CredentialError::AdminKey(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            ))
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let key = last_nonempty_line(&stdout).ok_or_else(|| {
            CredentialError::AdminKey(format!("{} printed no admin key", program))
        })?;

        trace!(key_len = key.len(), "admin key fetched");
        Ok(Credential::new(key))
    }
}

/// Key-generation scripts print a banner before the key itself.
fn last_nonempty_line(output: &str) -> Option<&str> {
    output.lines().rev().map(str::trim).find(|l| !l.is_empty())
}
