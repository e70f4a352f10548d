//! Keys command - provision the token signing key.

use std::io::{self, IsTerminal};

use tracing::info;

use crate::cli::output;
use crate::cli::{Context, Globals};
use crate::core::keys::{self, Provision};
use crate::core::store::RemoteStore;
use crate::error::{Error, Result};

/// Generate and store a signing key pair.
///
/// Overwriting an existing key asks for confirmation on an interactive
/// terminal unless `yes` is set.
pub fn generate(
    globals: &Globals,
    force: bool,
    yes: bool,
    bits: Option<usize>,
    print: bool,
) -> Result<()> {
    let mut ctx = Context::load(globals)?;
    if let Some(bits) = bits {
        ctx.config.keys.bits = bits;
    }
    let names = ctx.config.keys.clone();
    let store = ctx.open_store()?;

    if force && !yes && !confirm_overwrite(&*store, &names.private_key_var)? {
        output::dimmed("aborted");
        return Ok(());
    }

    info!(bits = names.bits, force, "provisioning signing key");

    match keys::provision(&*store, &names, force)? {
        Provision::Created(pair) => {
            let jwk = &pair.jwks().keys[0];
            output::success(&format!(
                "stored {} and {}",
                output::key(&names.private_key_var),
                output::key(&names.jwks_var)
            ));
            output::kv("bits:", names.bits);
            output::kv("thumbprint:", keys::thumbprint(jwk));
            if print {
                output::data(&pair.jwks().to_json()?);
            }
        }
        Provision::AlreadyExists => {
            output::success(&format!(
                "{} already set, nothing to do",
                output::key(&names.private_key_var)
            ));
            output::hint("use --force to replace it");
            if print {
                if let Some(jwks) = store.get(&names.jwks_var)? {
                    output::data(&jwks);
                }
            }
        }
    }

    Ok(())
}

/// Ask before replacing a stored key. Non-interactive runs proceed.
fn confirm_overwrite(store: &dyn RemoteStore, var: &str) -> Result<bool> {
    if !io::stdin().is_terminal() || store.get(var)?.is_none() {
        return Ok(true);
    }

    output::warn(&format!(
        "{} is already set; tokens signed with the old key will stop verifying",
        var
    ));
    dialoguer::Confirm::new()
        .with_prompt("Replace it?")
        .default(false)
        .interact()
        .map_err(|e| Error::Other(format!("prompt failed: {}", e)))
}
