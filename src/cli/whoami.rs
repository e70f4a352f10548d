//! Whoami command - show which deployment commands would talk to.

use crate::cli::output;
use crate::cli::{Context, Globals};
use crate::core::config::BackendKind;
use crate::core::store;
use crate::error::Result;

/// Print the resolved mode, target and redacted key. Makes no remote call.
pub fn execute(globals: &Globals) -> Result<()> {
    let ctx = Context::load(globals)?;

    output::header(&ctx.credentials.describe());
    output::kv("mode:", ctx.credentials.mode());
    output::kv("key:", ctx.credentials.secret().redacted());

    match ctx.config.remote.backend {
        BackendKind::Http => match store::deployment_url(&ctx.config, &ctx.credentials) {
            Ok(url) => output::kv("url:", url),
            Err(e) => output::warn(&e.to_string()),
        },
        BackendKind::Cli => output::kv("backend:", ctx.config.remote.command.join(" ")),
    }

    Ok(())
}
