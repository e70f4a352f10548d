//! envsync - Push local configuration into a Convex deployment.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envsync::cli::output;
use envsync::cli::{execute, Cli};
use envsync::core::constants::LOG_VAR;
use envsync::error::{CredentialError, Error, KeygenError, ParseError, RemoteError};

fn main() {
    // Exit status 2 is reserved for incomplete syncs, so usage errors exit 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    // Logs go to stderr so stdout stays clean for `get` and `--json`.
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envsync=debug")
        } else {
            EnvFilter::new("envsync=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match execute(cli) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            output::error(&e.to_string());
            if let Some(hint) = suggestion(&e) {
                output::hint(hint);
            }
            std::process::exit(1);
        }
    }
}

fn suggestion(e: &Error) -> Option<&'static str> {
    match e {
        Error::Credential(CredentialError::Ambiguous { .. }) => {
            Some("pick one with --mode local|cloud or ENVSYNC_MODE, or unset one set of variables")
        }
        Error::Credential(CredentialError::NoCredentials) => {
            Some("export CONVEX_SELF_HOSTED_URL and CONVEX_SELF_HOSTED_ADMIN_KEY, or CONVEX_DEPLOY_KEY")
        }
        Error::Credential(CredentialError::MissingPreviewName) => {
            Some("pass --preview-name or set CONVEX_PREVIEW_NAME")
        }
        Error::Parse(ParseError::MalformedLine { .. }) => {
            Some("every line must be KEY=VALUE; nothing was sent")
        }
        Error::Remote(RemoteError::Authentication(_)) => {
            Some("check the admin or deploy key; run: envsync whoami")
        }
        Error::Keygen(KeygenError::Mismatch(_)) => {
            Some("tokens will not verify; replace both with: envsync keys generate --force")
        }
        Error::Remote(RemoteError::Unavailable(_)) => {
            Some("is the deployment running? raise [remote] timeout_secs for slow links")
        }
        _ => None,
    }
}
