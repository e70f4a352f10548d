//! Sync command - push a .env file to the deployment.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::cli::output;
use crate::cli::{Context, Globals, Outcome};
use crate::core::config::Config;
use crate::core::domain::{Diff, EntryStatus, SyncReport};
use crate::core::env::Source;
use crate::core::sync::{plan, sync, CancelToken, ExclusionSet};
use crate::error::Result;

/// Apply every entry of `file` (or `[sync] env_file`) to the remote store.
///
/// The file is parsed in full before credentials are resolved, so a
/// malformed file never leads to a remote call.
pub fn execute(
    globals: &Globals,
    file: Option<PathBuf>,
    exclude: Vec<String>,
    dry_run: bool,
    json: bool,
) -> Result<Outcome> {
    let config = Config::load(globals.config.as_deref())?;
    let path = file.unwrap_or_else(|| config.sync.env_file.clone());

    let source = Source::load(&path)?;
    info!(path = %path.display(), entries = source.len(), dry_run, "running sync");

    let mut exclusions = ExclusionSet::from_config(&config);
    exclusions.extend(exclude);

    let ctx = Context::resolve(globals, config)?;
    let store = ctx.open_store()?;

    if dry_run {
        let diff = plan(source.entries(), &exclusions, &*store)?;
        if json {
            let result = serde_json::json!({
                "entries": diff.entries(),
                "changes": diff.changes(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_plan(&diff, &path);
        }
        return Ok(Outcome::Done);
    }

    let cancel = CancelToken::new();
    install_signal_handlers(&cancel)?;

    let report = sync(source.entries(), &exclusions, &*store, &cancel)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        print_report(&report, &path);
    }

    Ok(if report.is_complete() {
        Outcome::Done
    } else {
        Outcome::Incomplete
    })
}

/// First SIGINT/SIGTERM requests a stop before the next write; a second one
/// exits immediately.
fn install_signal_handlers(cancel: &CancelToken) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::flag;

    for signal in [SIGINT, SIGTERM] {
        flag::register_conditional_shutdown(signal, 1, cancel.flag())?;
        flag::register(signal, cancel.flag())?;
    }
    debug!("signal handlers installed");
    Ok(())
}

fn print_plan(diff: &Diff, path: &std::path::Path) {
    output::section(&format!(
        "Plan for {}",
        output::path(&path.display().to_string())
    ));

    for entry in diff.entries() {
        let (marker, note) = match entry.status() {
            EntryStatus::Create => ('+', None),
            EntryStatus::Update => ('~', None),
            EntryStatus::Unchanged => ('=', None),
            EntryStatus::Excluded => ('-', Some("excluded")),
            EntryStatus::RemoteOnly => ('.', Some("remote only, left as is")),
        };
        output::status_item(marker, entry.key(), note);
    }

    println!();
    if diff.is_synced() {
        output::success("already in sync");
    } else {
        output::warn(&format!("would write {} keys", diff.changes()));
    }
}

fn print_report(report: &SyncReport, path: &std::path::Path) {
    output::section(&format!(
        "Sync {}",
        output::path(&path.display().to_string())
    ));

    for key in &report.applied {
        output::status_item('+', key, None);
    }
    for key in &report.skipped {
        output::status_item('-', key, Some("excluded"));
    }
    for (key, err) in &report.failed {
        output::status_item('!', key, Some(&err.to_string()));
    }
    for key in &report.not_attempted {
        output::status_item('?', key, Some("not attempted"));
    }

    println!();
    if report.is_complete() {
        output::success(&format!(
            "applied {} keys ({} skipped)",
            report.applied.len(),
            report.skipped.len()
        ));
        return;
    }

    if report.cancelled {
        output::warn(&format!(
            "cancelled after {} keys; {} not attempted",
            report.applied.len(),
            report.not_attempted.len()
        ));
    }
    if !report.failed.is_empty() {
        output::warn(&format!(
            "{} of {} keys failed",
            report.failed.len(),
            report.total()
        ));
    }
    output::hint("re-run to retry; applying the same file twice is harmless");
}
