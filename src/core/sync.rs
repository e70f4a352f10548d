//! Sync orchestrator.
//!
//! Applies a config source to a remote store one key at a time. Keys are
//! independent: a transient failure on one key is recorded and the batch
//! goes on. A rejected credential stops the batch, since every later call
//! would fail the same way.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::domain::{ConfigEntry, Diff, SyncReport};
use crate::core::store::RemoteStore;
use crate::error::Result;

/// Keys that must never be taken from the bulk source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    keys: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// The signing key, the key set, and any `[sync] exclude` entries.
    pub fn from_config(config: &Config) -> Self {
        let mut set = Self::from_keys([
            config.keys.private_key_var.clone(),
            config.keys.jwks_var.clone(),
        ]);
        set.extend(config.sync.exclude.iter().cloned());
        set
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Extend<String> for ExclusionSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.keys.extend(iter);
    }
}

/// Cooperative stop request, checked before each write.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Shared flag, for signal handlers.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

/// Apply `entries` to `store` in order.
///
/// Excluded keys are skipped with a warning, cancelled or not. Per-key remote
/// errors land in `SyncReport::failed`. Cancellation stops before the next
/// write and leaves earlier writes in place; the remaining keys are reported
/// as not attempted.
///
/// # Errors
///
/// Returns `RemoteError::Authentication` as soon as the store rejects the
/// credentials; keys applied before that stay applied.
pub fn sync(
    entries: &[ConfigEntry],
    exclusions: &ExclusionSet,
    store: &dyn RemoteStore,
    cancel: &CancelToken,
) -> Result<SyncReport> {
    info!(
        entries = entries.len(),
        exclusions = exclusions.len(),
        backend = store.name(),
        "starting sync"
    );

    let mut report = SyncReport::default();

    for entry in entries {
        let key = entry.key();

        if exclusions.contains(key) {
            warn!(key, "excluded from bulk sync, skipping");
            report.skipped.push(key.to_string());
            continue;
        }

        if report.cancelled || cancel.is_cancelled() {
            if !report.cancelled {
                warn!(next = key, "sync cancelled");
                report.cancelled = true;
            }
            report.not_attempted.push(key.to_string());
            continue;
        }

        match store.set(key, entry.value()) {
            Ok(()) => {
                debug!(key, "applied");
                report.applied.push(key.to_string());
            }
            Err(err) if err.is_batch_fatal() => {
                warn!(key, error = %err, "credentials rejected, aborting sync");
                return Err(err.into());
            }
            Err(err) => {
                warn!(key, error = %err, "failed to apply");
                report.failed.insert(key.to_string(), err);
            }
        }
    }

    info!(
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        cancelled = report.cancelled,
        "sync finished"
    );

    Ok(report)
}

/// Compute what [`sync`] would change, without writing.
///
/// # Errors
///
/// Returns `RemoteError` if the current remote values cannot be read.
pub fn plan(
    entries: &[ConfigEntry],
    exclusions: &ExclusionSet,
    store: &dyn RemoteStore,
) -> Result<Diff> {
    let remote = store.snapshot()?;
    debug!(remote = remote.len(), "fetched remote values for plan");
    Ok(Diff::compute(entries, &remote, exclusions))
}
