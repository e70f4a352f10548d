//! SyncReport type.
//!
//! The externally observable result of a sync run.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::types::EnvKey;
use crate::error::RemoteError;

/// Per-key outcomes of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Keys written to the remote store, in source order.
    pub applied: Vec<EnvKey>,
    /// Keys skipped because they are in the exclusion set.
    pub skipped: Vec<EnvKey>,
    /// Keys whose write failed, with the error.
    pub failed: BTreeMap<EnvKey, RemoteError>,
    /// Whether the run stopped early on request.
    pub cancelled: bool,
    /// Keys never attempted because the run was cancelled.
    pub not_attempted: Vec<EnvKey>,
}

impl SyncReport {
    /// True when every non-excluded key was applied.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    /// Total number of keys considered.
    pub fn total(&self) -> usize {
        self.applied.len() + self.skipped.len() + self.failed.len() + self.not_attempted.len()
    }

    /// JSON-friendly view (errors rendered as strings).
    pub fn to_json(&self) -> serde_json::Value {
        #[derive(Serialize)]
        struct View<'a> {
            applied: &'a [EnvKey],
            skipped: &'a [EnvKey],
            failed: BTreeMap<&'a str, String>,
            cancelled: bool,
            not_attempted: &'a [EnvKey],
        }

        let view = View {
            applied: &self.applied,
            skipped: &self.skipped,
            failed: self
                .failed
                .iter()
                .map(|(k, e)| (k.as_str(), e.to_string()))
                .collect(),
            cancelled: self.cancelled,
            not_attempted: &self.not_attempted,
        };
        serde_json::to_value(view).unwrap_or(serde_json::Value::Null)
    }
}
