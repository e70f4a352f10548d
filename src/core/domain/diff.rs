//! Diff type.
//!
//! Compares a config source against the values currently in the remote store.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::core::domain::ConfigEntry;
use crate::core::sync::ExclusionSet;

/// What a sync would do to a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Key is absent remotely and would be created.
    Create,
    /// Key exists remotely with a different value.
    Update,
    /// Key exists remotely with the same value.
    Unchanged,
    /// Key is in the exclusion set and would be skipped.
    Excluded,
    /// Key exists remotely but not in the source. Sync never deletes it.
    RemoteOnly,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Create => "create",
            EntryStatus::Update => "update",
            EntryStatus::Unchanged => "unchanged",
            EntryStatus::Excluded => "excluded",
            EntryStatus::RemoteOnly => "remote_only",
        }
    }
}

/// A single entry in a diff comparison.
#[derive(Debug, Clone, Serialize)]
pub struct DiffEntry {
    key: String,
    status: EntryStatus,
}

impl DiffEntry {
    pub fn new(key: String, status: EntryStatus) -> Self {
        Self { key, status }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Whether applying this entry would change the remote store.
    pub fn is_change(&self) -> bool {
        matches!(self.status, EntryStatus::Create | EntryStatus::Update)
    }
}

/// The full plan for a sync run.
#[derive(Debug, Default)]
pub struct Diff {
    entries: Vec<DiffEntry>,
}

impl Diff {
    /// Compute the diff between source entries and remote values.
    ///
    /// Source entries come first, in source order; remote-only keys follow,
    /// sorted by name.
    pub fn compute(
        entries: &[ConfigEntry],
        remote: &BTreeMap<String, String>,
        exclusions: &ExclusionSet,
    ) -> Self {
        let mut out = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();

        for entry in entries {
            seen.insert(entry.key());
            let status = if exclusions.contains(entry.key()) {
                EntryStatus::Excluded
            } else {
                match remote.get(entry.key()) {
                    None => EntryStatus::Create,
                    Some(v) if v == entry.value() => EntryStatus::Unchanged,
                    Some(_) => EntryStatus::Update,
                }
            };
            out.push(DiffEntry::new(entry.key().to_string(), status));
        }

        for key in remote.keys() {
            if !seen.contains(key.as_str()) {
                out.push(DiffEntry::new(key.clone(), EntryStatus::RemoteOnly));
            }
        }

        Self { entries: out }
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Entries with the given status.
    pub fn with_status(&self, status: EntryStatus) -> Vec<&DiffEntry> {
        self.entries.iter().filter(|e| e.status == status).collect()
    }

    /// Number of keys a sync would write with a new value.
    pub fn changes(&self) -> usize {
        self.entries.iter().filter(|e| e.is_change()).count()
    }

    /// Whether the remote store already matches the source.
    pub fn is_synced(&self) -> bool {
        self.changes() == 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
