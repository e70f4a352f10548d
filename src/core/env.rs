//! Config source reader.
//!
//! Parses `KEY=VALUE` files into an ordered, de-duplicated [`Source`].
//! Values are taken literally: one outer pair of double quotes is removed,
//! nothing else is unescaped.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::domain::ConfigEntry;
use crate::error::{ParseError, Result};

/// A parsed config source.
#[derive(Debug, Clone, Default)]
pub struct Source {
    entries: Vec<ConfigEntry>,
    path: Option<PathBuf>,
}

impl Source {
    /// Read and parse a source file.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::ReadFile` if the file cannot be read and
    /// `ParseError::MalformedLine` on the first line without a `=`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config source");

        let contents = std::fs::read_to_string(path).map_err(|source| ParseError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;

        let mut source = parse_lines(contents.lines())?;
        source.path = Some(path.to_path_buf());

        debug!(entries = source.len(), "config source loaded");
        Ok(source)
    }

    /// Build from entries, applying last-write-wins.
    pub fn from_entries(entries: impl IntoIterator<Item = ConfigEntry>) -> Self {
        let mut source = Self::default();
        for entry in entries {
            source.insert(entry);
        }
        source
    }

    /// Insert an entry. A repeated key replaces the earlier value in place.
    pub fn insert(&mut self, entry: ConfigEntry) {
        match self.entries.iter_mut().find(|e| e.key() == entry.key()) {
            Some(existing) => {
                trace!(key = entry.key(), "duplicate key, later value wins");
                existing.replace(entry);
            }
            None => self.entries.push(entry),
        }
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key() == key)
            .map(|e| e.value())
    }

    /// Entries in sync order.
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File the source was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Serialize back to `KEY=VALUE` lines, re-quoting only values that
    /// were quoted in the source.
    pub fn to_env_string(&self) -> String {
        let mut output = String::new();
        for entry in &self.entries {
            output.push_str(&entry.to_line());
            output.push('\n');
        }
        output
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_env_string())
    }
}

/// Parse an ordered sequence of lines.
///
/// # Errors
///
/// Returns `ParseError::MalformedLine` if a non-blank, non-comment line has
/// no `=` or an empty key. Nothing is returned for a malformed input, so no
/// entry of a bad file can reach the remote store.
pub fn parse_lines<'a, I>(lines: I) -> Result<Source>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut source = Source::default();

    for (idx, raw) in lines.into_iter().enumerate() {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);

        let malformed = || ParseError::MalformedLine {
            line: idx + 1,
            content: raw.to_string(),
        };

        let (key, value) = line.split_once('=').ok_or_else(malformed)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed().into());
        }

        source.insert(parse_value(key, value.trim()));
    }

    Ok(source)
}

/// Strip exactly one outer pair of double quotes, if present.
fn parse_value(key: &str, raw: &str) -> ConfigEntry {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return ConfigEntry::quoted(key, &raw[1..raw.len() - 1]);
    }
    ConfigEntry::new(key, raw)
}
