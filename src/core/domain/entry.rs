//! ConfigEntry type.
//!
//! A single key/value pair read from a config source.

use crate::core::types::{EnvKey, EnvValue};

/// One `KEY=VALUE` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    key: EnvKey,
    value: EnvValue,
    quoted: bool,
}

impl ConfigEntry {
    /// Create an unquoted entry.
    pub fn new(key: impl Into<EnvKey>, value: impl Into<EnvValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            quoted: false,
        }
    }

    /// Create an entry whose source value was wrapped in double quotes.
    pub fn quoted(key: impl Into<EnvKey>, value: impl Into<EnvValue>) -> Self {
        Self {
            quoted: true,
            ..Self::new(key, value)
        }
    }

    /// Variable name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Plaintext value, outer quotes removed.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the source wrapped the value in double quotes.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub(crate) fn replace(&mut self, other: ConfigEntry) {
        self.value = other.value;
        self.quoted = other.quoted;
    }

    /// Render as a single source line.
    pub fn to_line(&self) -> String {
        if self.quoted {
            format!("{}=\"{}\"", self.key, self.value)
        } else {
            format!("{}={}", self.key, self.value)
        }
    }
}

impl std::fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}
