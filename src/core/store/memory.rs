//! In-memory backend.
//!
//! Keeps values in a map and records every write. Failures can be injected
//! per key to exercise partial-failure paths.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use super::RemoteStore;
use crate::error::{RemoteError, RemoteResult};

/// Remote store held in process memory.
#[derive(Debug, Default)]
pub struct Memory {
    values: RefCell<BTreeMap<String, String>>,
    failures: RefCell<HashMap<String, RemoteError>>,
    writes: RefCell<Vec<String>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing values.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.values.borrow_mut().extend(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into())),
        );
        store
    }

    /// Make every `set` of `key` fail with `error`.
    pub fn fail_on(&self, key: &str, error: RemoteError) {
        self.failures.borrow_mut().insert(key.to_string(), error);
    }

    /// Stop failing writes to `key`.
    pub fn heal(&self, key: &str) {
        self.failures.borrow_mut().remove(key);
    }

    /// Keys passed to `set`, in call order, including failed calls.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    /// Current contents.
    pub fn values(&self) -> BTreeMap<String, String> {
        self.values.borrow().clone()
    }
}

impl RemoteStore for Memory {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> RemoteResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RemoteResult<()> {
        self.writes.borrow_mut().push(key.to_string());

        if let Some(err) = self.failures.borrow().get(key) {
            return Err(err.clone());
        }

        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn list(&self) -> RemoteResult<Vec<String>> {
        Ok(self.values.borrow().keys().cloned().collect())
    }

    fn snapshot(&self) -> RemoteResult<BTreeMap<String, String>> {
        Ok(self.values())
    }
}
