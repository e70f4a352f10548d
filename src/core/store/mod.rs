//! Remote configuration store access.
//!
//! [`RemoteStore`] is the only way envsync talks to a deployment. Keys and
//! values cross this boundary as opaque data: no backend may let a value be
//! interpreted as a flag or option.
//!
//! ## Backends
//!
//! - **http** (default): deployment HTTP API via a blocking `reqwest` client.
//! - **cli**: the deployment CLI, values passed after a `--` terminator.
//! - **memory**: in-process map, for tests and embedding.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `RemoteStore` trait
//! 2. Add the implementation in a new file
//! 3. Wire it into [`open`] and re-export from this module

use std::collections::BTreeMap;

use crate::error::RemoteResult;

mod backend;
mod cli;
mod http;
mod memory;

pub use backend::{deployment_url, open};
pub use cli::Cli;
pub use http::Http;
pub use memory::Memory;

/// Capability set of a remote key/value configuration store.
///
/// Every call is bounded by the backend's timeout and fails with
/// `RemoteError::Unavailable` on expiry.
pub trait RemoteStore {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Read a value.
    ///
    /// # Returns
    ///
    /// `None` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport or authentication failure.
    fn get(&self, key: &str) -> RemoteResult<Option<String>>;

    /// Write a value. Last write wins, so repeating a call is harmless.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport, authentication or rejection.
    fn set(&self, key: &str, value: &str) -> RemoteResult<()>;

    /// List all key names.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport or authentication failure.
    fn list(&self) -> RemoteResult<Vec<String>>;

    /// All keys with their values.
    ///
    /// The default issues one `get` per listed key; backends that can fetch
    /// everything at once override it.
    fn snapshot(&self) -> RemoteResult<BTreeMap<String, String>> {
        let mut values = BTreeMap::new();
        for key in self.list()? {
            if let Some(value) = self.get(&key)? {
                values.insert(key, value);
            }
        }
        Ok(values)
    }
}

impl<S: RemoteStore + ?Sized> RemoteStore for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn get(&self, key: &str) -> RemoteResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> RemoteResult<()> {
        (**self).set(key, value)
    }

    fn list(&self) -> RemoteResult<Vec<String>> {
        (**self).list()
    }

    fn snapshot(&self) -> RemoteResult<BTreeMap<String, String>> {
        (**self).snapshot()
    }
}
