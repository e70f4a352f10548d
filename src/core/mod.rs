//! Core library components.
//!
//! Credential resolution, config source parsing, remote store access, sync
//! orchestration and signing key generation. Nothing in here prints to the
//! terminal; the CLI layer owns presentation.

pub mod config;
pub mod constants;
pub mod credentials;
pub mod domain;
pub mod env;
pub mod keys;
pub mod store;
pub mod sync;
pub mod types;
pub mod validation;
