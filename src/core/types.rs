//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// An environment variable name in the remote store (e.g. SITE_URL).
pub type EnvKey = String;

/// A plaintext environment variable value.
pub type EnvValue = String;

/// A Convex deployment name (e.g. `happy-animal-123`).
pub type DeploymentName = String;
