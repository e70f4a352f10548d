//! Constants used throughout envsync.
//!
//! Centralizes variable names, file names and defaults.

/// Configuration file name (.envsync.toml).
pub const CONFIG_FILE: &str = ".envsync.toml";

/// Default source file for bulk sync.
pub const ENV_FILE: &str = ".env.convex";

/// Self-hosted deployment URL.
pub const SELF_HOSTED_URL_VAR: &str = "CONVEX_SELF_HOSTED_URL";

/// Self-hosted admin key.
pub const SELF_HOSTED_ADMIN_KEY_VAR: &str = "CONVEX_SELF_HOSTED_ADMIN_KEY";

/// Cloud deploy key.
pub const DEPLOY_KEY_VAR: &str = "CONVEX_DEPLOY_KEY";

/// Preview deployment name for preview deploy keys.
pub const PREVIEW_NAME_VAR: &str = "CONVEX_PREVIEW_NAME";

/// Explicit credential mode override (`local` or `cloud`).
pub const MODE_VAR: &str = "ENVSYNC_MODE";

/// Log filter variable.
pub const LOG_VAR: &str = "ENVSYNC_LOG";

/// Default variable holding the JWT signing key.
pub const PRIVATE_KEY_VAR: &str = "JWT_PRIVATE_KEY";

/// Default variable holding the public-key-set record.
pub const JWKS_VAR: &str = "JWKS";

/// Default RSA modulus size.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Default per-call timeout for the remote store, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default CLI used by the `cli` backend.
pub const DEFAULT_CLI_COMMAND: &[&str] = &["npx", "convex"];

/// Cloud deployment host suffix.
pub const CLOUD_HOST_SUFFIX: &str = "convex.cloud";
