//! Error types.
//!
//! Each concern has its own enum; [`Error`] wraps them so `?` works across
//! module boundaries.

use thiserror::Error;

/// Top-level error for envsync operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Keygen(#[from] KeygenError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Credential resolution failures. All of these are raised before any
/// remote call is made.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error(
        "ambiguous credentials: both self-hosted ({local}) and deploy key ({cloud}) are set"
    )]
    Ambiguous {
        local: &'static str,
        cloud: &'static str,
    },

    #[error("no credentials found: set CONVEX_SELF_HOSTED_URL + CONVEX_SELF_HOSTED_ADMIN_KEY or CONVEX_DEPLOY_KEY")]
    NoCredentials,

    #[error("missing credential for {mode} mode: {name}")]
    MissingCredential { mode: &'static str, name: &'static str },

    #[error("invalid deploy key: {0}")]
    InvalidDeployKey(String),

    #[error("deploy key targets a preview deployment but no preview name was given")]
    MissingPreviewName,

    #[error("invalid mode '{0}': expected 'local' or 'cloud'")]
    InvalidMode(String),

    #[error("admin key provider failed: {0}")]
    AdminKey(String),
}

/// Config source parse failures.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed line {line}: expected KEY=VALUE, got '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Remote store failures.
///
/// `Authentication` is fatal for a whole batch; the others are recorded per key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("authentication rejected by remote store: {0}")]
    Authentication(String),

    #[error("remote store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response from remote store: {0}")]
    Protocol(String),
}

impl RemoteError {
    /// Whether further calls against the same store are pointless.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, RemoteError::Authentication(_))
    }
}

/// `.envsync.toml` failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("missing config value: {field}")]
    MissingField { field: &'static str },
}

/// Key generation and public-key-set validation failures.
#[derive(Error, Debug)]
pub enum KeygenError {
    #[error("key generation failed: {0}")]
    Generate(String),

    #[error("failed to encode private key: {0}")]
    Encode(String),

    #[error("unsupported key size {0}: expected 2048, 3072 or 4096")]
    UnsupportedBits(usize),

    #[error("invalid JWKS field '{field}': {reason}")]
    InvalidJwks { field: &'static str, reason: String },

    #[error("stored signing key and key set do not match: {0}")]
    Mismatch(String),
}

/// Input validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("key cannot be empty")]
    EmptyKey,

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value for '{0}' cannot be empty")]
    EmptyValue(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Result type for remote store calls.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
