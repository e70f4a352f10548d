//! SecretKeyPair and public-key-set types.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// A single public key in a key set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    #[serde(rename = "use")]
    pub key_use: String,
    pub kty: String,
    /// Modulus, URL-safe base64 without padding.
    pub n: String,
    /// Public exponent, URL-safe base64 without padding.
    pub e: String,
}

/// A public-key-set record (`{"keys": [...]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

impl Jwks {
    /// Compact JSON, as stored in the remote store.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A generated signing key and its published public half.
pub struct SecretKeyPair {
    private_key_pem: Zeroizing<String>,
    jwks: Jwks,
}

impl SecretKeyPair {
    pub fn new(private_key_pem: Zeroizing<String>, jwks: Jwks) -> Self {
        Self {
            private_key_pem,
            jwks,
        }
    }

    /// PKCS#8 PEM, multi-line.
    pub fn private_key_pem(&self) -> &str {
        self.private_key_pem.as_str()
    }

    /// The PEM folded onto one line (newlines become spaces), which is how it
    /// is stored as an environment variable.
    pub fn private_key_env_value(&self) -> Zeroizing<String> {
        Zeroizing::new(self.private_key_pem.trim_end().replace('\n', " "))
    }

    pub fn jwks(&self) -> &Jwks {
        &self.jwks
    }
}

impl std::fmt::Debug for SecretKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKeyPair")
            .field("private_key_pem", &"<redacted>")
            .field("jwks", &self.jwks)
            .finish()
    }
}
