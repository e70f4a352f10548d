//! Signing key generation.
//!
//! Produces an RSA private key (PKCS#8 PEM) and the public-key-set record
//! published for token verification. Both `n` and `e` use the URL-safe
//! base64 alphabet without padding; standard base64 there makes verification
//! fail downstream without any error, so every generated record is checked
//! with [`validate_jwks`] before it leaves this module.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::core::config::KeysConfig;
use crate::core::domain::{Jwk, Jwks, SecretKeyPair};
use crate::core::store::RemoteStore;
use crate::error::{KeygenError, Result};

/// Outcome of [`provision`].
#[derive(Debug)]
pub enum Provision {
    /// A new key pair was generated and stored.
    Created(SecretKeyPair),
    /// A signing key is already stored; nothing was changed.
    AlreadyExists,
}

/// Generate a new key pair.
///
/// # Errors
///
/// Returns `KeygenError::UnsupportedBits` for sizes other than
/// 2048/3072/4096, or `KeygenError` if generation or encoding fails.
pub fn generate(bits: usize) -> Result<SecretKeyPair> {
    if !matches!(bits, 2048 | 3072 | 4096) {
        return Err(KeygenError::UnsupportedBits(bits).into());
    }

    debug!(bits, "generating RSA key");
    let mut rng = rand::rngs::OsRng;
    let key = RsaPrivateKey::new(&mut rng, bits)
        .map_err(|e| KeygenError::Generate(e.to_string()))?;

    let pem = key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| KeygenError::Encode(e.to_string()))?;

    let public = key.to_public_key();
    let jwks = Jwks {
        keys: vec![Jwk {
            key_use: "sig".to_string(),
            kty: "RSA".to_string(),
            n: encode_component(&public.n().to_bytes_be()),
            e: encode_component(&public.e().to_bytes_be()),
        }],
    };

    validate_jwks(&jwks)?;

    Ok(SecretKeyPair::new(pem, jwks))
}

/// URL-safe base64, no padding.
pub fn encode_component(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Check a public-key-set record.
///
/// # Errors
///
/// Returns `KeygenError::InvalidJwks` if the set is empty, a key is not RSA,
/// or `n`/`e` contain `+`, `/` or `=` or do not decode as URL-safe base64.
pub fn validate_jwks(jwks: &Jwks) -> Result<()> {
    if jwks.keys.is_empty() {
        return Err(KeygenError::InvalidJwks {
            field: "keys",
            reason: "no keys".to_string(),
        }
        .into());
    }

    for jwk in &jwks.keys {
        if jwk.kty != "RSA" {
            return Err(KeygenError::InvalidJwks {
                field: "kty",
                reason: format!("expected RSA, got {}", jwk.kty),
            }
            .into());
        }
        validate_component("n", &jwk.n)?;
        validate_component("e", &jwk.e)?;
    }

    Ok(())
}

fn validate_component(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(KeygenError::InvalidJwks {
            field,
            reason: "empty".to_string(),
        }
        .into());
    }

    if let Some(bad) = value.chars().find(|c| matches!(c, '+' | '/' | '=')) {
        return Err(KeygenError::InvalidJwks {
            field,
            reason: format!("contains '{}': standard base64 instead of URL-safe without padding", bad),
        }
        .into());
    }

    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| KeygenError::InvalidJwks {
            field,
            reason: e.to_string(),
        })?;

    Ok(())
}

/// RFC 7638 thumbprint, used to identify a key in output.
pub fn thumbprint(jwk: &Jwk) -> String {
    // Required members only, lexicographic order, no whitespace.
    let canonical = format!(r#"{{"e":"{}","kty":"{}","n":"{}"}}"#, jwk.e, jwk.kty, jwk.n);
    URL_SAFE_NO_PAD.encode(Sha256::digest(canonical.as_bytes()))
}

/// Generate and store a signing key unless one already exists.
///
/// Checks the private-key variable first; when present and `force` is not
/// set, verifies that the stored key set publishes the stored key's modulus
/// and returns [`Provision::AlreadyExists`] without writing. Otherwise
/// writes the private key (folded onto one line), then the key set. If the
/// key set write fails, the previous private key is written back.
///
/// # Errors
///
/// Returns `KeygenError::Mismatch` when the stored pair does not belong
/// together, `RemoteError` from the store, or `KeygenError` from generation.
pub fn provision(store: &dyn RemoteStore, keys: &KeysConfig, force: bool) -> Result<Provision> {
    let existing = store.get(&keys.private_key_var)?;

    if let (Some(private_key), false) = (existing.as_deref(), force) {
        match store.get(&keys.jwks_var)? {
            Some(jwks) => check_stored_pair(private_key, &jwks)?,
            None => warn!(
                jwks_var = %keys.jwks_var,
                "signing key exists but key set is missing; regenerate with --force"
            ),
        }
        info!(var = %keys.private_key_var, "signing key already present");
        return Ok(Provision::AlreadyExists);
    }

    if existing.is_some() {
        warn!(var = %keys.private_key_var, "overwriting existing signing key");
    }

    let pair = generate(keys.bits)?;

    store.set(&keys.private_key_var, pair.private_key_env_value().as_str())?;
    if let Err(err) = store.set(&keys.jwks_var, &pair.jwks().to_json()?) {
        restore_private_key(store, keys, existing.as_deref());
        return Err(err.into());
    }

    info!(
        private_key_var = %keys.private_key_var,
        jwks_var = %keys.jwks_var,
        "signing key stored"
    );
    Ok(Provision::Created(pair))
}

fn restore_private_key(store: &dyn RemoteStore, keys: &KeysConfig, previous: Option<&str>) {
    let Some(previous) = previous else {
        warn!(
            var = %keys.private_key_var,
            "key set write failed; new signing key has no published key set"
        );
        return;
    };

    match store.set(&keys.private_key_var, previous) {
        Ok(()) => warn!(var = %keys.private_key_var, "key set write failed; previous signing key restored"),
        Err(err) => error!(
            var = %keys.private_key_var,
            error = %err,
            "key set write failed and the previous signing key could not be restored"
        ),
    }
}

/// Confirm that `jwks` publishes the public half of `private_key`.
fn check_stored_pair(private_key: &str, jwks: &str) -> Result<()> {
    let key = decode_private_key(private_key)
        .ok_or_else(|| KeygenError::Mismatch("stored private key is not a readable RSA key".to_string()))?;
    let jwks: Jwks = serde_json::from_str(jwks)
        .map_err(|e| KeygenError::Mismatch(format!("stored key set is not valid JSON: {}", e)))?;

    let modulus = encode_component(&key.n().to_bytes_be());
    if jwks.keys.iter().any(|jwk| jwk.n == modulus) {
        debug!("stored signing key matches key set");
        Ok(())
    } else {
        Err(KeygenError::Mismatch("key set does not contain the stored key's modulus".to_string()).into())
    }
}

/// Parse a stored private key, folded onto one line or not.
fn decode_private_key(value: &str) -> Option<RsaPrivateKey> {
    let value = value.trim();
    let label = value.strip_prefix("-----BEGIN ")?.split("-----").next()?;
    let header = format!("-----BEGIN {}-----", label);
    let footer = format!("-----END {}-----", label);
    let body = value.strip_prefix(&header)?.trim_end().strip_suffix(&footer)?;

    let pem = Zeroizing::new(format!(
        "{}\n{}\n{}\n",
        header,
        body.split_whitespace().collect::<Vec<_>>().join("\n"),
        footer
    ));

    match label {
        "PRIVATE KEY" => RsaPrivateKey::from_pkcs8_pem(&pem).ok(),
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_pem(&pem).ok(),
        _ => None,
    }
}
