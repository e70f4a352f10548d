//! Input validation for envsync operations.
//!
//! Validates variable names given on the command line or in `.envsync.toml`.

use crate::error::{Result, ValidationError};

/// Longest variable name the remote store accepts.
pub const MAX_KEY_LEN: usize = 40;

/// Validate an environment variable name.
///
/// Names must:
/// - Start with an ASCII letter
/// - Contain only ASCII letters, digits and underscore
/// - Be at most 40 characters long
///
/// # Errors
///
/// Returns `ValidationError` if the key is invalid.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    if key.len() > MAX_KEY_LEN {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: format!("longer than {} characters", MAX_KEY_LEN),
        }
        .into());
    }

    if let Some(first) = key.chars().next() {
        if !first.is_ascii_alphabetic() {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: "must start with a letter".to_string(),
            }
            .into());
        }
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a value given through the one-shot `set` path.
///
/// # Errors
///
/// Returns `ValidationError::EmptyValue` if the value is empty.
pub fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue(key.to_string()).into());
    }

    Ok(())
}
