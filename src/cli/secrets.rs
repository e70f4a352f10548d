//! Single-value commands: set, get, list.
//!
//! `set` is the one-shot path for values the bulk file format cannot carry,
//! such as multi-line PEM material read from stdin.

use std::io::Read;
use tracing::info;

use crate::cli::output;
use crate::cli::Globals;
use crate::cli::Context;
use crate::core::validation;
use crate::error::{Error, Result};

/// Set one value.
pub fn set(globals: &Globals, key: &str, value: Option<String>, stdin: bool) -> Result<()> {
    validation::validate_key(key)?;

    let value = match (value, stdin) {
        (_, true) => read_stdin()?,
        (Some(value), false) => value,
        (None, false) => String::new(),
    };
    validation::validate_value(key, &value)?;

    let ctx = Context::load(globals)?;
    let store = ctx.open_store()?;

    info!(key, len = value.len(), backend = store.name(), "setting value");
    store.set(key, &value)?;

    output::success(&format!("set {}", output::key(key)));
    Ok(())
}

/// Print one value, undecorated.
pub fn get(globals: &Globals, key: &str) -> Result<()> {
    validation::validate_key(key)?;

    let ctx = Context::load(globals)?;
    let store = ctx.open_store()?;

    match store.get(key)? {
        Some(value) => {
            output::data(&value);
            Ok(())
        }
        None => Err(Error::Other(format!("{} is not set", key))),
    }
}

/// List variable names.
pub fn list(globals: &Globals, json: bool) -> Result<()> {
    let ctx = Context::load(globals)?;
    let store = ctx.open_store()?;

    let mut keys = store.list()?;
    keys.sort();

    if json {
        let result = serde_json::json!({
            "keys": keys,
            "count": keys.len()
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if keys.is_empty() {
        output::dimmed("no variables set");
    } else {
        output::section(&format!("{} variables", keys.len()));
        for key in &keys {
            output::list_item(key);
        }
    }

    Ok(())
}

/// Whole of stdin, minus one trailing newline.
fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;

    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}
