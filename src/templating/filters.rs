//! Custom filters for configuration templates.
//!
//! # Filters
//!
//! - `readfile`: replace a path with the contents of that file
//!   (`{{ tls.cert.path | readfile }}`)
//! - `boolean`: interpret `true`, `yes`, `on` and `1` (any case) as true
//!   (`{% if feature.enabled | boolean %}`)
//! - `b64encode` / `b64decode`: standard padded base64 of a UTF-8 string
//!
//! Every filter hands an undefined input back unchanged, so an optional
//! variable can be filtered without guarding it first:
//! `{{ secret.value | b64encode }}` renders empty when `SECRET_VALUE` is unset.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use minijinja::value::{Value, ValueKind};
use minijinja::{Environment, Error, ErrorKind};
use std::path::Path;

/// Strings that the `boolean` filter treats as true (compared lowercase).
const TRUTHY_VALUES: &[&str] = &["true", "yes", "on", "1"];

/// Registers every custom filter on an environment.
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("readfile", readfile_filter);
    env.add_filter("boolean", boolean_filter);
    env.add_filter("b64encode", b64encode_filter);
    env.add_filter("b64decode", b64decode_filter);
}

fn string_input<'a>(value: &'a Value, filter: &str) -> Result<&'a str, Error> {
    value.as_str().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("{filter} filter requires a string, got {}", value.kind()),
        )
    })
}

/// Reads the file at the given path, relative to the working directory.
pub fn readfile_filter(value: Value) -> Result<Value, Error> {
    if value.is_undefined() {
        return Ok(value);
    }
    let path = string_input(&value, "readfile")?;

    tracing::debug!("Reading file '{}' for template", path);
    let content = std::fs::read_to_string(Path::new(path)).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, format!("readfile filter failed to read '{path}'"))
            .with_source(e)
    })?;

    Ok(Value::from(content))
}

/// Interprets a value as a boolean flag.
pub fn boolean_filter(value: Value) -> Result<Value, Error> {
    if value.is_undefined() {
        return Ok(value);
    }

    let truthy = match value.kind() {
        ValueKind::String => value.as_str().is_some_and(is_truthy),
        ValueKind::Bool => value.is_true(),
        ValueKind::None => false,
        _ => is_truthy(&value.to_string()),
    };

    Ok(Value::from(truthy))
}

/// Whether a string spells a true flag.
pub fn is_truthy(value: &str) -> bool {
    let lowered = value.to_lowercase();
    TRUTHY_VALUES.contains(&lowered.as_str())
}

/// Base64-encodes a string.
pub fn b64encode_filter(value: Value) -> Result<Value, Error> {
    if value.is_undefined() {
        return Ok(value);
    }
    let input = string_input(&value, "b64encode")?;

    Ok(Value::from(STANDARD.encode(input.as_bytes())))
}

/// Decodes a base64 string into UTF-8 text.
pub fn b64decode_filter(value: Value) -> Result<Value, Error> {
    if value.is_undefined() {
        return Ok(value);
    }
    let input = string_input(&value, "b64decode")?;

    let bytes = STANDARD.decode(input.as_bytes()).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "b64decode filter received invalid base64")
            .with_source(e)
    })?;
    let decoded = String::from_utf8(bytes).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "b64decode filter produced invalid UTF-8")
            .with_source(e)
    })?;

    Ok(Value::from(decoded))
}
