//! Typed accessors over raw upstream JSON.
//!
//! Absent and `null` are treated the same everywhere. Numeric accessors
//! default to zero for both, and fail only when a value is present but
//! cannot be read as a number.

use serde_json::Value;

use super::keys::KeyPath;
use crate::error::NormalizeError;

/// Walks `path` from `value`, returning the target unless it is missing or null.
pub(crate) fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    (!current.is_null()).then_some(current)
}

/// Reads an identifier. Strings pass through, numbers are rendered as text.
pub(crate) fn identity(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the first usable identifier among `candidates`.
pub(crate) fn first_identity(value: &Value, candidates: &[KeyPath]) -> Option<String> {
    candidates
        .iter()
        .find_map(|path| lookup(value, path).and_then(identity))
}

pub(crate) fn id(value: &Value) -> Option<String> {
    lookup(value, &["id"]).and_then(identity)
}

pub(crate) fn text(value: &Value, key: &str) -> Option<String> {
    lookup(value, &[key])
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub(crate) fn boolean(value: &Value, key: &str) -> bool {
    lookup(value, &[key])
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

pub(crate) fn decimal(
    value: &Value,
    record: &'static str,
    field: &'static str,
) -> Result<f64, NormalizeError> {
    let invalid = |raw: &Value| NormalizeError::InvalidDecimal {
        record,
        field,
        value: raw.to_string(),
    };

    let Some(raw) = lookup(value, &[field]) else {
        return Ok(0.0);
    };
    match raw {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(raw)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| invalid(raw))
        }
        _ => Err(invalid(raw)),
    }
}

pub(crate) fn integer(
    value: &Value,
    record: &'static str,
    field: &'static str,
) -> Result<i64, NormalizeError> {
    let invalid = |raw: &Value| NormalizeError::InvalidInteger {
        record,
        field,
        value: raw.to_string(),
    };

    let Some(raw) = lookup(value, &[field]) else {
        return Ok(0);
    };
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .ok_or_else(|| invalid(raw)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
                .ok_or_else(|| invalid(raw))
        }
        _ => Err(invalid(raw)),
    }
}

// 45.0 is accepted as 45; 45.5 is not.
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
        .then_some(f as i64)
}
