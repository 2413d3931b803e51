//! Best-effort conversion of decoded arguments to their declared types.

use aifn_primitives::{BaseType, value_kind};
use serde_json::{Number, Value};
use thiserror::Error;

/// Reason an argument could not be converted.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct CoercionError {
    reason: String,
}

impl CoercionError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unsupported(value: &Value, expected: &BaseType) -> Self {
        Self::new(format!("cannot convert {} to {expected}", value_kind(value)))
    }
}

/// Converts `value` to the declared type.
///
/// Returns `Ok(None)` when the value already has the declared type, or when
/// the type carries no conversion rule.
///
/// # Errors
///
/// Returns [`CoercionError`] when no conversion applies or parsing fails.
pub fn coerce_value(value: &Value, expected: &BaseType) -> Result<Option<Value>, CoercionError> {
    match expected {
        BaseType::String => Ok(to_string(value)),
        BaseType::Integer => to_integer(value),
        BaseType::Float => to_float(value),
        BaseType::Boolean => to_boolean(value),
        BaseType::Array => to_array(value),
        BaseType::Any | BaseType::Other(_) => Ok(None),
    }
}

fn to_string(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => None,
        other => Some(Value::String(other.to_string())),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_integer(value: &Value) -> Result<Option<Value>, CoercionError> {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => Ok(None),
        Value::Number(number) => {
            let float = number.as_f64().unwrap_or(f64::NAN);
            let truncated = float.trunc();
            let in_range = truncated >= i64::MIN as f64 && truncated < i64::MAX as f64;
            if truncated.is_finite() && in_range {
                Ok(Some(Value::from(truncated as i64)))
            } else {
                Err(CoercionError::new(format!("{float} is out of integer range")))
            }
        }
        Value::Bool(flag) => Ok(Some(Value::from(i64::from(*flag)))),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(parsed) = trimmed.parse::<i64>() {
                return Ok(Some(Value::from(parsed)));
            }
            trimmed
                .parse::<u64>()
                .map(|parsed| Some(Value::from(parsed)))
                .map_err(|err| {
                    CoercionError::new(format!("invalid integer literal {text:?}: {err}"))
                })
        }
        other => Err(CoercionError::unsupported(other, &BaseType::Integer)),
    }
}

fn to_float(value: &Value) -> Result<Option<Value>, CoercionError> {
    let parsed = match value {
        Value::Number(number) if number.is_f64() => return Ok(None),
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => Some(text.trim().parse::<f64>().map_err(|err| {
            CoercionError::new(format!("invalid float literal {text:?}: {err}"))
        })?),
        other => return Err(CoercionError::unsupported(other, &BaseType::Float)),
    };

    parsed
        .and_then(Number::from_f64)
        .map(|number| Some(Value::Number(number)))
        .ok_or_else(|| CoercionError::new("value is not a finite number"))
}

fn to_boolean(value: &Value) -> Result<Option<Value>, CoercionError> {
    match value {
        Value::Bool(_) => Ok(None),
        Value::Number(number) => {
            let truthy = number.as_f64().is_some_and(|n| n != 0.0);
            Ok(Some(Value::Bool(truthy)))
        }
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(Value::Bool(true))),
            "false" | "0" => Ok(Some(Value::Bool(false))),
            _ => Err(CoercionError::new(format!("invalid boolean literal {text:?}"))),
        },
        other => Err(CoercionError::unsupported(other, &BaseType::Boolean)),
    }
}

fn to_array(value: &Value) -> Result<Option<Value>, CoercionError> {
    match value {
        Value::Array(_) => Ok(None),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ Value::Array(_)) => Ok(Some(parsed)),
            Ok(other) => Err(CoercionError::new(format!(
                "expected a JSON array, found {}",
                value_kind(&other)
            ))),
            Err(err) => Err(CoercionError::new(format!("invalid array literal: {err}"))),
        },
        other => Err(CoercionError::unsupported(other, &BaseType::Array)),
    }
}
