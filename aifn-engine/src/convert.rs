//! Conversion of return values into the string sent back to the model.

use std::sync::Arc;

use aifn_primitives::ReturnValue;
use serde_json::Value;

/// Converts a return value into its wire string.
pub type OutputConverter = Arc<dyn Fn(ReturnValue) -> String + Send + Sync>;

/// Default conversion: strings pass through, other JSON values are encoded,
/// and opaque values fall back to their `Display` rendering.
#[must_use]
pub fn convert_response(value: ReturnValue) -> String {
    match value {
        ReturnValue::Json(Value::String(text)) => text,
        ReturnValue::Json(other) => other.to_string(),
        ReturnValue::Opaque(opaque) => opaque.to_string(),
    }
}

/// Returns [`convert_response`] as a shareable converter.
#[must_use]
pub fn default_converter() -> OutputConverter {
    Arc::new(convert_response)
}

/// Result of a dispatch.
#[derive(Debug)]
pub enum CallOutput {
    /// Converted wire string.
    Text(String),
    /// Unconverted return value.
    Raw(ReturnValue),
}

impl CallOutput {
    pub(crate) fn finish(value: ReturnValue, converter: Option<&OutputConverter>) -> Self {
        match converter {
            Some(convert) => Self::Text(convert(value)),
            None => Self::Raw(value),
        }
    }

    /// Returns the converted text, if conversion was applied.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Raw(_) => None,
        }
    }

    /// Consumes the output and returns the converted text, if any.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw value, if conversion was disabled.
    #[must_use]
    pub fn as_raw(&self) -> Option<&ReturnValue> {
        match self {
            Self::Text(_) => None,
            Self::Raw(value) => Some(value),
        }
    }

    /// Consumes the output and returns the raw value, if any.
    #[must_use]
    pub fn into_raw(self) -> Option<ReturnValue> {
        match self {
            Self::Text(_) => None,
            Self::Raw(value) => Some(value),
        }
    }
}
