//! Model-issued call objects and per-call overrides.

use aifn_engine::SchedulerHandle;
use aifn_primitives::{Arguments, CallArguments};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A function call as emitted by a model: a name plus JSON-encoded or
/// pre-decoded arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function to invoke.
    pub name: String,
    /// Arguments payload.
    #[serde(default)]
    pub arguments: CallArguments,
}

impl FunctionCall {
    /// Creates a call object.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: impl Into<CallArguments>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parses a call object from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the text is not a call object.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Overrides applied to a single dispatch.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    pub(crate) scheduler: Option<SchedulerHandle>,
    pub(crate) extra: Arguments,
}

impl CallOptions {
    /// Creates empty overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `scheduler` instead of the registry's configured one.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: SchedulerHandle) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Supplies an extra keyword value merged over the model's arguments.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_string_arguments() {
        let call = FunctionCall::from_json(r#"{"name": "f", "arguments": "{\"x\": 5}"}"#).unwrap();
        assert_eq!(call, FunctionCall::new("f", r#"{"x": 5}"#));
    }

    #[test]
    fn parses_object_arguments() {
        let text = r#"{"name": "f", "arguments": {"x": 2, "y": "4"}}"#;
        let call = FunctionCall::from_json(text).unwrap();
        assert_eq!(
            call.arguments,
            CallArguments::from(json!({"x": 2, "y": "4"}))
        );
    }

    #[test]
    fn missing_arguments_default_to_empty_object() {
        let call = FunctionCall::from_json(r#"{"name": "f"}"#).unwrap();
        assert_eq!(call.arguments, CallArguments::default());
    }
}
