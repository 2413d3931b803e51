//! Argument payloads and return values.

use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::BoxError;

/// Result returned by a registered function body.
pub type FunctionResult = std::result::Result<ReturnValue, BoxError>;

/// Returns the JSON kind name of a value.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decoded keyword arguments handed to a function body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no arguments are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over name/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Merges `other` into `self`; keys in `other` win.
    pub fn merge(&mut self, other: Arguments) {
        self.0.extend(other.0);
    }

    /// Deserializes a required argument.
    ///
    /// # Errors
    ///
    /// Returns an error when the argument is missing or has the wrong shape.
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> std::result::Result<T, BoxError> {
        let value = self
            .0
            .get(key)
            .ok_or_else(|| format!("missing required argument '{key}'"))?;
        serde_json::from_value(value.clone())
            .map_err(|err| format!("invalid argument '{key}': {err}").into())
    }

    /// Deserializes an optional argument; `null` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the argument is present but has the wrong shape.
    pub fn optional<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> std::result::Result<Option<T>, BoxError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| format!("invalid argument '{key}': {err}").into()),
        }
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl From<Arguments> for Value {
    fn from(value: Arguments) -> Self {
        Value::Object(value.0)
    }
}

/// Raw argument payload as received from a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallArguments {
    /// JSON-encoded object text.
    Json(String),
    /// Already decoded object.
    Map(Map<String, Value>),
}

impl Default for CallArguments {
    fn default() -> Self {
        Self::Map(Map::new())
    }
}

impl From<&str> for CallArguments {
    fn from(value: &str) -> Self {
        Self::Json(value.to_owned())
    }
}

impl From<String> for CallArguments {
    fn from(value: String) -> Self {
        Self::Json(value)
    }
}

impl From<Map<String, Value>> for CallArguments {
    fn from(value: Map<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl From<Arguments> for CallArguments {
    fn from(value: Arguments) -> Self {
        Self::Map(value.0)
    }
}

impl From<Value> for CallArguments {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Json(text),
            Value::Object(map) => Self::Map(map),
            other => Self::Json(other.to_string()),
        }
    }
}

/// A return value that is not representable as JSON.
pub trait OpaqueValue: Any + fmt::Debug + fmt::Display + Send + Sync {
    /// Upcasts to [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T> OpaqueValue for T
where
    T: Any + fmt::Debug + fmt::Display + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Value produced by a function body.
#[derive(Debug)]
pub enum ReturnValue {
    /// JSON-representable value.
    Json(Value),
    /// Value with no JSON form; rendered through `Display` when converted.
    Opaque(Box<dyn OpaqueValue>),
}

impl ReturnValue {
    /// Wraps a JSON-convertible value.
    #[must_use]
    pub fn json(value: impl Into<Value>) -> Self {
        Self::Json(value.into())
    }

    /// Wraps a value that has no JSON form.
    #[must_use]
    pub fn opaque<T: OpaqueValue>(value: T) -> Self {
        Self::Opaque(Box::new(value))
    }

    /// Serializes `value` to JSON, keeping it opaque when serialization fails.
    #[must_use]
    pub fn serialize<T>(value: T) -> Self
    where
        T: Serialize + OpaqueValue,
    {
        match serde_json::to_value(&value) {
            Ok(json) => Self::Json(json),
            Err(_) => Self::opaque(value),
        }
    }

    /// Returns the JSON value, if any.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Opaque(_) => None,
        }
    }

    /// Consumes the value and returns the JSON form, if any.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Opaque(_) => None,
        }
    }

    /// Downcasts an opaque value.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Json(_) => None,
            Self::Opaque(value) => (**value).as_any().downcast_ref::<T>(),
        }
    }
}

impl From<Value> for ReturnValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for ReturnValue {
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

impl From<&str> for ReturnValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i64> for ReturnValue {
    fn from(value: i64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<f64> for ReturnValue {
    fn from(value: f64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<bool> for ReturnValue {
    fn from(value: bool) -> Self {
        Self::Json(Value::Bool(value))
    }
}

impl From<()> for ReturnValue {
    fn from((): ()) -> Self {
        Self::Json(Value::Null)
    }
}
