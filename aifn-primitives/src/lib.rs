//! Core shared types for exposing functions to LLM function-calling.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod signature;
mod value;

/// Error type and result alias shared across the workspace.
pub use error::{BoxError, Error, Result};
/// Declarative signature metadata attached to registered functions.
pub use signature::{Annotation, BaseType, FunctionSpec, ParamKind, Parameter};
/// Argument payloads and return values flowing through dispatch.
pub use value::{Arguments, CallArguments, FunctionResult, OpaqueValue, ReturnValue, value_kind};
