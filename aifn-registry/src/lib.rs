//! Registry of named functions for LLM function-calling.
//!
//! [`AiFunctions`] validates functions when they are registered, serves their
//! schemas, and dispatches model-issued calls through the execution engine.

#![warn(missing_docs, clippy::pedantic)]

mod call;
mod config;
mod registry;

pub use call::{CallOptions, FunctionCall};
pub use config::{RegistryConfig, RegistrySettings};
pub use registry::AiFunctions;
