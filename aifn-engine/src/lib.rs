//! Execution engine for registered functions.
//!
//! The engine resolves a function by name, decodes and coerces its arguments,
//! invokes it under the right calling convention, and converts the result into
//! the string handed back to the model. Asynchronous functions invoked from
//! synchronous code are bridged onto an [`EventLoop`] owned by another thread.

#![warn(missing_docs, clippy::pedantic)]

mod coerce;
mod convert;
mod execute;
mod function;
mod prepare;
mod scheduler;

pub use coerce::{CoercionError, coerce_value};
pub use convert::{CallOutput, OutputConverter, convert_response, default_converter};
pub use execute::{ExecuteOptions, execute, execute_async};
pub use function::{AsyncFunction, Callable, FunctionDescriptor, FunctionLookup, SyncFunction};
pub use prepare::{PreparedCall, prepare_call};
pub use scheduler::{EventLoop, SchedulerHandle};
