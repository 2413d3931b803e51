//! Expose functions to LLM function-calling.
//!
//! Depend on this crate via `cargo add ai-functions`. It bundles the
//! workspace crates behind feature flags: register functions with explicit
//! parameter metadata, hand their schemas to a model, and dispatch the calls
//! the model sends back.
//!
//! ```ignore
//! use ai_functions::prelude::*;
//!
//! let add_one = FunctionDescriptor::sync_fn(
//!     FunctionSpec::new("add_one")
//!         .with_doc("Adds 1 to x.")
//!         .arg("x", BaseType::Integer, "x val"),
//!     |args| Ok(ReturnValue::from(args.required::<i64>("x")? + 1)),
//! );
//! let functions = AiFunctions::new([add_one])?;
//! let output = functions.execute("add_one", r#"{"x": 5}"#)?;
//! assert_eq!(output.as_text(), Some("6"));
//! ```

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use aifn_primitives as primitives;

/// Schema derivation (enabled by `schema` feature).
#[cfg(feature = "schema")]
pub use aifn_schema as schema;

/// Dispatch, coercion, and scheduler bridging (enabled by `engine` feature).
#[cfg(feature = "engine")]
pub use aifn_engine as engine;

/// Function registry (enabled by `registry` feature).
#[cfg(feature = "registry")]
pub use aifn_registry as registry;

/// Tracing subscriber setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use aifn_telemetry as telemetry;

/// Items most applications need.
pub mod prelude {
    pub use aifn_primitives::{
        Annotation, Arguments, BaseType, CallArguments, Error, FunctionResult, FunctionSpec,
        ParamKind, Parameter, Result, ReturnValue,
    };

    #[cfg(feature = "schema")]
    pub use aifn_schema::SchemaDescriptor;

    #[cfg(feature = "engine")]
    pub use aifn_engine::{CallOutput, EventLoop, FunctionDescriptor, SchedulerHandle};

    #[cfg(feature = "registry")]
    pub use aifn_registry::{AiFunctions, CallOptions, FunctionCall, RegistryConfig};
}
