//! Schema derivation for function-calling interfaces.
//!
//! A [`SchemaDescriptor`] is derived from a [`FunctionSpec`](aifn_primitives::FunctionSpec)
//! on demand. Derivation is all-or-nothing: one unusable parameter rejects the
//! whole function so a partial schema is never exposed.

#![warn(missing_docs, clippy::pedantic)]

mod deriver;
mod descriptor;
mod doc;

pub use deriver::{derive_schema, derive_schemas, validate};
pub use descriptor::{ParametersSchema, PropertySchema, SchemaDescriptor};
pub use doc::normalize_doc;
