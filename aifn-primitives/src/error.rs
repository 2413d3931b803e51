//! Shared error definitions for schema derivation and dispatch.

use thiserror::Error;

/// Boxed error returned by registered function bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while deriving schemas or dispatching function calls.
#[derive(Debug, Error)]
pub enum Error {
    /// Function documentation or parameters cannot be exposed as a schema.
    #[error("invalid function `{name}`: {reason}")]
    InvalidFunction {
        /// Name of the rejected function.
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A declared parameter type has no schema mapping.
    #[error("parameter `{parameter}` of `{function}` has unsupported type `{type_name}`")]
    UnknownType {
        /// Function declaring the parameter.
        function: String,
        /// Offending parameter.
        parameter: String,
        /// Name of the unsupported type.
        type_name: String,
    },

    /// Dispatch referenced a function that is not registered.
    #[error("unknown function `{name}`")]
    UnknownFunction {
        /// Name that failed to resolve.
        name: String,
    },

    /// Argument payload could not be decoded into a JSON object.
    #[error("could not load arguments for function `{name}`: {reason}")]
    ArgumentDecode {
        /// Function being dispatched.
        name: String,
        /// Decoder failure description.
        reason: String,
    },

    /// An argument could not be converted to its declared type.
    #[error("cannot convert argument `{parameter}` of `{function}` to {expected}: {reason}")]
    ArgumentType {
        /// Function being dispatched.
        function: String,
        /// Offending parameter.
        parameter: String,
        /// Declared type of the parameter.
        expected: String,
        /// Conversion failure description.
        reason: String,
    },

    /// An asynchronous function was executed synchronously without a scheduler.
    #[error("function `{name}` cannot be run without a scheduler for asynchronous functions")]
    MissingScheduler {
        /// Function being dispatched.
        name: String,
    },

    /// The invoked function body returned an error.
    #[error("function `{name}` failed: {source}")]
    Function {
        /// Function that failed.
        name: String,
        /// Error produced by the function body.
        #[source]
        source: BoxError,
    },

    /// Bridging onto the scheduler failed before a result was produced.
    #[error("scheduler error: {reason}")]
    Scheduler {
        /// Human-readable reason for the failure.
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidFunction`] for the supplied function name.
    #[must_use]
    pub fn invalid_function(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFunction {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Scheduler`] from the supplied reason.
    #[must_use]
    pub fn scheduler(reason: impl Into<String>) -> Self {
        Self::Scheduler {
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by the caller's payload rather than
    /// by registration or the runtime.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownFunction { .. } | Self::ArgumentDecode { .. } | Self::ArgumentType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_are_classified() {
        let decode = Error::ArgumentDecode {
            name: "f".into(),
            reason: "eof".into(),
        };
        assert!(decode.is_argument_error());

        let missing = Error::MissingScheduler { name: "f".into() };
        assert!(!missing.is_argument_error());
    }

    #[test]
    fn function_error_keeps_source() {
        let err = Error::Function {
            name: "f".into(),
            source: "boom".into(),
        };
        assert_eq!(err.to_string(), "function `f` failed: boom");
        assert!(std::error::Error::source(&err).is_some());
    }
}
