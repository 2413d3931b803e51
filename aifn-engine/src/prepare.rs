//! Name resolution, argument decoding, and coercion ahead of invocation.

use aifn_primitives::{Arguments, CallArguments, Error, Result, value_kind};
use serde_json::Value;
use tracing::debug;

use crate::coerce::coerce_value;
use crate::function::{FunctionDescriptor, FunctionLookup};

/// A resolved function with arguments ready to pass in.
#[derive(Debug)]
pub struct PreparedCall<'a> {
    function: &'a FunctionDescriptor,
    arguments: Arguments,
}

impl<'a> PreparedCall<'a> {
    /// Merges engine-supplied values over the decoded arguments.
    #[must_use]
    pub fn with_extra(mut self, extra: Arguments) -> Self {
        self.arguments.merge(extra);
        self
    }

    /// Resolved function.
    #[must_use]
    pub fn function(&self) -> &'a FunctionDescriptor {
        self.function
    }

    /// Prepared arguments.
    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Splits into the function and its arguments.
    #[must_use]
    pub fn into_parts(self) -> (&'a FunctionDescriptor, Arguments) {
        (self.function, self.arguments)
    }
}

/// Resolves `name`, decodes `arguments`, and optionally coerces them to the
/// declared parameter types.
///
/// # Errors
///
/// - [`Error::UnknownFunction`] when `name` is not in `functions`.
/// - [`Error::ArgumentDecode`] when the payload is not a JSON object.
/// - [`Error::ArgumentType`] when a value cannot be coerced.
pub fn prepare_call<'a, L>(
    functions: &'a L,
    name: &str,
    arguments: CallArguments,
    auto_coerce: bool,
) -> Result<PreparedCall<'a>>
where
    L: FunctionLookup + ?Sized,
{
    let function = functions
        .lookup(name)
        .ok_or_else(|| Error::UnknownFunction {
            name: name.to_owned(),
        })?;

    let mut arguments = decode_arguments(name, arguments)?;
    if auto_coerce {
        coerce_arguments(function, &mut arguments)?;
    }

    Ok(PreparedCall {
        function,
        arguments,
    })
}

fn decode_arguments(name: &str, arguments: CallArguments) -> Result<Arguments> {
    match arguments {
        CallArguments::Map(map) => Ok(Arguments::from(map)),
        CallArguments::Json(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(Arguments::from(map)),
            Ok(other) => Err(Error::ArgumentDecode {
                name: name.to_owned(),
                reason: format!("expected a JSON object, found {}", value_kind(&other)),
            }),
            Err(err) => Err(Error::ArgumentDecode {
                name: name.to_owned(),
                reason: format!("invalid JSON: {err}"),
            }),
        },
    }
}

fn coerce_arguments(function: &FunctionDescriptor, arguments: &mut Arguments) -> Result<()> {
    for param in function.spec().parameters() {
        let Some(annotation) = param.annotation() else {
            continue;
        };
        let Some(value) = arguments.get(param.name()) else {
            continue;
        };

        let coerced = coerce_value(value, annotation.base()).map_err(|err| Error::ArgumentType {
            function: function.name().to_owned(),
            parameter: param.name().to_owned(),
            expected: annotation.base().to_string(),
            reason: err.to_string(),
        })?;

        if let Some(coerced) = coerced {
            debug!(
                function = function.name(),
                parameter = param.name(),
                expected = %annotation.base(),
                "coerced argument to declared type"
            );
            arguments.insert(param.name(), coerced);
        }
    }
    Ok(())
}
