//! Signature-to-schema derivation.

use aifn_primitives::{Annotation, Error, FunctionSpec, ParamKind, Result};
use tracing::trace;

use crate::descriptor::{ParametersSchema, PropertySchema, SchemaDescriptor};
use crate::doc::normalize_doc;

/// Receiver names skipped when they appear first in a signature.
const RECEIVER_NAMES: [&str; 2] = ["self", "cls"];

/// Derives schemas for every function, failing on the first invalid one.
///
/// # Errors
///
/// Returns [`Error::InvalidFunction`] naming the first function without a
/// usable documentation string or fully annotated parameters, and
/// [`Error::UnknownType`] for a parameter type with no schema mapping.
pub fn derive_schemas<'a, I>(specs: I) -> Result<Vec<SchemaDescriptor>>
where
    I: IntoIterator<Item = &'a FunctionSpec>,
{
    specs.into_iter().map(derive_schema).collect()
}

/// Checks that every function can be exposed, discarding the schemas.
///
/// # Errors
///
/// Same as [`derive_schemas`].
pub fn validate<'a, I>(specs: I) -> Result<()>
where
    I: IntoIterator<Item = &'a FunctionSpec>,
{
    specs.into_iter().try_for_each(|spec| derive_schema(spec).map(drop))
}

/// Derives the schema of a single function.
///
/// # Errors
///
/// Same as [`derive_schemas`].
pub fn derive_schema(spec: &FunctionSpec) -> Result<SchemaDescriptor> {
    let name = spec.name();
    if name.trim().is_empty() {
        return Err(Error::invalid_function(name, "function name cannot be empty"));
    }

    let properties = derive_properties(spec)?;
    let description = spec
        .doc()
        .and_then(normalize_doc)
        .ok_or_else(|| Error::invalid_function(name, "missing documentation string"))?;

    trace!(function = name, properties = properties.len(), "derived function schema");
    Ok(SchemaDescriptor::new(
        name,
        description,
        ParametersSchema::new(properties),
    ))
}

fn derive_properties(spec: &FunctionSpec) -> Result<Vec<(String, PropertySchema)>> {
    let function = spec.name();
    let mut properties = Vec::with_capacity(spec.parameters().len());

    for (index, param) in spec.parameters().iter().enumerate() {
        if index == 0 && RECEIVER_NAMES.contains(&param.name()) {
            continue;
        }

        match param.kind() {
            ParamKind::Regular => {}
            ParamKind::PositionalOnly => {
                return Err(Error::invalid_function(
                    function,
                    format!("parameter `{}` is positional-only", param.name()),
                ));
            }
            ParamKind::Variadic => {
                return Err(Error::invalid_function(
                    function,
                    format!("parameter `{}` is variadic", param.name()),
                ));
            }
        }

        let (base, description) = match param.annotation() {
            None => {
                return Err(Error::invalid_function(
                    function,
                    format!("parameter `{}` has no type annotation", param.name()),
                ));
            }
            Some(Annotation::Bare(_)) => {
                return Err(Error::invalid_function(
                    function,
                    format!("parameter `{}` is missing a description", param.name()),
                ));
            }
            Some(Annotation::Described { base, description }) => (base, description),
        };

        let schema_type = base.schema_type().ok_or_else(|| Error::UnknownType {
            function: function.to_owned(),
            parameter: param.name().to_owned(),
            type_name: base.to_string(),
        })?;

        let Some(description) = description else {
            continue;
        };

        properties.push((
            param.name().to_owned(),
            PropertySchema::new(schema_type, description.clone()),
        ));
    }

    Ok(properties)
}

#[cfg(test)]
mod tests {
    use aifn_primitives::{BaseType, Parameter};
    use serde_json::json;

    use super::*;

    fn example_func1() -> FunctionSpec {
        FunctionSpec::new("example_func1")
            .with_doc("Adds 1 to x.")
            .arg("x", BaseType::Integer, "x val")
    }

    fn example_func2() -> FunctionSpec {
        FunctionSpec::new("example_func2")
            .with_doc("Adds x and int(y).")
            .arg("x", BaseType::Integer, "x val")
            .arg("y", BaseType::String, "y val")
    }

    #[test]
    fn derives_object_schema() {
        let schemas = derive_schemas([&example_func1(), &example_func2()]).unwrap();
        let value = serde_json::to_value(&schemas).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "name": "example_func1",
                    "description": "Adds 1 to x.",
                    "parameters": {
                        "type": "object",
                        "properties": {"x": {"type": "number", "description": "x val"}}
                    }
                },
                {
                    "name": "example_func2",
                    "description": "Adds x and int(y).",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "x": {"type": "number", "description": "x val"},
                            "y": {"type": "string", "description": "y val"}
                        }
                    }
                }
            ])
        );
    }

    #[test]
    fn properties_keep_declaration_order() {
        let spec = FunctionSpec::new("ordered")
            .with_doc("Ordered params.")
            .arg("zeta", BaseType::Boolean, "z")
            .arg("alpha", BaseType::Array, "a")
            .arg("mid", BaseType::Float, "m");

        let schema = derive_schema(&spec).unwrap();
        let names: Vec<_> = schema.parameters().names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);

        let text = serde_json::to_string(&schema).unwrap();
        let zeta = text.find("zeta").unwrap();
        let alpha = text.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn leading_receiver_is_skipped() {
        let spec = FunctionSpec::new("method")
            .with_doc("A method.")
            .with_param(Parameter::untyped("self"))
            .arg("x", BaseType::Integer, "x val");

        let schema = derive_schema(&spec).unwrap();
        assert_eq!(schema.parameters().len(), 1);
        assert_eq!(
            schema.parameters().property("x").unwrap().schema_type(),
            "number"
        );
    }

    #[test]
    fn receiver_name_elsewhere_is_rejected() {
        let spec = FunctionSpec::new("odd")
            .with_doc("Odd.")
            .arg("x", BaseType::Integer, "x val")
            .with_param(Parameter::untyped("self"));

        let err = derive_schema(&spec).unwrap_err();
        assert!(matches!(err, Error::InvalidFunction { name, .. } if name == "odd"));
    }

    #[test]
    fn hidden_parameters_are_omitted() {
        let spec = FunctionSpec::new("with_ctx")
            .with_doc("Uses context.")
            .arg("x", BaseType::Integer, "x val")
            .with_param(Parameter::hidden("ctx", BaseType::String));

        let schema = derive_schema(&spec).unwrap();
        assert!(schema.parameters().property("ctx").is_none());
        assert_eq!(schema.parameters().len(), 1);
    }

    #[test]
    fn one_bad_parameter_rejects_function() {
        let spec = FunctionSpec::new("bad_func")
            .with_doc("Adds one.")
            .arg("ok", BaseType::Integer, "fine")
            .with_param(Parameter::annotated("x", Annotation::Bare(BaseType::Integer)));

        let err = derive_schemas([&example_func1(), &spec]).unwrap_err();
        assert!(matches!(err, Error::InvalidFunction { name, .. } if name == "bad_func"));
    }

    #[test]
    fn untyped_and_special_kinds_are_rejected() {
        let untyped = FunctionSpec::new("f")
            .with_doc("Doc.")
            .with_param(Parameter::untyped("x"));
        assert!(matches!(derive_schema(&untyped), Err(Error::InvalidFunction { .. })));

        let positional = FunctionSpec::new("f")
            .with_doc("Doc.")
            .with_param(
                Parameter::new("x", BaseType::Integer, "x").with_kind(ParamKind::PositionalOnly),
            );
        assert!(matches!(derive_schema(&positional), Err(Error::InvalidFunction { .. })));

        let variadic = FunctionSpec::new("f")
            .with_doc("Doc.")
            .with_param(Parameter::new("xs", BaseType::Array, "xs").with_kind(ParamKind::Variadic));
        assert!(matches!(derive_schema(&variadic), Err(Error::InvalidFunction { .. })));

        let any = FunctionSpec::new("f")
            .with_doc("Doc.")
            .with_param(Parameter::annotated("x", Annotation::Bare(BaseType::Any)));
        assert!(matches!(derive_schema(&any), Err(Error::InvalidFunction { .. })));
    }

    #[test]
    fn described_any_has_no_schema_type() {
        let spec = FunctionSpec::new("f")
            .with_doc("Doc.")
            .arg("x", BaseType::Any, "anything");

        let err = derive_schema(&spec).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownType { ref parameter, ref type_name, .. }
                if parameter == "x" && type_name == "any"
        ));
    }

    #[test]
    fn missing_documentation_is_rejected() {
        let spec = FunctionSpec::new("undocumented").arg("x", BaseType::Integer, "x val");
        assert!(matches!(derive_schema(&spec), Err(Error::InvalidFunction { .. })));

        let blank = spec.clone().with_doc("  \n ");
        assert!(matches!(derive_schema(&blank), Err(Error::InvalidFunction { .. })));
    }

    #[test]
    fn unknown_types_are_reported_even_when_hidden() {
        let spec = FunctionSpec::new("f")
            .with_doc("Doc.")
            .with_param(Parameter::hidden("opts", BaseType::Other("dict".into())));

        let err = derive_schema(&spec).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownType { parameter, type_name, .. }
                if parameter == "opts" && type_name == "dict"
        ));
    }

    #[test]
    fn validate_accepts_empty_set() {
        assert!(validate(std::iter::empty()).is_ok());
    }
}
