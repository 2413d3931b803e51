//! Declarative signature metadata for registered functions.

use std::fmt::{self, Display, Formatter};

/// Base type declared for a parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// Text value.
    String,
    /// Whole number.
    Integer,
    /// Floating point number.
    Float,
    /// `true` or `false`.
    Boolean,
    /// Ordered list of values.
    Array,
    /// Explicitly untyped; treated the same as a missing annotation.
    Any,
    /// A type with no schema mapping, carried by name.
    Other(String),
}

impl BaseType {
    /// Returns the JSON schema type name, if the type has one.
    #[must_use]
    pub fn schema_type(&self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Integer | Self::Float => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Array => Some("array"),
            Self::Any | Self::Other(_) => None,
        }
    }

    /// Returns the type name used in diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Any => "any",
            Self::Other(name) => name,
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type annotation attached to a parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Annotation {
    /// A bare type with no attached description.
    Bare(BaseType),
    /// A type carrying a description. A `None` description keeps the
    /// parameter typed but hides it from derived schemas.
    Described {
        /// Declared base type.
        base: BaseType,
        /// Description exposed to the model.
        description: Option<String>,
    },
}

impl Annotation {
    /// Returns the declared base type.
    #[must_use]
    pub fn base(&self) -> &BaseType {
        match self {
            Self::Bare(base) | Self::Described { base, .. } => base,
        }
    }

    /// Returns the attached description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Described { description, .. } => description.as_deref(),
        }
    }
}

/// How a parameter may be supplied by callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Supplied by name.
    #[default]
    Regular,
    /// Can only be supplied positionally.
    PositionalOnly,
    /// Collects a variable number of values.
    Variadic,
}

/// A single declared parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    kind: ParamKind,
    annotation: Option<Annotation>,
}

impl Parameter {
    /// Creates a parameter with a type and a description.
    #[must_use]
    pub fn new(name: impl Into<String>, base: BaseType, description: impl Into<String>) -> Self {
        Self::annotated(
            name,
            Annotation::Described {
                base,
                description: Some(description.into()),
            },
        )
    }

    /// Creates a typed parameter that is hidden from derived schemas.
    #[must_use]
    pub fn hidden(name: impl Into<String>, base: BaseType) -> Self {
        Self::annotated(
            name,
            Annotation::Described {
                base,
                description: None,
            },
        )
    }

    /// Creates a parameter with an arbitrary annotation.
    #[must_use]
    pub fn annotated(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Regular,
            annotation: Some(annotation),
        }
    }

    /// Creates a parameter with no annotation, such as a `self` receiver.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Regular,
            annotation: None,
        }
    }

    /// Overrides the parameter kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter kind.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Returns the annotation, if present.
    #[must_use]
    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }
}

/// Name, documentation, and ordered parameters of a callable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSpec {
    name: String,
    doc: Option<String>,
    parameters: Vec<Parameter>,
}

impl FunctionSpec {
    /// Starts a specification for the named function.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            parameters: Vec::new(),
        }
    }

    /// Sets the documentation string exposed as the schema description.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends a typed, described parameter.
    #[must_use]
    pub fn arg(
        self,
        name: impl Into<String>,
        base: BaseType,
        description: impl Into<String>,
    ) -> Self {
        self.with_param(Parameter::new(name, base, description))
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw documentation string.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Returns parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Looks up a declared parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|param| param.name == name)
    }
}
