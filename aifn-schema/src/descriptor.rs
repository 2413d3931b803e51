//! Schema descriptors exposed to function-calling models.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Schema of a single exposed parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    schema_type: &'static str,
    description: String,
}

impl PropertySchema {
    pub(crate) fn new(schema_type: &'static str, description: impl Into<String>) -> Self {
        Self {
            schema_type,
            description: description.into(),
        }
    }

    /// JSON schema type name.
    #[must_use]
    pub fn schema_type(&self) -> &'static str {
        self.schema_type
    }

    /// Description shown to the model.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The `parameters` object of a schema: a flat object with ordered properties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParametersSchema {
    properties: Vec<(String, PropertySchema)>,
}

impl ParametersSchema {
    pub(crate) fn new(properties: Vec<(String, PropertySchema)>) -> Self {
        Self { properties }
    }

    /// Looks up a property by parameter name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find_map(|(key, schema)| (key == name).then_some(schema))
    }

    /// Property names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    /// Number of exposed properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` when no parameter is exposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

struct OrderedProperties<'a>(&'a [(String, PropertySchema)]);

impl Serialize for OrderedProperties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl Serialize for ParametersSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &OrderedProperties(&self.properties))?;
        map.end()
    }
}

/// Description of a callable function as exposed to a model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaDescriptor {
    name: String,
    description: String,
    parameters: ParametersSchema,
}

impl SchemaDescriptor {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParametersSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized documentation string.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters object.
    #[must_use]
    pub fn parameters(&self) -> &ParametersSchema {
        &self.parameters
    }
}
