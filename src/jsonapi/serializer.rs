//! JSON:API request serializer
//!
//! Turns a flat field mapping into a `{ "data": { ... } }` request document,
//! validating it against a `ResourceSchema` before anything reaches the wire.

use super::schema::{Relationship, ResourceSchema};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde_json::json;

/// Caller-supplied fields for a create or update call
///
/// Keys are plain strings; this is the only representation carried
/// past the facade boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceInput(JsonObject);

impl ResourceInput {
    /// Create an empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Field names
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Borrow the underlying map
    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }

    /// Check whether a field is present and not blank
    pub fn is_present(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !is_blank(v))
    }
}

impl From<JsonObject> for ResourceInput {
    fn from(map: JsonObject) -> Self {
        Self(map)
    }
}

impl TryFrom<JsonValue> for ResourceInput {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            JsonValue::Null => Ok(Self::default()),
            other => Err(Error::invalid_input(format!(
                "resource input must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ResourceInput
where
    K: Into<String>,
    V: Into<JsonValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Serializer bound to one resource schema
#[derive(Debug, Clone)]
pub struct JsonApiSerializer<'a> {
    schema: &'a ResourceSchema,
}

impl<'a> JsonApiSerializer<'a> {
    /// Create a serializer for the given schema
    pub fn new(schema: &'a ResourceSchema) -> Self {
        Self { schema }
    }

    /// Build a request document; `id` is only set on the update path
    pub fn serialize(&self, input: &ResourceInput, id: Option<&str>) -> Result<JsonValue> {
        self.check_required(input)?;

        let mut data = JsonObject::new();
        data.insert(
            "type".to_string(),
            JsonValue::String(self.schema.resource_type().to_string()),
        );
        if let Some(id) = id {
            data.insert("id".to_string(), JsonValue::String(id.to_string()));
        }

        let attributes: JsonObject = self
            .schema
            .attribute_names()
            .filter_map(|name| input.get(name).map(|v| (name.to_string(), v.clone())))
            .collect();
        data.insert("attributes".to_string(), JsonValue::Object(attributes));

        let mut relationships = JsonObject::new();
        for (name, relationship) in self.schema.relationships() {
            if let Some(value) = input.get(name) {
                let linkage = self.linkage(name, relationship, value)?;
                relationships.insert(name.to_string(), json!({ "data": linkage }));
            }
        }
        if !relationships.is_empty() {
            data.insert(
                "relationships".to_string(),
                JsonValue::Object(relationships),
            );
        }

        Ok(json!({ "data": data }))
    }

    /// Report every missing required field at once
    fn check_required(&self, input: &ResourceInput) -> Result<()> {
        let missing: Vec<String> = self
            .schema
            .required_attribute_names()
            .chain(self.schema.required_relationship_names())
            .filter(|name| !input.is_present(name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingFields {
                resource: self.schema.resource_type().to_string(),
                fields: missing,
            })
        }
    }

    fn linkage(
        &self,
        name: &str,
        relationship: &Relationship,
        value: &JsonValue,
    ) -> Result<JsonValue> {
        match (relationship.collection, value) {
            (true, JsonValue::Array(items)) => items
                .iter()
                .map(|item| self.reference(name, relationship, item))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array),
            (true, JsonValue::Null) => Ok(JsonValue::Array(Vec::new())),
            (true, _) => Err(self.arity_error(name, "a list of identifiers")),
            (false, JsonValue::Array(_)) => Err(self.arity_error(name, "a single identifier")),
            (false, JsonValue::Null) => Ok(JsonValue::Null),
            (false, item) => self.reference(name, relationship, item),
        }
    }

    fn reference(
        &self,
        name: &str,
        relationship: &Relationship,
        value: &JsonValue,
    ) -> Result<JsonValue> {
        let id = identifier(value).ok_or_else(|| {
            Error::invalid_input(format!(
                "relationship '{name}' needs a string or numeric id, got {}",
                json_kind(value)
            ))
        })?;
        Ok(json!({ "type": relationship.related_type, "id": id }))
    }

    fn arity_error(&self, name: &str, expected: &str) -> Error {
        Error::RelationshipArity {
            resource: self.schema.resource_type().to_string(),
            relationship: name.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Serialize `input` against `schema`
pub fn serialize(
    schema: &ResourceSchema,
    input: &ResourceInput,
    id: Option<&str>,
) -> Result<JsonValue> {
    JsonApiSerializer::new(schema).serialize(input, id)
}

/// Extract an identifier from a string, number, or object carrying `id`
fn identifier(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Object(map) => map.get("id").and_then(identifier),
        _ => None,
    }
}

/// `null`, whitespace-only strings, and empty containers count as absent
pub(crate) fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => false,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
