//! JSON:API response deserializer
//!
//! Flattens primary resources into plain records. Relationship references are
//! replaced by the matching side-loaded resource from `included` when one
//! exists, otherwise left exactly as the server sent them. Pure transform,
//! no I/O.

use crate::error::{Error, Result};
use crate::types::{FlatRecord, JsonObject, JsonValue};
use std::collections::HashMap;

/// Result of deserializing a response document
#[derive(Debug, Clone, PartialEq)]
pub enum Deserialized {
    /// `data` was `null`
    Null,
    /// `data` was a single resource
    One(FlatRecord),
    /// `data` was a collection, original order preserved
    Many(Vec<FlatRecord>),
}

impl Deserialized {
    /// The single record, if the document held one
    pub fn into_one(self) -> Option<FlatRecord> {
        match self {
            Deserialized::One(record) => Some(record),
            _ => None,
        }
    }

    /// All records; a single resource becomes a one-element list
    pub fn into_many(self) -> Vec<FlatRecord> {
        match self {
            Deserialized::Null => Vec::new(),
            Deserialized::One(record) => vec![record],
            Deserialized::Many(records) => records,
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        match self {
            Deserialized::Null => 0,
            Deserialized::One(_) => 1,
            Deserialized::Many(records) => records.len(),
        }
    }

    /// Check if no records were produced
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert back into a plain JSON value
    pub fn into_value(self) -> JsonValue {
        match self {
            Deserialized::Null => JsonValue::Null,
            Deserialized::One(record) => JsonValue::Object(record),
            Deserialized::Many(records) => {
                JsonValue::Array(records.into_iter().map(JsonValue::Object).collect())
            }
        }
    }
}

type ResourceKey = (String, String);

/// Deserializer holding the `included` lookup table of one document
#[derive(Debug)]
pub struct JsonApiDeserializer<'a> {
    included: HashMap<ResourceKey, &'a JsonObject>,
}

impl<'a> JsonApiDeserializer<'a> {
    /// Index the `included` array of a document
    pub fn new(document: &'a JsonValue) -> Result<Self> {
        let mut included = HashMap::new();
        match document.get("included") {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Array(resources)) => {
                for resource in resources {
                    let object = as_resource(resource)?;
                    if let Some(key) = resource_key(object) {
                        included.insert(key, object);
                    }
                }
            }
            Some(_) => return Err(Error::decode("`included` must be an array")),
        }
        Ok(Self { included })
    }

    /// Flatten the primary `data` of `document`
    pub fn deserialize(&self, document: &JsonValue) -> Result<Deserialized> {
        let data = document
            .as_object()
            .and_then(|d| d.get("data"))
            .ok_or_else(|| Error::decode("document has no `data` member"))?;

        match data {
            JsonValue::Null => Ok(Deserialized::Null),
            JsonValue::Array(resources) => resources
                .iter()
                .map(|r| self.flatten(as_resource(r)?, &mut Vec::new()))
                .collect::<Result<Vec<_>>>()
                .map(Deserialized::Many),
            resource => self
                .flatten(as_resource(resource)?, &mut Vec::new())
                .map(Deserialized::One),
        }
    }

    fn flatten(&self, resource: &JsonObject, path: &mut Vec<ResourceKey>) -> Result<FlatRecord> {
        let mut record = match resource.get("attributes") {
            None | Some(JsonValue::Null) => FlatRecord::new(),
            Some(JsonValue::Object(attributes)) => attributes.clone(),
            Some(_) => return Err(Error::decode("`attributes` must be an object")),
        };

        if let Some(id) = resource.get("id").and_then(id_string) {
            record.insert("id".to_string(), JsonValue::String(id));
        }

        let key = resource_key(resource);
        if let Some(key) = &key {
            path.push(key.clone());
        }

        if let Some(relationships) = resource.get("relationships") {
            let relationships = relationships
                .as_object()
                .ok_or_else(|| Error::decode("`relationships` must be an object"))?;
            for (name, relationship) in relationships {
                let Some(linkage) = relationship.get("data") else {
                    continue;
                };
                let value = match linkage {
                    JsonValue::Null => JsonValue::Null,
                    JsonValue::Array(references) => JsonValue::Array(
                        references
                            .iter()
                            .map(|r| self.resolve(r, path))
                            .collect::<Result<Vec<_>>>()?,
                    ),
                    reference => self.resolve(reference, path)?,
                };
                record.insert(name.clone(), value);
            }
        }

        if key.is_some() {
            path.pop();
        }
        Ok(record)
    }

    fn resolve(&self, reference: &JsonValue, path: &mut Vec<ResourceKey>) -> Result<JsonValue> {
        let key = reference
            .as_object()
            .and_then(resource_key)
            .ok_or_else(|| Error::decode("relationship reference needs `type` and `id`"))?;

        // A resource already being flattened on this path stays a reference.
        if path.contains(&key) {
            return Ok(reference.clone());
        }

        match self.included.get(&key) {
            Some(resource) => self.flatten(resource, path).map(JsonValue::Object),
            None => Ok(reference.clone()),
        }
    }
}

/// Deserialize a response document in one call
pub fn deserialize(document: &JsonValue) -> Result<Deserialized> {
    JsonApiDeserializer::new(document)?.deserialize(document)
}

fn as_resource(value: &JsonValue) -> Result<&JsonObject> {
    value
        .as_object()
        .ok_or_else(|| Error::decode("resource objects must be JSON objects"))
}

fn resource_key(resource: &JsonObject) -> Option<ResourceKey> {
    let kind = resource.get("type")?.as_str()?;
    let id = resource.get("id").and_then(id_string)?;
    Some((kind.to_string(), id))
}

fn id_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
