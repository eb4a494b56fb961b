//! Query string encoding
//!
//! Nested objects use bracket notation, so `{"filter": {"type": "post"}}`
//! becomes `filter[type]=post` and `{"page": {"limit": 25}}` becomes
//! `page[limit]=25`.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Flatten a parameter object into `(key, value)` pairs
pub fn to_query_pairs(params: &JsonValue) -> Result<Vec<(String, String)>> {
    match params {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::Object(map) => {
            let mut pairs = Vec::new();
            flatten_object(None, map, &mut pairs);
            Ok(pairs)
        }
        _ => Err(Error::invalid_input(
            "query parameters must be a JSON object",
        )),
    }
}

fn flatten_object(prefix: Option<&str>, map: &JsonObject, out: &mut Vec<(String, String)>) {
    for (key, value) in map {
        let name = match prefix {
            Some(prefix) => format!("{prefix}[{key}]"),
            None => key.clone(),
        };
        flatten_value(&name, value, out);
    }
}

fn flatten_value(name: &str, value: &JsonValue, out: &mut Vec<(String, String)>) {
    match value {
        JsonValue::Object(map) => flatten_object(Some(name), map, out),
        JsonValue::Array(items) => {
            let name = format!("{name}[]");
            for item in items {
                flatten_value(&name, item, out);
            }
        }
        JsonValue::Null => out.push((name.to_string(), String::new())),
        JsonValue::String(s) => out.push((name.to_string(), s.clone())),
        JsonValue::Bool(b) => out.push((name.to_string(), b.to_string())),
        JsonValue::Number(n) => out.push((name.to_string(), n.to_string())),
    }
}

/// Merge `extra` into `params` (both JSON objects); `extra` wins on collision
pub fn merge_params(params: Option<&JsonValue>, extra: &JsonObject) -> Result<JsonValue> {
    let mut merged = match params {
        None | Some(JsonValue::Null) => JsonObject::new(),
        Some(JsonValue::Object(map)) => map.clone(),
        Some(_) => {
            return Err(Error::invalid_input(
                "query parameters must be a JSON object",
            ))
        }
    };
    for (key, value) in extra {
        match (merged.get_mut(key), value) {
            (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k.clone(), v.clone());
                }
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(JsonValue::Object(merged))
}
