//! JSON:API document module
//!
//! # Overview
//!
//! - `ResourceSchema` declares what a request document for one resource type
//!   may contain and what it must contain.
//! - `JsonApiSerializer` validates caller input against a schema and builds the
//!   request document.
//! - `JsonApiDeserializer` flattens response documents, resolving relationship
//!   references through the `included` array.

mod deserializer;
mod schema;
mod serializer;

pub use deserializer::{deserialize, Deserialized, JsonApiDeserializer};
pub use schema::{Relationship, ResourceSchema};
pub use serializer::{serialize, JsonApiSerializer, ResourceInput};
