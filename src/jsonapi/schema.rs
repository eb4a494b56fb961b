//! Resource schema declarations
//!
//! A `ResourceSchema` lists which attributes and relationships a request
//! document may carry, and which of them must be present.

/// Declared arity and target type of a relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Whether the relationship holds a list of references
    pub collection: bool,
    /// JSON:API type tag of the related resource
    pub related_type: String,
}

impl Relationship {
    /// A to-one relationship
    pub fn one(related_type: impl Into<String>) -> Self {
        Self {
            collection: false,
            related_type: related_type.into(),
        }
    }

    /// A to-many relationship
    pub fn many(related_type: impl Into<String>) -> Self {
        Self {
            collection: true,
            related_type: related_type.into(),
        }
    }
}

/// Static per-resource declaration used by the serializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    resource_type: String,
    attributes: Vec<String>,
    relationships: Vec<(String, Relationship)>,
    required_attributes: Vec<String>,
    required_relationships: Vec<String>,
}

impl ResourceSchema {
    /// Create an empty schema for the given type tag
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
            required_attributes: Vec::new(),
            required_relationships: Vec::new(),
        }
    }

    /// Add allowed attributes
    #[must_use]
    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.attributes.contains(&name) {
                self.attributes.push(name);
            }
        }
        self
    }

    /// Add an allowed relationship
    #[must_use]
    pub fn relationship(mut self, name: impl Into<String>, relationship: Relationship) -> Self {
        let name = name.into();
        self.relationships.retain(|(n, _)| n != &name);
        self.relationships.push((name, relationship));
        self
    }

    /// Mark attributes as required (they are also added to the allowed set)
    #[must_use]
    pub fn required_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self = self.attributes(names.iter().cloned());
        for name in names {
            if !self.required_attributes.contains(&name) {
                self.required_attributes.push(name);
            }
        }
        self
    }

    /// Mark relationships as required; they must already be declared
    #[must_use]
    pub fn required_relationships<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if self.relationship_for(&name).is_some() && !self.required_relationships.contains(&name)
            {
                self.required_relationships.push(name);
            }
        }
        self
    }

    /// JSON:API type tag
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Allowed attribute names, in declaration order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }

    /// Declared relationships, in declaration order
    pub fn relationships(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.relationships.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Required attribute names
    pub fn required_attribute_names(&self) -> impl Iterator<Item = &str> {
        self.required_attributes.iter().map(String::as_str)
    }

    /// Required relationship names
    pub fn required_relationship_names(&self) -> impl Iterator<Item = &str> {
        self.required_relationships.iter().map(String::as_str)
    }

    /// Check whether `name` is an allowed attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }

    /// Look up a declared relationship
    pub fn relationship_for(&self, name: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }
}
