//! Resource facade
//!
//! Each operation composes the serializer, the transport, and the
//! deserializer for one resource kind. Operations a kind does not support
//! fail before any request is sent.

use super::kind::ResourceKind;
use super::schemas::{repo_spec, user_reset_password, RepoSpec};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::jsonapi::{deserialize, serialize, ResourceInput};
use crate::pagination::Paginator;
use crate::types::{FlatRecord, JsonValue};
use futures::stream::BoxStream;
use std::sync::Arc;
use tracing::debug;

/// Options for [`Resource::all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllOptions {
    /// Flatten the response into records (`true`) or return the raw document
    pub deserialize: bool,
    /// Walk every page instead of returning the first one
    pub all_pages: bool,
}

impl Default for AllOptions {
    fn default() -> Self {
        Self {
            deserialize: true,
            all_pages: false,
        }
    }
}

impl AllOptions {
    /// Walk every page
    #[must_use]
    pub fn all_pages(mut self) -> Self {
        self.all_pages = true;
        self
    }

    /// Return the raw JSON:API document
    #[must_use]
    pub fn raw(mut self) -> Self {
        self.deserialize = false;
        self
    }
}

/// Result of [`Resource::all`]
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// Flattened records
    Records(Vec<FlatRecord>),
    /// Raw JSON:API document
    Document(JsonValue),
}

impl Listing {
    /// The records, if this listing was deserialized
    pub fn into_records(self) -> Option<Vec<FlatRecord>> {
        match self {
            Listing::Records(records) => Some(records),
            Listing::Document(_) => None,
        }
    }

    /// The raw document, if deserialization was skipped
    pub fn into_document(self) -> Option<JsonValue> {
        match self {
            Listing::Document(document) => Some(document),
            Listing::Records(_) => None,
        }
    }
}

/// Entry point for one resource kind
#[derive(Debug, Clone)]
pub struct Resource {
    kind: ResourceKind,
    spec: RepoSpec,
    transport: Arc<Transport>,
    page_size: u32,
}

impl Resource {
    /// Create the facade for `kind`
    pub fn new(kind: ResourceKind, transport: Arc<Transport>, page_size: u32) -> Self {
        Self {
            kind,
            spec: repo_spec(kind),
            transport,
            page_size,
        }
    }

    /// Resource kind
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Collection path (`/items`, `/site`, ...)
    pub fn path(&self) -> &'static str {
        self.spec.path
    }

    /// Create a resource
    pub async fn create(&self, input: &ResourceInput) -> Result<FlatRecord> {
        let schema_fn = self.spec.create.ok_or_else(|| self.unsupported("create"))?;
        let body = serialize(&schema_fn(input), input, None)?;

        debug!(resource = %self.kind, "creating resource");
        let response = self.transport.post(self.spec.path, &body).await?;
        single(&response)
    }

    /// Fetch one resource by id
    pub async fn find(&self, id: &str) -> Result<FlatRecord> {
        let path = self.member_path("find", id)?;
        let response = self.transport.get(&path, None).await?;
        single(&response)
    }

    /// List resources
    ///
    /// `filters` are sent as query parameters (e.g. `{"filter": {"type": "post"}}`).
    /// With `all_pages`, every page is fetched with the configured page size
    /// and merged before deserialization.
    pub async fn all(&self, filters: Option<&JsonValue>, options: AllOptions) -> Result<Listing> {
        self.ensure_collection("all")?;

        let document = if options.all_pages {
            self.paginator(filters)?.collect_document().await?
        } else {
            self.transport.get(self.spec.path, filters).await?
        };

        if options.deserialize {
            Ok(Listing::Records(deserialize(&document)?.into_many()))
        } else {
            Ok(Listing::Document(document))
        }
    }

    /// Stream every record across all pages
    ///
    /// Pages are requested one at a time as the stream is consumed.
    pub fn stream_all(
        &self,
        filters: Option<&JsonValue>,
    ) -> Result<BoxStream<'static, Result<FlatRecord>>> {
        self.ensure_collection("stream_all")?;
        Ok(self.paginator(filters)?.records())
    }

    /// Update a resource
    pub async fn update(&self, id: &str, input: &ResourceInput) -> Result<FlatRecord> {
        let path = self.member_path("update", id)?;
        let schema_fn = self.spec.update.ok_or_else(|| self.unsupported("update"))?;
        let body = serialize(&schema_fn(input), input, Some(id))?;

        debug!(resource = %self.kind, id, "updating resource");
        let response = self.transport.put(&path, &body).await?;
        single(&response)
    }

    /// Delete a resource; returns the deleted record when the API echoes it
    pub async fn destroy(&self, id: &str) -> Result<Option<FlatRecord>> {
        if !self.spec.destroy {
            return Err(self.unsupported("destroy"));
        }
        let path = self.member_path("destroy", id)?;

        debug!(resource = %self.kind, id, "deleting resource");
        let response = self.transport.delete(&path).await?;
        optional(&response)
    }

    /// Fetch a singleton resource
    pub async fn fetch(&self) -> Result<FlatRecord> {
        self.ensure_singleton("fetch")?;
        let response = self.transport.get(self.spec.path, None).await?;
        single(&response)
    }

    /// Update a singleton resource
    pub async fn update_singleton(&self, input: &ResourceInput) -> Result<FlatRecord> {
        self.ensure_singleton("update_singleton")?;
        let schema_fn = self
            .spec
            .update
            .ok_or_else(|| self.unsupported("update_singleton"))?;
        let body = serialize(&schema_fn(input), input, None)?;

        let response = self.transport.put(self.spec.path, &body).await?;
        single(&response)
    }

    /// Ask the API to send a password reset email (users only)
    pub async fn reset_password(&self, input: &ResourceInput) -> Result<Option<FlatRecord>> {
        if self.kind != ResourceKind::Users {
            return Err(self.unsupported("reset_password"));
        }
        let body = serialize(&user_reset_password(), input, None)?;
        let path = format!("{}/reset_password", self.spec.path);
        let response = self.transport.post(&path, &body).await?;
        optional(&response)
    }

    fn paginator(&self, filters: Option<&JsonValue>) -> Result<Paginator> {
        Ok(
            Paginator::new(self.transport.clone(), self.spec.path, self.page_size)?
                .with_filters(filters.cloned()),
        )
    }

    fn member_path(&self, operation: &'static str, id: &str) -> Result<String> {
        self.ensure_collection(operation)?;
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::invalid_input(format!(
                "{} {operation} requires a resource id",
                self.kind
            )));
        }
        // Ids are opaque to the client; encode them as a single path segment.
        Ok(format!("{}/{}", self.spec.path, urlencoding::encode(id)))
    }

    fn ensure_collection(&self, operation: &'static str) -> Result<()> {
        if self.spec.singleton {
            return Err(self.unsupported(operation));
        }
        Ok(())
    }

    fn ensure_singleton(&self, operation: &'static str) -> Result<()> {
        if !self.spec.singleton {
            return Err(self.unsupported(operation));
        }
        Ok(())
    }

    fn unsupported(&self, operation: &'static str) -> Error {
        Error::unsupported(self.kind.as_str(), operation)
    }
}

fn single(response: &JsonValue) -> Result<FlatRecord> {
    deserialize(response)?
        .into_one()
        .ok_or_else(|| Error::decode("expected a single resource in response `data`"))
}

fn optional(response: &JsonValue) -> Result<Option<FlatRecord>> {
    if response.is_null() || response.get("data").is_none() {
        return Ok(None);
    }
    Ok(deserialize(response)?.into_one())
}
