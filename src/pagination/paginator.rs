//! Offset paginator over a collection endpoint

use super::types::PaginationCursor;
use crate::error::{Error, Result};
use crate::http::{merge_params, Transport};
use crate::jsonapi::deserialize;
use crate::types::{FlatRecord, JsonValue};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Pages through a collection endpoint
#[derive(Debug, Clone)]
pub struct Paginator {
    transport: Arc<Transport>,
    path: String,
    filters: Option<JsonValue>,
    start: PaginationCursor,
}

struct Walk {
    transport: Arc<Transport>,
    path: String,
    filters: Option<JsonValue>,
    cursor: PaginationCursor,
}

impl Paginator {
    /// Create a paginator for `path` with pages of `limit` records
    pub fn new(transport: Arc<Transport>, path: impl Into<String>, limit: u32) -> Result<Self> {
        Ok(Self {
            transport,
            path: path.into(),
            filters: None,
            start: PaginationCursor::new(limit)?,
        })
    }

    /// Caller filters merged into every page request
    #[must_use]
    pub fn with_filters(mut self, filters: Option<JsonValue>) -> Self {
        self.filters = filters.filter(|f| !f.is_null());
        self
    }

    /// Page size
    pub fn limit(&self) -> u32 {
        self.start.limit()
    }

    /// Stream every page document, starting at offset 0
    ///
    /// The stream ends after the first page holding fewer than `limit`
    /// records. A failed request is yielded as the last item.
    pub fn pages(&self) -> BoxStream<'static, Result<JsonValue>> {
        let walk = Walk {
            transport: self.transport.clone(),
            path: self.path.clone(),
            filters: self.filters.clone(),
            cursor: self.start,
        };

        stream::try_unfold(walk, |mut walk| async move {
            if walk.cursor.is_done() {
                return Ok(None);
            }

            let params = merge_params(walk.filters.as_ref(), &walk.cursor.page_params())?;
            let page = walk.transport.get(&walk.path, Some(&params)).await?;
            let count = page_len(&page)?;

            debug!(
                path = %walk.path,
                offset = walk.cursor.offset(),
                limit = walk.cursor.limit(),
                count,
                "fetched page"
            );

            walk.cursor.advance(count);
            Ok::<_, Error>(Some((page, walk)))
        })
        .boxed()
    }

    /// Stream every record of every page, flattened
    pub fn records(&self) -> BoxStream<'static, Result<FlatRecord>> {
        self.pages()
            .and_then(|page| async move {
                let records = deserialize(&page)?.into_many();
                Ok::<_, Error>(stream::iter(records.into_iter().map(Ok::<_, Error>)))
            })
            .try_flatten()
            .boxed()
    }

    /// Fetch and flatten every record
    pub async fn collect_records(&self) -> Result<Vec<FlatRecord>> {
        self.records().try_collect().await
    }

    /// Fetch every page and merge them into one document
    ///
    /// `data` is concatenated in page order, `included` is de-duplicated by
    /// `(type, id)`, and `meta` is taken from the first page.
    pub async fn collect_document(&self) -> Result<JsonValue> {
        let mut pages = self.pages();
        let mut data = Vec::new();
        let mut included = Vec::new();
        let mut seen = HashSet::new();
        let mut meta = None;

        while let Some(page) = pages.try_next().await? {
            let JsonValue::Object(mut page) = page else {
                continue;
            };
            if meta.is_none() {
                meta = page.remove("meta");
            }
            if let Some(JsonValue::Array(items)) = page.remove("data") {
                data.extend(items);
            }
            if let Some(JsonValue::Array(items)) = page.remove("included") {
                for item in items {
                    let key = (
                        item.get("type").map(ToString::to_string),
                        item.get("id").map(ToString::to_string),
                    );
                    if seen.insert(key) {
                        included.push(item);
                    }
                }
            }
        }

        let mut document = json!({ "data": data });
        if !included.is_empty() {
            document["included"] = JsonValue::Array(included);
        }
        if let Some(meta) = meta {
            document["meta"] = meta;
        }
        Ok(document)
    }
}

/// Number of primary records in a collection page
fn page_len(page: &JsonValue) -> Result<usize> {
    match page.get("data") {
        Some(JsonValue::Array(items)) => Ok(items.len()),
        Some(JsonValue::Null) => Ok(0),
        Some(_) => Err(Error::decode("expected a collection in page `data`")),
        None => Err(Error::decode("page document has no `data` member")),
    }
}
