//! Pagination state
//!
//! Offset/limit bookkeeping for one walk over a collection endpoint.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::json;

/// Position of an offset/limit walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    offset: u64,
    limit: u32,
    total_fetched: u64,
    done: bool,
}

impl PaginationCursor {
    /// Start a walk at offset 0; `limit` must be positive
    pub fn new(limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(Error::invalid_input("page limit must be greater than 0"));
        }
        Ok(Self {
            offset: 0,
            limit,
            total_fetched: 0,
            done: false,
        })
    }

    /// Offset of the next page
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Page size
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Records seen so far
    pub fn total_fetched(&self) -> u64 {
        self.total_fetched
    }

    /// Whether the last page has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Query parameters for the next page: `page[offset]`, `page[limit]`
    pub fn page_params(&self) -> JsonObject {
        let mut params = JsonObject::new();
        params.insert(
            "page".to_string(),
            json!({"offset": self.offset, "limit": self.limit}),
        );
        params
    }

    /// Account for a fetched page of `count` records
    ///
    /// A short page ends the walk; a full page moves the offset by `limit`.
    pub fn advance(&mut self, count: usize) {
        self.total_fetched += count as u64;
        if count < self.limit as usize {
            self.done = true;
        } else {
            self.offset += u64::from(self.limit);
        }
    }
}
