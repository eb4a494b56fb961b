//! Pagination module
//!
//! Walks a collection endpoint with `page[offset]` / `page[limit]` until a
//! page comes back shorter than the limit.
//!
//! # Overview
//!
//! `Paginator` exposes the walk as a lazy `Stream`: a page is requested only
//! once the consumer has polled past the previous one, and each call starts a
//! fresh cursor at offset 0.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::PaginationCursor;
