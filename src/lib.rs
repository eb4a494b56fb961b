// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Dato Client
//!
//! An async client for the DatoCMS content-management API, which speaks
//! JSON:API over HTTPS.
//!
//! ## Features
//!
//! - **Resources**: `create` / `find` / `all` / `update` / `destroy` per resource kind
//! - **JSON:API**: Request documents validated against per-resource schemas;
//!   responses flattened into plain records with `included` resolved
//! - **Pagination**: Offset/limit walks exposed as a lazy `Stream`
//! - **Typed Errors**: Field-level validation codes, raw status and body kept
//! - **TLS Fallback**: One-shot switch to a bundled CA file on certificate failures
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dato_client::{AllOptions, Client, ClientConfig, ResourceInput, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::new(ClientConfig::new("api-token"))?;
//!
//!     let role = client
//!         .roles()
//!         .create(&ResourceInput::new().with("name", "Editor"))
//!         .await?;
//!
//!     let items = client
//!         .items()
//!         .all(None, AllOptions::default().all_pages())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Client → Resource (per kind)                 │
//! │   create  find  all  stream_all  update  destroy  fetch      │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴──────┬──────────────┬──────────┐
//! │  Serializer  │      Transport      │ Deserializer │ Paginator│
//! ├──────────────┼─────────────────────┼──────────────┼──────────┤
//! │ Schema check │ Bearer auth         │ Flat records │ offset/  │
//! │ Attributes   │ Redirects           │ included     │ limit    │
//! │ Linkage      │ Error classifier    │ Stubs        │ Stream   │
//! │              │ CA bundle fallback  │              │          │
//! └──────────────┴─────────────────────┴──────────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Authenticated HTTP transport with error classification
pub mod http;

/// JSON:API serializer and deserializer
pub mod jsonapi;

/// Offset pagination over collection endpoints
pub mod pagination;

/// Per-resource facades
pub mod resources;

/// Client and resource registry
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use client::Client;
pub use config::ClientConfig;
pub use jsonapi::{Deserialized, Relationship, ResourceInput, ResourceSchema};
pub use pagination::Paginator;
pub use resources::{AllOptions, Listing, Resource, ResourceKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
