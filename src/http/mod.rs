//! HTTP transport module
//!
//! Sends authenticated requests to the content-management API and turns
//! failures into typed errors.
//!
//! # Features
//!
//! - **Transport**: Base URL, bearer auth, header merging, query encoding
//! - **Redirects**: Followed up to `MAX_REDIRECTS` hops with the same method
//! - **Classification**: Status >= 400 mapped to `Validation` / `ApiClient`
//! - **TLS Fallback**: One-shot switch to a bundled CA file, then one retry

mod backend;
mod classify;
mod query;
mod tls;
mod transport;

pub use backend::{HttpBackend, HttpRequest, HttpResponse, ReqwestBackend};
pub use classify::{classify_response, classify_transport, is_tls_failure, parse_error_document};
pub use query::{merge_params, to_query_pairs};
pub use tls::{TrustMode, TrustStore, CA_BUNDLE_ENV, DEFAULT_CA_BUNDLE};
pub use transport::{parse_body, user_agent, Transport, MAX_REDIRECTS};

#[cfg(test)]
pub(crate) mod mock;
