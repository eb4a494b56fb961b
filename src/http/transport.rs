//! Authenticated transport for the content-management API
//!
//! Handles:
//! - URL building from the configured base URL
//! - Header merging (caller headers first, fixed headers applied on top)
//! - Query-string encoding for GET, JSON bodies for everything else
//! - Redirect following with the same method
//! - Status classification (any status >= 400 is an error)
//! - The one-shot CA bundle fallback on TLS verification failures

use super::backend::{HttpBackend, HttpRequest, HttpResponse, ReqwestBackend};
use super::classify::classify_response;
use super::query::to_query_pairs;
use super::tls::{TrustMode, TrustStore};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, StringMap};
use std::sync::Arc;
use tracing::{debug, error, warn};
use url::Url;

/// Maximum number of redirects followed for one request
pub const MAX_REDIRECTS: usize = 3;

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("dato-client-rs v{}", crate::VERSION)
}

/// Transport bound to one API token and base URL
pub struct Transport {
    base_url: Url,
    api_token: String,
    extra_headers: StringMap,
    trust: Arc<TrustStore>,
    backend: Arc<dyn HttpBackend>,
}

impl Transport {
    /// Create a transport using reqwest and the process-wide trust store
    /// (or a dedicated one when the config names a CA bundle)
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let trust = match &config.ca_bundle {
            Some(path) => Arc::new(TrustStore::new(path.clone())),
            None => TrustStore::global(),
        };
        let backend = Arc::new(ReqwestBackend::new(config.timeout(), trust.clone()));
        Self::with_backend(config, trust, backend)
    }

    /// Create a transport with an explicit trust store and backend
    pub fn with_backend(
        config: &ClientConfig,
        trust: Arc<TrustStore>,
        backend: Arc<dyn HttpBackend>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            api_token: config.api_token.clone(),
            extra_headers: config.extra_headers.clone(),
            trust,
            backend,
        })
    }

    /// Trust store consulted by this transport
    pub fn trust_store(&self) -> &Arc<TrustStore> {
        &self.trust
    }

    /// Make a GET request; `params` are sent as the query string
    pub async fn get(&self, path: &str, params: Option<&JsonValue>) -> Result<JsonValue> {
        self.request(Method::GET, path, params).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: &JsonValue) -> Result<JsonValue> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: &JsonValue) -> Result<JsonValue> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<JsonValue> {
        self.request(Method::DELETE, path, None).await
    }

    /// Send a request and return the parsed body
    ///
    /// JSON responses are parsed, empty bodies become `null`, and any other
    /// body is returned as a JSON string.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&JsonValue>,
    ) -> Result<JsonValue> {
        let request = self.build_request(method, path, payload)?;
        debug!(method = %method, url = %request.url, "sending request");

        let response = self.send(&request).await.inspect_err(|e| log_failure(&request, e))?;
        parse_body(&response)
    }

    /// Build the request without sending it
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&JsonValue>,
    ) -> Result<HttpRequest> {
        let url = self.build_url(path)?;

        let (query, body) = match payload {
            None | Some(JsonValue::Null) => (Vec::new(), None),
            Some(params) if method.uses_query() => (to_query_pairs(params)?, None),
            Some(_) if method == Method::DELETE => (Vec::new(), None),
            Some(body) => (Vec::new(), Some(body.clone())),
        };

        Ok(HttpRequest {
            method,
            url,
            headers: self.headers(),
            query,
            body,
        })
    }

    /// Merged request headers
    ///
    /// Caller headers are laid down first; the fixed set is applied second
    /// and replaces any caller header with the same (case-insensitive) name.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .extra_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.sort();

        let fixed = [
            ("Accept", "application/json".to_string()),
            ("Content-Type", "application/json".to_string()),
            ("Authorization", format!("Bearer {}", self.api_token)),
            ("User-Agent", user_agent()),
        ];
        for (name, value) in fixed {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.to_string(), value));
        }
        headers
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Send with the CA bundle fallback wrapped around the redirect loop
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mode = self.trust.mode();
        match self.follow_redirects(request, mode).await {
            Err(Error::Tls { message }) if mode == TrustMode::System => {
                warn!(url = %request.url, error = %message, "TLS failure, retrying with CA bundle");
                self.trust.switch_to_bundle();
                self.follow_redirects(request, TrustMode::Bundled).await
            }
            other => other,
        }
    }

    async fn follow_redirects(
        &self,
        request: &HttpRequest,
        trust: TrustMode,
    ) -> Result<HttpResponse> {
        let mut current = request.clone();
        let mut hops = 0;

        loop {
            let response = self.backend.execute(&current, trust).await?;

            if let Some(location) = response.redirect_location() {
                hops += 1;
                if hops > MAX_REDIRECTS {
                    return Err(Error::TooManyRedirects {
                        url: request.url.to_string(),
                        limit: MAX_REDIRECTS,
                    });
                }
                let next = current.url.join(location)?;
                debug!(from = %current.url, to = %next, "following redirect");
                if next.origin() != current.url.origin() {
                    // Credentials stay with the origin they were issued for
                    current
                        .headers
                        .retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
                }
                current.url = next;
                current.query.clear();
                continue;
            }

            if response.status >= 400 {
                return Err(classify_response(response.status, &response.body));
            }
            return Ok(response);
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("extra_headers", &self.extra_headers)
            .field("trust", &self.trust)
            .finish_non_exhaustive()
    }
}

/// Decode a successful response body
pub fn parse_body(response: &HttpResponse) -> Result<JsonValue> {
    if response.body.trim().is_empty() {
        return Ok(JsonValue::Null);
    }
    if response.is_json() {
        return Ok(serde_json::from_str(&response.body)?);
    }
    Ok(JsonValue::String(response.body.clone()))
}

fn log_failure(request: &HttpRequest, err: &Error) {
    match err {
        Error::Connection { .. } | Error::Timeout { .. } | Error::Tls { .. } => {
            error!(method = %request.method, url = %request.url, error = %err, "request failed");
        }
        Error::Validation { .. } | Error::ApiClient { .. } => {
            warn!(method = %request.method, url = %request.url, error = %err, "API returned an error");
        }
        _ => {}
    }
}
