//! HTTP execution backend
//!
//! `HttpRequest` and `HttpResponse` describe one exchange as plain data.
//! An `HttpBackend` performs exactly one exchange: it follows no redirects,
//! retries nothing, and does not interpret the status code.

use super::classify::classify_transport;
use super::tls::{TrustMode, TrustStore};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// An HTTP request described as plain data
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<JsonValue>,
}

impl HttpRequest {
    /// Look up a header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Build a response with a body and no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Build a JSON response
    pub fn json(status: u16, body: &JsonValue) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Whether the media type ends in `json` (`application/json`,
    /// `application/vnd.api+json`, ...)
    pub fn is_json(&self) -> bool {
        self.header("content-type").is_some_and(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
                .ends_with("json")
        })
    }

    /// Whether this is a redirect carrying a `Location`
    pub fn redirect_location(&self) -> Option<&str> {
        if matches!(self.status, 301 | 302 | 303 | 307 | 308) {
            self.header("location")
        } else {
            None
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Executes a single HTTP exchange under the given trust mode
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, request: &HttpRequest, trust: TrustMode) -> Result<HttpResponse>;
}

/// reqwest-backed implementation
///
/// One `reqwest::Client` per trust mode, each built on first use and reused
/// for every later request so connections are pooled.
pub struct ReqwestBackend {
    timeout: Duration,
    trust: Arc<TrustStore>,
    system: once_cell::sync::OnceCell<Client>,
    bundled: tokio::sync::OnceCell<Client>,
}

impl ReqwestBackend {
    /// Create a backend; no client is built until the first request
    pub fn new(timeout: Duration, trust: Arc<TrustStore>) -> Self {
        Self {
            timeout,
            trust,
            system: once_cell::sync::OnceCell::new(),
            bundled: tokio::sync::OnceCell::new(),
        }
    }

    fn builder(&self) -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(self.timeout)
            .redirect(Policy::none())
    }

    async fn client(&self, trust: TrustMode) -> Result<&Client> {
        match trust {
            TrustMode::System => self
                .system
                .get_or_try_init(|| self.builder().build().map_err(Error::Http)),
            TrustMode::Bundled => {
                self.bundled
                    .get_or_try_init(|| async {
                        let certs = self.trust.load_bundle().await?;
                        let builder = certs
                            .into_iter()
                            .fold(self.builder().tls_built_in_root_certs(false), |b, cert| {
                                b.add_root_certificate(cert)
                            });
                        builder.build().map_err(Error::Http)
                    })
                    .await
            }
        }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: &HttpRequest, trust: TrustMode) -> Result<HttpResponse> {
        let client = self.client(trust).await?;

        let mut req = client.request(request.method.into(), request.url.clone());
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.body(serde_json::to_vec(body)?);
        }

        let response = req.send().await.map_err(classify_transport)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(classify_transport)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestBackend")
            .field("timeout", &self.timeout)
            .field("system_ready", &self.system.get().is_some())
            .field("bundled_ready", &self.bundled.initialized())
            .finish_non_exhaustive()
    }
}
