//! Client configuration
//!
//! A `ClientConfig` can be built in code, read from environment variables,
//! or loaded from a YAML file.

use crate::error::{Error, Result};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://site-api.datocms.com";

/// Default number of records per page when paging through collections
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Configuration for a `Client`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Read-write API token sent as a bearer token
    pub api_token: String,

    /// Base URL for all requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Extra headers sent with every request (fixed headers win on collision)
    #[serde(default)]
    pub extra_headers: StringMap,

    /// Request timeout in seconds; fractions are kept (`0.5` is 500ms)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// Page size used when fetching every page of a collection
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// PEM bundle used when the system trust store rejects the server
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl ClientConfig {
    /// Create a config with default values for everything but the token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: default_base_url(),
            extra_headers: StringMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            ca_bundle: None,
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATO_API_TOKEN`: API token (required)
    /// - `DATO_BASE_URL`: Base URL (default: "https://site-api.datocms.com")
    /// - `DATO_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    /// - `DATO_PAGE_SIZE`: Page size for full listings (default: 100)
    /// - `DATO_CA_BUNDLE`: Fallback PEM bundle path
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("DATO_API_TOKEN").ok_or_else(|| Error::Config {
            message: "DATO_API_TOKEN is not set".to_string(),
        })?;

        let mut config = Self::new(api_token);

        if let Some(base_url) = lookup("DATO_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(timeout) = lookup("DATO_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .parse()
                .map_err(|e| Error::config(format!("invalid DATO_TIMEOUT_SECS: {e}")))?;
        }
        if let Some(page_size) = lookup("DATO_PAGE_SIZE") {
            config.page_size = page_size
                .parse()
                .map_err(|e| Error::config(format!("invalid DATO_PAGE_SIZE: {e}")))?;
        }
        config.ca_bundle = lookup("DATO_CA_BUNDLE").map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add an extra header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs_f64();
        self
    }

    /// Set the page size for full listings
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the fallback CA bundle
    #[must_use]
    pub fn with_ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    /// Request timeout as a `Duration`
    ///
    /// Falls back to the default for values `validate` would reject.
    pub fn timeout(&self) -> Duration {
        self.checked_timeout()
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }

    /// `None` for negative, zero, NaN or overflowing values
    fn checked_timeout(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.timeout_secs)
            .ok()
            .filter(|timeout| !timeout.is_zero())
    }

    /// Check the configuration for values that would fail at request time
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::config("api_token must not be empty"));
        }
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        if self.checked_timeout().is_none() {
            return Err(Error::config(format!(
                "timeout_secs must be a positive number of seconds, got {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("extra_headers", &self.extra_headers)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .field("ca_bundle", &self.ca_bundle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("secret");
        assert_eq!(config.base_url, "https://site-api.datocms.com");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.page_size, 100);
        assert!(config.extra_headers.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new("secret")
            .with_base_url("http://localhost:3000")
            .with_header("X-Environment", "sandbox")
            .with_timeout(Duration::from_secs(5))
            .with_page_size(25)
            .with_ca_bundle("/tmp/ca.pem");

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(
            config.extra_headers.get("X-Environment"),
            Some(&"sandbox".to_string())
        );
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.ca_bundle, Some(PathBuf::from("/tmp/ca.pem")));
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let config = ClientConfig::new("secret").with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert!(config.validate().is_ok());

        let config = ClientConfig::from_yaml_str("api_token: abc\ntimeout_secs: 0.25\n").unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_and_invalid_timeouts_are_rejected() {
        let zero = ClientConfig::new("secret").with_timeout(Duration::ZERO);
        assert!(matches!(zero.validate(), Err(Error::Config { .. })));

        for timeout_secs in [-1.0, f64::NAN, f64::INFINITY, 1e-12] {
            let config = ClientConfig {
                timeout_secs,
                ..ClientConfig::new("secret")
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("timeout_secs"), "{err}");
        }

        let err = ClientConfig::from_lookup(|k| match k {
            "DATO_API_TOKEN" => Some("abc".to_string()),
            "DATO_TIMEOUT_SECS" => Some("0".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("super-secret-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("DATO_API_TOKEN", "abc"),
            ("DATO_BASE_URL", "http://127.0.0.1:9000"),
            ("DATO_PAGE_SIZE", "50"),
            ("DATO_CA_BUNDLE", "/etc/dato/ca.pem"),
        ]
        .into_iter()
        .collect();

        let config =
            ClientConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.api_token, "abc");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.ca_bundle, Some(PathBuf::from("/etc/dato/ca.pem")));
    }

    #[test]
    fn test_from_lookup_requires_token() {
        let err = ClientConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("DATO_API_TOKEN"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_numbers() {
        let err = ClientConfig::from_lookup(|k| match k {
            "DATO_API_TOKEN" => Some("abc".to_string()),
            "DATO_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("DATO_TIMEOUT_SECS"));
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
api_token: abc
base_url: https://site-api.example.com
extra_headers:
  X-Environment: sandbox
page_size: 10
"#;
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "https://site-api.example.com");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.extra_headers.len(), 1);
    }

    #[test]
    fn test_from_yaml_validates() {
        let err = ClientConfig::from_yaml_str("api_token: abc\npage_size: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = ClientConfig::from_yaml_str("api_token: abc\nbase_url: ftp://x\n").unwrap_err();
        assert!(err.to_string().contains("http or https"));

        let err = ClientConfig::from_yaml_str("base_url: https://x\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_token: from-file").unwrap();
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_token, "from-file");

        let err = ClientConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
