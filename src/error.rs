//! Error types for the Dato client
//!
//! This module defines the error hierarchy for the whole client.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::collections::BTreeMap;
use thiserror::Error;

/// A single violation reported by the API in a JSON:API `errors[]` entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationDetail {
    /// JSON pointer to the offending member (e.g. `/data/attributes/email`)
    pub pointer: Option<String>,
    /// Machine-readable code (e.g. `INVALID_FORMAT`)
    pub code: Option<String>,
    /// Human-readable explanation
    pub detail: Option<String>,
    /// Short summary of the problem
    pub title: Option<String>,
}

impl ValidationDetail {
    /// Field name derived from the pointer's last segment
    pub fn field(&self) -> Option<&str> {
        self.pointer
            .as_deref()
            .and_then(|p| p.rsplit('/').next())
            .filter(|s| !s.is_empty())
    }
}

/// The main error type for the Dato client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Client-side Schema Errors
    // ============================================================================
    #[error("Invalid {resource} payload, missing: {}", .fields.join(", "))]
    MissingFields {
        resource: String,
        fields: Vec<String>,
    },

    #[error("Relationship '{relationship}' of {resource} expects {expected}")]
    RelationshipArity {
        resource: String,
        relationship: String,
        expected: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("Validation failed (HTTP {status}): {}", summarize(.errors))]
    Validation {
        status: u16,
        errors: Vec<ValidationDetail>,
        body: String,
    },

    #[error("API error (HTTP {status}): {body}")]
    ApiClient { status: u16, body: String },

    // ============================================================================
    // Network Errors
    // ============================================================================
    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Request timed out: {message}")]
    Timeout { message: String },

    #[error("TLS verification failed: {message}")]
    Tls { message: String },

    #[error("Too many redirects ({limit}) starting at {url}")]
    TooManyRedirects { url: String, limit: usize },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ============================================================================
    // Facade Errors
    // ============================================================================
    #[error("Resource '{resource}' does not support {operation}")]
    Unsupported {
        resource: String,
        operation: &'static str,
    },

    #[error("Unknown resource kind: {name}")]
    UnknownResource { name: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Malformed JSON:API document: {message}")]
    Decode { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

fn summarize(errors: &[ValidationDetail]) -> String {
    errors
        .iter()
        .map(|e| {
            format!(
                "{}={}",
                e.pointer.as_deref().unwrap_or("?"),
                e.code.as_deref().unwrap_or("?")
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a generic API error
    pub fn api_client(status: u16, body: impl Into<String>) -> Self {
        Self::ApiClient {
            status,
            body: body.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a TLS error
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls {
            message: message.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(resource: impl Into<String>, operation: &'static str) -> Self {
        Self::Unsupported {
            resource: resource.into(),
            operation,
        }
    }

    /// HTTP status carried by server-side errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Validation { status, .. } | Error::ApiClient { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body carried by server-side errors
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Validation { body, .. } | Error::ApiClient { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Check if this is a server-reported validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Check if this error was raised before any request was sent
    pub fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            Error::MissingFields { .. } | Error::RelationshipArity { .. } | Error::InvalidInput { .. }
        )
    }

    /// Check if this is a connection failure
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this is a TLS trust failure
    pub fn is_tls(&self) -> bool {
        matches!(self, Error::Tls { .. })
    }

    /// Validation codes grouped by field (or pointer when no field can be derived)
    pub fn field_codes(&self) -> BTreeMap<String, Vec<String>> {
        let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Error::Validation { errors, .. } = self {
            for detail in errors {
                let key = detail
                    .field()
                    .map(str::to_string)
                    .or_else(|| detail.pointer.clone())
                    .unwrap_or_default();
                if let Some(code) = &detail.code {
                    out.entry(key).or_default().push(code.clone());
                }
            }
        }
        out
    }
}

/// Result type alias for the Dato client
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::MissingFields {
            resource: "user".to_string(),
            fields: vec!["email".to_string(), "role".to_string()],
        };
        assert_eq!(err.to_string(), "Invalid user payload, missing: email, role");

        let err = Error::api_client(500, "boom");
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
    }

    #[test]
    fn test_status_and_body() {
        let err = Error::api_client(404, "not found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some("not found"));

        assert_eq!(Error::connection("refused").status(), None);
    }

    #[test]
    fn test_predicates() {
        assert!(Error::connection("refused").is_connection());
        assert!(Error::Timeout {
            message: "30s".to_string()
        }
        .is_timeout());
        assert!(Error::tls("bad cert").is_tls());
        assert!(Error::invalid_input("x").is_schema_violation());
        assert!(!Error::api_client(400, "").is_validation());
    }

    #[test]
    fn test_field_codes_groups_by_field() {
        let err = Error::Validation {
            status: 422,
            errors: vec![
                ValidationDetail {
                    pointer: Some("/data/attributes/email".to_string()),
                    code: Some("INVALID_FORMAT".to_string()),
                    ..Default::default()
                },
                ValidationDetail {
                    pointer: Some("/data/attributes/email".to_string()),
                    code: Some("TAKEN".to_string()),
                    ..Default::default()
                },
                ValidationDetail {
                    pointer: None,
                    code: Some("INVALID_REQUEST".to_string()),
                    ..Default::default()
                },
            ],
            body: String::new(),
        };

        let codes = err.field_codes();
        assert_eq!(
            codes.get("email"),
            Some(&vec!["INVALID_FORMAT".to_string(), "TAKEN".to_string()])
        );
        assert_eq!(codes.get(""), Some(&vec!["INVALID_REQUEST".to_string()]));
    }

    #[test]
    fn test_validation_detail_field() {
        let detail = ValidationDetail {
            pointer: Some("/data/relationships/role".to_string()),
            ..Default::default()
        };
        assert_eq!(detail.field(), Some("role"));

        let detail = ValidationDetail {
            pointer: Some("/".to_string()),
            ..Default::default()
        };
        assert_eq!(detail.field(), None);
    }
}
