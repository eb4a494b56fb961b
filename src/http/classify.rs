//! Failure classification
//!
//! Maps HTTP error statuses and transport failures onto the crate's error
//! taxonomy. Nothing is swallowed: a body that is not a JSON:API error
//! document still surfaces as `Error::ApiClient` with the raw status and body.

use crate::error::{Error, ValidationDetail};
use crate::types::JsonValue;

/// Classify a response with status >= 400
pub fn classify_response(status: u16, body: &str) -> Error {
    if (400..500).contains(&status) {
        if let Some(errors) = parse_error_document(body) {
            return Error::Validation {
                status,
                errors,
                body: body.to_string(),
            };
        }
    }
    Error::api_client(status, body)
}

/// Extract `errors[]` from a JSON:API error document
///
/// Returns `None` unless the body is JSON with a non-empty `errors` array.
/// Besides the standard `source.pointer` / `code` members, the API's own
/// `attributes.details.{field,code}` and `attributes.code` shape is read.
pub fn parse_error_document(body: &str) -> Option<Vec<ValidationDetail>> {
    let document: JsonValue = serde_json::from_str(body).ok()?;
    let errors = document.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }

    let details: Vec<ValidationDetail> = errors
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|e| {
            let attributes = e.get("attributes");
            let details = attributes.and_then(|a| a.get("details"));
            ValidationDetail {
                pointer: e
                    .get("source")
                    .and_then(|s| s.get("pointer"))
                    .or_else(|| e.get("pointer"))
                    .and_then(JsonValue::as_str)
                    .map(str::to_string)
                    .or_else(|| {
                        string_member(details.and_then(|d| d.get("field")))
                            .map(|field| format!("/data/attributes/{field}"))
                    }),
                code: string_member(e.get("code"))
                    .or_else(|| string_member(details.and_then(|d| d.get("code"))))
                    .or_else(|| string_member(attributes.and_then(|a| a.get("code")))),
                detail: string_member(e.get("detail")),
                title: string_member(e.get("title")),
            }
        })
        .collect();

    if details.is_empty() {
        None
    } else {
        Some(details)
    }
}

fn string_member(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Classify a failure raised by reqwest before a response was available
pub fn classify_transport(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        return Error::Timeout {
            message: err.to_string(),
        };
    }
    // The top-level message embeds the URL, so only the causes are inspected.
    if std::error::Error::source(&err).is_some_and(is_tls_failure) {
        return Error::tls(error_chain(&err));
    }
    if err.is_connect() {
        return Error::connection(error_chain(&err));
    }
    Error::Http(err)
}

/// Check whether any error in the source chain is a certificate verification failure
///
/// Only verification wording counts. Handshake resets, alerts and other
/// TLS-layer noise are connection failures and must not trigger the CA
/// bundle fallback.
pub fn is_tls_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    const MARKERS: [&str; 6] = [
        "invalid peer certificate",
        "unknownissuer",
        "certificate verify failed",
        "unable to get local issuer certificate",
        "self signed certificate",
        "self-signed certificate",
    ];

    let mut current = Some(err);
    while let Some(e) = current {
        let message = e.to_string().to_lowercase();
        if MARKERS.iter().any(|m| message.contains(m)) {
            return true;
        }
        current = e.source();
    }
    false
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(e) = current {
        parts.push(e.to_string());
        current = e.source();
    }
    parts.join(": ")
}
