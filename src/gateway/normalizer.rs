//! Failure classification.
//!
//! Pure functions mapping raw transport outcomes into [`Error`] kinds. No
//! retry, no suppression, no logging.

use reqwest::StatusCode;
use serde_json::Value;

use crate::types::Error;

/// Longest upstream body excerpt carried in an error detail.
const MAX_DETAIL_CHARS: usize = 512;

/// Classify a `reqwest` client failure.
pub fn classify_reqwest(err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        return Error::transport(format!("request timed out: {}", err));
    }
    if let Some(status) = err.status() {
        return Error::upstream_http(status.as_u16(), err.to_string());
    }
    if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() || err.is_redirect()
    {
        return Error::transport(err.to_string());
    }
    if err.is_builder() {
        return Error::unexpected(format!("invalid request: {}", err));
    }
    Error::unexpected(err.to_string())
}

/// Classify a response status. `None` means success.
pub fn classify_status(status: u16, body: &[u8]) -> Option<Error> {
    match status {
        200..=299 => None,
        400..=599 => Some(Error::upstream_http(status, status_detail(status, body))),
        other => Some(Error::unexpected(format!(
            "unexpected upstream status {}",
            other
        ))),
    }
}

/// Decode an upstream body as JSON, unmodified.
pub fn decode_body(body: &[u8]) -> Result<Value, Error> {
    serde_json::from_slice(body)
        .map_err(|e| Error::transport(format!("malformed response body: {}", e)))
}

fn status_detail(status: u16, body: &[u8]) -> String {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return reason.to_string();
    }

    let excerpt: String = text.chars().take(MAX_DETAIL_CHARS).collect();
    if excerpt.len() < text.len() {
        format!("{}: {}...", reason, excerpt)
    } else {
        format!("{}: {}", reason, excerpt)
    }
}
