//! Application error types.
//!
//! Every failure on the path from tool call to upstream response is
//! classified into one of these variants before it crosses the tool
//! boundary. Callers branch on [`ErrorKind`], never on message text.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Classified gateway error.
#[derive(Error, Debug)]
pub enum Error {
    /// Required credential or configuration missing. Never retried and
    /// raised before any network action.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Tool arguments are unusable (missing or empty target, wrong type).
    #[error("validation error: {0}")]
    Validation(String),

    /// Provider answered with a 4xx/5xx status.
    #[error("upstream http error {status_code}: {detail}")]
    UpstreamHttp { status_code: u16, detail: String },

    /// Request could not complete at the network/protocol level
    /// (timeout, DNS, reset, malformed body).
    #[error("transport error: {0}")]
    Transport(String),

    /// Caller cancelled the call while the upstream request was in flight.
    #[error("operation cancelled: {0}")]
    Cancelled(String),

    /// Anything not matching the above.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Tag for [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    ConfigurationError,
    ValidationError,
    UpstreamHttpError,
    TransportError,
    Cancelled,
    UnexpectedError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigurationError => "ConfigurationError",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::UpstreamHttpError => "UpstreamHttpError",
            ErrorKind::TransportError => "TransportError",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::UnexpectedError => "UnexpectedError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::ConfigurationError,
            Error::Validation(_) => ErrorKind::ValidationError,
            Error::UpstreamHttp { .. } => ErrorKind::UpstreamHttpError,
            Error::Transport(_) => ErrorKind::TransportError,
            Error::Cancelled(_) => ErrorKind::Cancelled,
            Error::Unexpected(_) => ErrorKind::UnexpectedError,
        }
    }

    /// Upstream status code, present only for [`Error::UpstreamHttp`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::UpstreamHttp { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Structured form handed to the calling protocol.
    pub fn to_tool_error_payload(&self) -> Value {
        let mut payload = serde_json::json!({
            "kind": self.kind().as_str(),
            "message": self.to_string(),
        });
        if let (Some(code), Some(map)) = (self.status_code(), payload.as_object_mut()) {
            map.insert("status_code".to_string(), Value::from(code));
        }
        payload
    }
}

// Convenience constructors
impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upstream_http(status_code: u16, detail: impl Into<String>) -> Self {
        Self::UpstreamHttp {
            status_code,
            detail: detail.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(format!("io error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_status_code() {
        let err = Error::upstream_http(429, "Too Many Requests");
        assert_eq!(err.kind(), ErrorKind::UpstreamHttpError);
        assert_eq!(err.status_code(), Some(429));

        let err = Error::configuration("missing key");
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_tool_error_payload_carries_status() {
        let payload = Error::upstream_http(401, "Unauthorized").to_tool_error_payload();
        assert_eq!(payload["kind"], "UpstreamHttpError");
        assert_eq!(payload["status_code"], 401);
        assert_eq!(payload["message"], "upstream http error 401: Unauthorized");
    }

    #[test]
    fn test_tool_error_payload_omits_status_for_other_kinds() {
        let payload = Error::transport("connection reset").to_tool_error_payload();
        assert_eq!(payload["kind"], "TransportError");
        assert!(payload.get("status_code").is_none());
    }
}
