//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file and overridden by CLI
//! flags and environment variables in the binary. The provider credential is
//! deliberately not part of this structure; see [`crate::gateway::CredentialStore`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::errors::{Error, Result};

/// Default base URL of the email validation endpoint.
pub const DEFAULT_EMAIL_VALIDATION_URL: &str = "https://emailvalidation.abstractapi.com/v1/";
/// Default base URL of the phone validation endpoint.
pub const DEFAULT_PHONE_VALIDATION_URL: &str = "https://phonevalidation.abstractapi.com/v1/";
/// Default base URL of the email reputation endpoint.
pub const DEFAULT_EMAIL_REPUTATION_URL: &str = "https://emailreputation.abstractapi.com/v1/";

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "ABSTRACT_API_KEY";

/// Global gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Upstream endpoints and HTTP transport.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("cannot read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::configuration(format!("invalid config {}: {}", path.display(), e))
        })
    }
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub endpoints: EndpointConfig,

    #[serde(default)]
    pub transport: TransportConfig,
}

/// Base URL per capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub email_validation: String,
    pub phone_validation: String,
    pub email_reputation: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            email_validation: DEFAULT_EMAIL_VALIDATION_URL.to_string(),
            phone_validation: DEFAULT_PHONE_VALIDATION_URL.to_string(),
            email_reputation: DEFAULT_EMAIL_REPUTATION_URL.to_string(),
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Whole-request timeout. Expiry surfaces as a transport error.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Skip TLS certificate verification for provider requests.
    ///
    /// Security-relevant override: off by default, logged at warn level when
    /// enabled.
    pub accept_invalid_certs: bool,

    /// User-Agent header sent upstream.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            user_agent: concat!("abstract-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
