//! Core types for the gateway.
//!
//! - **Errors**: classified error taxonomy with thiserror derives
//! - **Config**: endpoint, transport and observability configuration

mod config;
mod errors;

pub use config::{
    Config, EndpointConfig, GatewayConfig, ObservabilityConfig, TransportConfig, API_KEY_ENV,
    DEFAULT_EMAIL_REPUTATION_URL, DEFAULT_EMAIL_VALIDATION_URL, DEFAULT_PHONE_VALIDATION_URL,
};
pub use errors::{Error, ErrorKind, Result};
