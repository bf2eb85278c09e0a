//! Capabilities and the endpoint registry.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::types::{EndpointConfig, Error, Result};

/// One of the supported validation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    EmailVerification,
    PhoneValidation,
    EmailReputation,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::EmailVerification,
        Capability::PhoneValidation,
        Capability::EmailReputation,
    ];

    /// Name the tool is registered under.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Capability::EmailVerification => "verify_email",
            Capability::PhoneValidation => "validate_phone",
            Capability::EmailReputation => "check_email_reputation",
        }
    }

    /// Query parameter carrying the primary subject.
    pub fn target_param(&self) -> &'static str {
        match self {
            Capability::EmailVerification | Capability::EmailReputation => "email",
            Capability::PhoneValidation => "phone",
        }
    }

    /// Optional query parameters, in the order they are appended.
    pub fn optional_params(&self) -> &'static [&'static str] {
        match self {
            Capability::PhoneValidation => &["country"],
            Capability::EmailVerification | Capability::EmailReputation => &[],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Capability::EmailVerification => {
                "Validate an email address: format, deliverability, quality score, \
                 free/disposable/role/catch-all flags, MX and SMTP checks. Returns the \
                 provider's email-validation document unchanged."
            }
            Capability::PhoneValidation => {
                "Validate a phone number from over 190 countries: validity, international \
                 and local format, country, location, line type and carrier. Pass an ISO \
                 country code in `country` to analyse a national-format number. Returns \
                 the provider's phone-validation document unchanged."
            }
            Capability::EmailReputation => {
                "Analyse email reputation: deliverability, quality, sender, domain, risk \
                 and breach history. Returns the provider's reputation document unchanged."
            }
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tool_name() == name)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// Static mapping from capability to upstream base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRegistry {
    email_validation: Url,
    phone_validation: Url,
    email_reputation: Url,
}

impl EndpointRegistry {
    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        Ok(Self {
            email_validation: parse_base_url("email_validation", &config.email_validation)?,
            phone_validation: parse_base_url("phone_validation", &config.phone_validation)?,
            email_reputation: parse_base_url("email_reputation", &config.email_reputation)?,
        })
    }

    pub fn base_url(&self, capability: Capability) -> &Url {
        match capability {
            Capability::EmailVerification => &self.email_validation,
            Capability::PhoneValidation => &self.phone_validation,
            Capability::EmailReputation => &self.email_reputation,
        }
    }
}

fn parse_base_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| Error::configuration(format!("endpoint {} '{}': {}", field, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::configuration(format!(
            "endpoint {} has unsupported scheme '{}'",
            field, other
        ))),
    }
}
