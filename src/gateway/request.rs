//! Validation requests and the request builder.

use reqwest::Url;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::capability::{Capability, EndpointRegistry};
use super::credential::{Credential, CredentialStore};
use crate::types::{Error, Result};
use crate::validation::validate_non_empty;

/// Query parameter carrying the credential.
pub const API_KEY_PARAM: &str = "api_key";

/// One validation call: capability, primary subject and optional hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub capability: Capability,
    pub target: String,
    pub options: BTreeMap<String, String>,
}

impl ValidationRequest {
    pub fn new(capability: Capability, target: impl Into<String>) -> Self {
        Self {
            capability,
            target: target.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

/// Fully-qualified upstream request: base URL plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub capability: Capability,
    pub url: Url,
    credential: Credential,
    params: Vec<(&'static str, String)>,
}

impl RequestDescriptor {
    /// All query parameters in send order, credential first.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::with_capacity(self.params.len() + 1);
        pairs.push((API_KEY_PARAM, self.credential.expose()));
        pairs.extend(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        pairs
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.query_pairs().iter().any(|(k, _)| *k == name)
    }

    /// Final URL with every query value percent-encoded.
    pub fn to_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().extend_pairs(self.query_pairs());
        url
    }

    /// Final URL with the credential masked, for logging.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(API_KEY_PARAM, "***");
            query.extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url.to_string()
    }
}

/// Turns a [`ValidationRequest`] into a [`RequestDescriptor`].
///
/// Holds only immutable state, so one instance is shared by every gateway and
/// every concurrent call.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    credentials: Arc<CredentialStore>,
    endpoints: Arc<EndpointRegistry>,
}

impl RequestBuilder {
    pub fn new(credentials: Arc<CredentialStore>, endpoints: Arc<EndpointRegistry>) -> Self {
        Self {
            credentials,
            endpoints,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credentials.is_present()
    }

    pub fn build(&self, request: &ValidationRequest) -> Result<RequestDescriptor> {
        let credential = self.credentials.get().ok_or_else(|| {
            Error::configuration(format!(
                "API key not configured; cannot call {}",
                request.capability
            ))
        })?;

        // Blank values are rejected or dropped; others are sent as given.
        validate_non_empty(request.target.trim(), request.capability.target_param())?;

        let capability = request.capability;
        let mut params = vec![(capability.target_param(), request.target.clone())];
        for name in capability.optional_params() {
            if let Some(value) = request.options.get(*name) {
                if !value.trim().is_empty() {
                    params.push((*name, value.clone()));
                }
            }
        }

        Ok(RequestDescriptor {
            capability,
            url: self.endpoints.base_url(capability).clone(),
            credential: credential.clone(),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EndpointConfig;
    use pretty_assertions::assert_eq;

    fn builder(key: Option<&str>) -> RequestBuilder {
        RequestBuilder::new(
            Arc::new(CredentialStore::new(key.map(str::to_string))),
            Arc::new(EndpointRegistry::from_config(&EndpointConfig::default()).unwrap()),
        )
    }

    #[test]
    fn test_build_email_request() {
        let descriptor = builder(Some("k1"))
            .build(&ValidationRequest::new(
                Capability::EmailVerification,
                "thanos@snap.io",
            ))
            .unwrap();

        assert_eq!(
            descriptor.query_pairs(),
            vec![("api_key", "k1"), ("email", "thanos@snap.io")]
        );
        assert_eq!(
            descriptor.to_url().as_str(),
            "https://emailvalidation.abstractapi.com/v1/?api_key=k1&email=thanos%40snap.io"
        );
    }

    #[test]
    fn test_absent_credential_is_configuration_error() {
        let err = builder(None)
            .build(&ValidationRequest::new(Capability::EmailReputation, "x@y.com"))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_missing_country_is_not_sent() {
        let descriptor = builder(Some("k1"))
            .build(&ValidationRequest::new(
                Capability::PhoneValidation,
                "14152007986",
            ))
            .unwrap();

        assert!(!descriptor.has_param("country"));
        assert!(!descriptor.to_url().as_str().contains("country"));
    }

    #[test]
    fn test_target_is_sent_as_supplied() {
        let request = ValidationRequest::new(Capability::PhoneValidation, " +1 415 200 7986 ")
            .with_option("country", "US ");
        let descriptor = builder(Some("k1")).build(&request).unwrap();
        assert_eq!(
            descriptor.query_pairs(),
            vec![("api_key", "k1"), ("phone", " +1 415 200 7986 "), ("country", "US ")]
        );
    }

    #[test]
    fn test_empty_country_is_not_sent() {
        let request =
            ValidationRequest::new(Capability::PhoneValidation, "2007986").with_option("country", "");
        let descriptor = builder(Some("k1")).build(&request).unwrap();
        assert!(!descriptor.has_param("country"));
    }

    #[test]
    fn test_country_is_sent_when_supplied() {
        let request = ValidationRequest::new(Capability::PhoneValidation, "2007986")
            .with_option("country", "US");
        let descriptor = builder(Some("k1")).build(&request).unwrap();
        assert_eq!(
            descriptor.query_pairs(),
            vec![("api_key", "k1"), ("phone", "2007986"), ("country", "US")]
        );
    }

    #[test]
    fn test_unrecognized_options_are_dropped() {
        let request = ValidationRequest::new(Capability::EmailVerification, "a@b.io")
            .with_option("country", "US")
            .with_option("verbose", "true");
        let descriptor = builder(Some("k1")).build(&request).unwrap();
        assert_eq!(
            descriptor.query_pairs(),
            vec![("api_key", "k1"), ("email", "a@b.io")]
        );
    }

    #[test]
    fn test_empty_target_is_validation_error() {
        let err = builder(Some("k1"))
            .build(&ValidationRequest::new(Capability::EmailVerification, "  "))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let descriptor = builder(Some("k1"))
            .build(&ValidationRequest::new(
                Capability::EmailVerification,
                "a+b&c=d@x.io",
            ))
            .unwrap();
        let url = descriptor.to_url();
        assert_eq!(url.query(), Some("api_key=k1&email=a%2Bb%26c%3Dd%40x.io"));

        let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(decoded[1], ("email".to_string(), "a+b&c=d@x.io".to_string()));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = builder(Some("k1"));
        let request = ValidationRequest::new(Capability::PhoneValidation, "14152007986")
            .with_option("country", "US");
        let first = builder.build(&request).unwrap();
        let second = builder.build(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_url(), second.to_url());
    }

    #[test]
    fn test_redacted_url_hides_key() {
        let descriptor = builder(Some("secret-key"))
            .build(&ValidationRequest::new(Capability::EmailReputation, "x@y.com"))
            .unwrap();
        let redacted = descriptor.redacted_url();
        assert!(!redacted.contains("secret-key"));
        assert!(redacted.contains("api_key=***") || redacted.contains("api_key=%2A%2A%2A"));
    }
}
