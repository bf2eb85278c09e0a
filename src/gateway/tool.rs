//! Tool gateways: one per capability.
//!
//! A gateway turns typed tool arguments into a single upstream request and
//! returns either the provider document untouched or one classified error.
//! There is no caching and no deduplication: every accepted call issues
//! exactly one upstream request.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::capability::{Capability, EndpointRegistry};
use super::credential::CredentialStore;
use super::request::{RequestBuilder, ValidationRequest};
use super::transport::{HttpTransport, TransportInvoker};
use crate::types::{Error, GatewayConfig, Result};

// =============================================================================
// Typed arguments
// =============================================================================

/// Arguments of `verify_email`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyEmailArgs {
    pub email: String,
}

/// Arguments of `validate_phone`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidatePhoneArgs {
    pub phone: String,
    /// ISO 3166-1 alpha-2 country hint.
    #[serde(default)]
    pub country: Option<String>,
}

/// Arguments of `check_email_reputation`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckEmailReputationArgs {
    pub email: String,
}

impl From<VerifyEmailArgs> for ValidationRequest {
    fn from(args: VerifyEmailArgs) -> Self {
        ValidationRequest::new(Capability::EmailVerification, args.email)
    }
}

impl From<ValidatePhoneArgs> for ValidationRequest {
    fn from(args: ValidatePhoneArgs) -> Self {
        let request = ValidationRequest::new(Capability::PhoneValidation, args.phone);
        match args.country {
            Some(country) => request.with_option("country", country),
            None => request,
        }
    }
}

impl From<CheckEmailReputationArgs> for ValidationRequest {
    fn from(args: CheckEmailReputationArgs) -> Self {
        ValidationRequest::new(Capability::EmailReputation, args.email)
    }
}

/// Parse protocol arguments into a request. Unknown keys are ignored.
pub fn parse_arguments(capability: Capability, arguments: Value) -> Result<ValidationRequest> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };

    fn typed<T: serde::de::DeserializeOwned + Into<ValidationRequest>>(
        capability: Capability,
        arguments: Value,
    ) -> Result<ValidationRequest> {
        serde_json::from_value::<T>(arguments)
            .map(Into::into)
            .map_err(|e| Error::validation(format!("invalid arguments for {}: {}", capability, e)))
    }

    match capability {
        Capability::EmailVerification => typed::<VerifyEmailArgs>(capability, arguments),
        Capability::PhoneValidation => typed::<ValidatePhoneArgs>(capability, arguments),
        Capability::EmailReputation => typed::<CheckEmailReputationArgs>(capability, arguments),
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// Per-capability tool gateway.
#[derive(Debug, Clone)]
pub struct ToolGateway {
    capability: Capability,
    builder: Arc<RequestBuilder>,
    invoker: Arc<TransportInvoker>,
}

impl ToolGateway {
    pub fn new(
        capability: Capability,
        builder: Arc<RequestBuilder>,
        invoker: Arc<TransportInvoker>,
    ) -> Self {
        Self {
            capability,
            builder,
            invoker,
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn name(&self) -> &'static str {
        self.capability.tool_name()
    }

    /// Call with protocol arguments. Never cancelled.
    pub async fn call(&self, arguments: Value) -> Result<Value> {
        self.call_with_cancel(arguments, &CancellationToken::new())
            .await
    }

    /// Call with protocol arguments; firing `cancel` aborts the in-flight
    /// upstream request and yields [`Error::Cancelled`].
    pub async fn call_with_cancel(
        &self,
        arguments: Value,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let result = self.execute(arguments, cancel).await;
        match &result {
            Ok(_) => tracing::debug!(tool = self.name(), "Tool call succeeded"),
            Err(err) => tracing::warn!(
                tool = self.name(),
                kind = %err.kind(),
                status_code = err.status_code(),
                "Tool call failed: {}",
                err
            ),
        }
        result
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<Value> {
        if !self.builder.has_credential() {
            return Err(Error::configuration(format!(
                "API key not configured; cannot call {}",
                self.capability
            )));
        }
        let request = parse_arguments(self.capability, arguments)?;
        self.send(&request, cancel).await
    }

    /// Call with an already-typed request.
    pub async fn send(
        &self,
        request: &ValidationRequest,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        if request.capability != self.capability {
            return Err(Error::unexpected(format!(
                "{} request routed to {} gateway",
                request.capability, self.capability
            )));
        }

        let descriptor = self.builder.build(request)?;
        if cancel.is_cancelled() {
            return Err(Error::cancelled(format!("{} cancelled before dispatch", self.capability)));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(Error::cancelled(format!("{} cancelled while awaiting provider", self.capability)))
            }
            result = self.invoker.invoke(&descriptor) => result,
        }
    }
}

// =============================================================================
// Gateway set
// =============================================================================

/// The three gateways, sharing one builder and one invoker.
#[derive(Debug, Clone)]
pub struct GatewaySet {
    email_verification: ToolGateway,
    phone_validation: ToolGateway,
    email_reputation: ToolGateway,
}

impl GatewaySet {
    /// Build with the `reqwest` transport described by `config.transport`.
    pub fn from_config(config: &GatewayConfig, credentials: CredentialStore) -> Result<Self> {
        let invoker = TransportInvoker::from_config(&config.transport)?;
        Self::assemble(config, credentials, invoker)
    }

    /// Build with a caller-supplied transport.
    pub fn with_transport(
        config: &GatewayConfig,
        credentials: CredentialStore,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        Self::assemble(config, credentials, TransportInvoker::new(transport))
    }

    fn assemble(
        config: &GatewayConfig,
        credentials: CredentialStore,
        invoker: TransportInvoker,
    ) -> Result<Self> {
        let endpoints = EndpointRegistry::from_config(&config.endpoints)?;
        let builder = Arc::new(RequestBuilder::new(Arc::new(credentials), Arc::new(endpoints)));
        let invoker = Arc::new(invoker);
        let gateway = |capability| ToolGateway::new(capability, builder.clone(), invoker.clone());

        Ok(Self {
            email_verification: gateway(Capability::EmailVerification),
            phone_validation: gateway(Capability::PhoneValidation),
            email_reputation: gateway(Capability::EmailReputation),
        })
    }

    pub fn get(&self, capability: Capability) -> &ToolGateway {
        match capability {
            Capability::EmailVerification => &self.email_verification,
            Capability::PhoneValidation => &self.phone_validation,
            Capability::EmailReputation => &self.email_reputation,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolGateway> {
        Capability::ALL.into_iter().map(move |c| self.get(c))
    }

    pub async fn verify_email(&self, email: &str) -> Result<Value> {
        self.email_verification
            .call(serde_json::json!({ "email": email }))
            .await
    }

    pub async fn validate_phone(&self, phone: &str, country: Option<&str>) -> Result<Value> {
        self.phone_validation
            .call(serde_json::json!({ "phone": phone, "country": country }))
            .await
    }

    pub async fn check_email_reputation(&self, email: &str) -> Result<Value> {
        self.email_reputation
            .call(serde_json::json!({ "email": email }))
            .await
    }
}
