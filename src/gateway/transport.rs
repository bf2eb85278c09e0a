//! Transport invoker: one GET per call, status check, JSON decode.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::normalizer::{classify_reqwest, classify_status, decode_body};
use super::request::RequestDescriptor;
use crate::types::{Error, Result, TransportConfig};

/// Status and body of one upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs a single HTTP GET. Implementations must not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        if config.accept_invalid_certs {
            tracing::warn!(
                "TLS certificate verification is DISABLED for validation provider requests"
            );
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        // Errors are stripped of their URL: it carries the credential.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_reqwest(&e.without_url()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest(&e.without_url()))?;

        Ok(RawResponse { status, body })
    }
}

/// Executes request descriptors against an [`HttpTransport`].
#[derive(Clone)]
pub struct TransportInvoker {
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for TransportInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportInvoker").finish_non_exhaustive()
    }
}

impl TransportInvoker {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::new(config)?)))
    }

    /// Issue the request and return the decoded body unmodified.
    pub async fn invoke(&self, descriptor: &RequestDescriptor) -> Result<Value> {
        let url = descriptor.to_url();
        let started = Instant::now();
        tracing::debug!(
            capability = %descriptor.capability,
            url = %descriptor.redacted_url(),
            "Calling validation provider"
        );

        let response = self.transport.get(&url).await?;
        tracing::debug!(
            capability = %descriptor.capability,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Validation provider responded"
        );

        if let Some(err) = classify_status(response.status, &response.body) {
            return Err(err);
        }
        decode_body(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::capability::{Capability, EndpointRegistry};
    use crate::gateway::credential::CredentialStore;
    use crate::gateway::request::{RequestBuilder, ValidationRequest};
    use crate::types::{EndpointConfig, ErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    struct CannedTransport {
        response: RawResponse,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn get(&self, _url: &Url) -> Result<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    fn descriptor() -> RequestDescriptor {
        RequestBuilder::new(
            Arc::new(CredentialStore::new(Some("k".to_string()))),
            Arc::new(EndpointRegistry::from_config(&EndpointConfig::default()).unwrap()),
        )
        .build(&ValidationRequest::new(
            Capability::EmailVerification,
            "a@b.io",
        ))
        .unwrap()
    }

    fn invoker(status: u16, body: &'static str) -> (TransportInvoker, Arc<CannedTransport>) {
        let transport = Arc::new(CannedTransport {
            response: RawResponse::new(status, body),
            calls: AtomicUsize::new(0),
        });
        (TransportInvoker::new(transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_success_passes_body_through() {
        let body = r#"{"email":"a@b.io","deliverability":"DELIVERABLE","quality_score":"0.90"}"#;
        let (invoker, transport) = invoker(200, body);

        let value = invoker.invoke(&descriptor()).await.unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), body);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_http() {
        let (invoker, _) = invoker(500, "internal");
        let err = invoker.invoke(&descriptor()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamHttpError);
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let (invoker, _) = invoker(200, "not json");
        let err = invoker.invoke(&descriptor()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new(&TransportConfig {
            timeout: Duration::from_secs(2),
            ..TransportConfig::default()
        })
        .unwrap();
        let url = Url::parse(&format!("http://{}/v1/?api_key=secret", addr)).unwrap();

        let err = transport.get(&url).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_insecure_tls_is_logged() {
        let config = TransportConfig {
            accept_invalid_certs: true,
            ..TransportConfig::default()
        };
        ReqwestTransport::new(&config).unwrap();
        assert!(logs_contain("TLS certificate verification is DISABLED"));
    }
}
