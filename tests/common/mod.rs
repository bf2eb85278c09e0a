//! Local mock of the validation provider, shared by integration tests.

#![allow(dead_code)]

use abstract_gateway::types::{EndpointConfig, GatewayConfig, TransportConfig};
use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned provider behaviour plus a record of what it received.
#[derive(Clone)]
pub struct MockProvider {
    status: StatusCode,
    body: String,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockProvider {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            delay: Duration::ZERO,
            hits: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// `(path, raw query)` of every request received, in arrival order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve on a random local port; returns a gateway config pointing at it.
    pub async fn start(&self) -> (SocketAddr, GatewayConfig) {
        let app = Router::new()
            .route("/email/", get(handle_email))
            .route("/phone/", get(handle_phone))
            .route("/reputation/", get(handle_reputation))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = GatewayConfig {
            endpoints: EndpointConfig {
                email_validation: format!("http://{}/email/", addr),
                phone_validation: format!("http://{}/phone/", addr),
                email_reputation: format!("http://{}/reputation/", addr),
            },
            transport: TransportConfig {
                timeout: Duration::from_secs(5),
                ..TransportConfig::default()
            },
        };
        (addr, config)
    }

    async fn respond(&self, path: &str, query: Option<String>) -> impl IntoResponse {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), query.unwrap_or_default()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body.clone(),
        )
    }
}

async fn handle_email(State(p): State<MockProvider>, RawQuery(q): RawQuery) -> impl IntoResponse {
    p.respond("/email/", q).await
}

async fn handle_phone(State(p): State<MockProvider>, RawQuery(q): RawQuery) -> impl IntoResponse {
    p.respond("/phone/", q).await
}

async fn handle_reputation(
    State(p): State<MockProvider>,
    RawQuery(q): RawQuery,
) -> impl IntoResponse {
    p.respond("/reputation/", q).await
}

/// Provider document for `thanos@snap.io`.
pub const THANOS_DOCUMENT: &str = r#"{"email":"thanos@snap.io","autocorrect":"","deliverability":"UNDELIVERABLE","quality_score":"0.00","is_valid_format":{"value":true,"text":"TRUE"},"is_free_email":{"value":false,"text":"FALSE"},"is_disposable_email":{"value":false,"text":"FALSE"},"is_role_email":{"value":false,"text":"FALSE"},"is_catchall_email":{"value":false,"text":"FALSE"},"is_mx_found":{"value":false,"text":"FALSE"},"is_smtp_valid":{"value":false,"text":"FALSE"}}"#;

/// Provider document for `14152007986`.
pub const PHONE_DOCUMENT: &str = r#"{"phone":"14152007986","valid":true,"format":{"international":"+14152007986","local":"(415) 200-7986"},"country":{"code":"US","name":"United States","prefix":"+1"},"location":"California","type":"mobile","carrier":"T-Mobile USA, Inc."}"#;
