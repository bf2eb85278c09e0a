//! Abstract gateway MCP server - main entry point.
//!
//! Serves the validation tools over stdio:
//! - verify_email
//! - validate_phone
//! - check_email_reputation

use abstract_gateway::gateway::{CredentialStore, GatewaySet};
use abstract_gateway::mcp::McpServer;
use abstract_gateway::tools::ToolRegistry;
use abstract_gateway::types::API_KEY_ENV;
use abstract_gateway::Config;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "abstract-gateway", version, about = "Email and phone validation tools over MCP stdio")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "ABSTRACT_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Validation provider API key.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "ABSTRACT_GATEWAY_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Disable TLS certificate verification for provider requests.
    #[arg(long, env = "ABSTRACT_GATEWAY_INSECURE_TLS")]
    insecure_skip_tls_verify: bool,

    /// Override the email validation endpoint.
    #[arg(long)]
    email_url: Option<String>,

    /// Override the phone validation endpoint.
    #[arg(long)]
    phone_url: Option<String>,

    /// Override the email reputation endpoint.
    #[arg(long)]
    reputation_url: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<(Config, CredentialStore), Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        let transport = &mut config.gateway.transport;
        if let Some(secs) = self.timeout_secs {
            transport.timeout = Duration::from_secs(secs);
        }
        if self.insecure_skip_tls_verify {
            transport.accept_invalid_certs = true;
        }

        let endpoints = &mut config.gateway.endpoints;
        if let Some(url) = self.email_url {
            endpoints.email_validation = url;
        }
        if let Some(url) = self.phone_url {
            endpoints.phone_validation = url;
        }
        if let Some(url) = self.reputation_url {
            endpoints.email_reputation = url;
        }

        Ok((config, CredentialStore::new(self.api_key)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, credentials) = Cli::parse().into_config()?;

    abstract_gateway::observability::init_tracing(&config.observability);

    if !credentials.is_present() {
        tracing::warn!(
            "{} is not set; every tool call will fail with a configuration error",
            API_KEY_ENV
        );
    }

    let gateways = GatewaySet::from_config(&config.gateway, credentials)?;
    let server = McpServer::new(ToolRegistry::new(&gateways));

    tracing::info!(
        timeout = ?config.gateway.transport.timeout,
        tls_verify = !config.gateway.transport.accept_invalid_certs,
        "abstract-gateway starting on stdio"
    );

    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server.run(stdin, tokio::io::stdout()).await?;

    tracing::info!("abstract-gateway stopped");
    Ok(())
}
