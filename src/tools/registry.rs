//! Tool registry: name → gateway dispatch for the calling protocol.

use serde_json::Value;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

use super::catalog::{ToolCatalog, ToolEntry};
use crate::gateway::{GatewaySet, ToolGateway};
use crate::types::{Error, Result};

/// Registered tools: metadata plus the gateway that executes each one.
#[derive(Debug)]
pub struct ToolRegistry {
    catalog: ToolCatalog,
    gateways: HashMap<String, ToolGateway>,
}

impl ToolRegistry {
    pub fn new(gateways: &GatewaySet) -> Self {
        let gateways: HashMap<String, ToolGateway> = gateways
            .iter()
            .map(|g| (g.name().to_string(), g.clone()))
            .collect();
        Self {
            catalog: ToolCatalog::for_capabilities(),
            gateways,
        }
    }

    /// Catalog entry of a registered tool.
    pub fn entry(&self, name: &str) -> Option<&ToolEntry> {
        self.catalog.get(name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Tool metadata, sorted by name.
    pub fn list(&self) -> Vec<&ToolEntry> {
        self.catalog.list_entries()
    }

    /// Route a call to the named tool's gateway.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Value,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let gateway = self
            .entry(name)
            .and_then(|entry| self.gateways.get(&entry.id))
            .ok_or_else(|| Error::validation(format!("Unknown tool: {}", name)))?;
        gateway.call_with_cancel(arguments, cancel).await
    }
}
