//! MCP stdio server: read loop, concurrent tool calls, single writer.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::protocol::{
    tool_failure, tool_success, write_message, JsonRpcRequest, JsonRpcResponse,
    DEFAULT_PROTOCOL_VERSION, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::tools::ToolRegistry;
use crate::types::Result;
use crate::validation::str_field;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "abstract_api";

/// Responses buffered between call tasks and the writer.
const RESPONSE_CHANNEL_CAPACITY: usize = 64;

type InFlight = Arc<Mutex<HashMap<String, CancellationToken>>>;

/// MCP server exposing the registered validation tools.
#[derive(Debug)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    cancel: CancellationToken,
    in_flight: InFlight,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            cancel: CancellationToken::new(),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Request graceful shutdown. In-flight calls are cancelled and answered.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Serve until `reader` hits EOF or shutdown is requested, then drain
    /// outstanding calls.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::channel::<JsonRpcResponse>(RESPONSE_CHANNEL_CAPACITY);
        let mut tx = Some(tx);
        // Raw bytes: a line that is not UTF-8 is a parse error, not an I/O error.
        let mut buf = Vec::new();
        let mut reading = true;

        tracing::info!("MCP server ready ({} tools)", self.registry.list().len());

        loop {
            tokio::select! {
                _ = self.cancel.cancelled(), if reading => {
                    tracing::info!("MCP server shutting down");
                    reading = false;
                    tx = None;
                }
                read = reader.read_until(b'\n', &mut buf), if reading => {
                    let eof = read? == 0;
                    if let Some(sender) = &tx {
                        if let Some(response) = self.handle_line(&buf, sender) {
                            write_message(&mut writer, &response).await?;
                        }
                    }
                    buf.clear();
                    if eof {
                        tracing::debug!("stdin closed, draining in-flight calls");
                        reading = false;
                        tx = None;
                    }
                }
                Some(response) = rx.recv() => {
                    write_message(&mut writer, &response).await?;
                }
                else => break,
            }
        }

        Ok(())
    }

    /// Handle one input line. Returns an immediate response, if any; tool
    /// calls answer later through `tx`.
    fn handle_line(
        &self,
        line: &[u8],
        tx: &mpsc::Sender<JsonRpcResponse>,
    ) -> Option<JsonRpcResponse> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_slice(line) {
            Ok(req) => req,
            Err(e) => {
                tracing::debug!("Unparseable message: {}", e);
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    "Parse error",
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                "jsonrpc must be \"2.0\"",
            ));
        }

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(id, request.params.as_ref())),
            "ping" => Some(JsonRpcResponse::success(id, serde_json::json!({}))),
            "tools/list" => Some(self.handle_tools_list(id)),
            "tools/call" => self.handle_tools_call(id, request.params, tx),
            other => Some(JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    /// `notifications/initialized` and unknown notifications need no action.
    /// A cancelled call is untracked before its token fires, so it is never
    /// answered.
    fn handle_notification(&self, request: &JsonRpcRequest) {
        if request.method != "notifications/cancelled" {
            return;
        }
        let Some(request_id) = request.params.as_ref().and_then(|p| p.get("requestId")) else {
            return;
        };

        let key = request_id.to_string();
        let token = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&key);
        if let Some(token) = token {
            tracing::debug!(request_id = %key, "Cancelling tool call");
            token.cancel();
        }
    }

    fn handle_initialize(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let protocol_version = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": protocol_version,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools: Vec<Value> = self
            .registry
            .list()
            .into_iter()
            .map(|entry| {
                serde_json::json!({
                    "name": entry.id,
                    "description": entry.description,
                    "inputSchema": entry.input_schema(),
                })
            })
            .collect();

        JsonRpcResponse::success(id, serde_json::json!({ "tools": tools }))
    }

    fn handle_tools_call(
        &self,
        id: Value,
        params: Option<Value>,
        tx: &mpsc::Sender<JsonRpcResponse>,
    ) -> Option<JsonRpcResponse> {
        let params = params.unwrap_or(Value::Null);
        let name = match str_field(&params, "name") {
            Ok(name) => name,
            Err(e) => return Some(JsonRpcResponse::failure(id, INVALID_PARAMS, e.to_string())),
        };
        if !self.registry.has_tool(&name) {
            return Some(JsonRpcResponse::failure(
                id,
                INVALID_PARAMS,
                format!("Unknown tool: {}", name),
            ));
        }
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));

        let key = id.to_string();
        let token = self.cancel.child_token();
        {
            let mut in_flight = self
                .in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if in_flight.contains_key(&key) {
                return Some(JsonRpcResponse::failure(
                    id,
                    INVALID_REQUEST,
                    format!("Request id {} is already in flight", key),
                ));
            }
            in_flight.insert(key.clone(), token.clone());
        }

        let registry = self.registry.clone();
        let in_flight = self.in_flight.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = match registry.dispatch(&name, arguments, &token).await {
                Ok(document) => tool_success(&document),
                Err(err) => tool_failure(&err),
            };
            let tracked = in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .remove(&key)
                .is_some();
            if !tracked {
                tracing::debug!(
                    tool = %name,
                    request_id = %key,
                    "Cancelled by client; not answering"
                );
                return;
            }
            if tx.send(JsonRpcResponse::success(id, result)).await.is_err() {
                tracing::warn!(tool = %name, "Response dropped: writer closed");
            }
        });

        None
    }
}
