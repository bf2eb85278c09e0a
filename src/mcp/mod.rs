//! Model Context Protocol surface.
//!
//! Line-delimited JSON-RPC 2.0 over any async reader/writer pair (stdin and
//! stdout in the binary). Serves `initialize`, `ping`, `tools/list` and
//! `tools/call`; honours `notifications/cancelled`.

pub mod protocol;
pub mod server;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::McpServer;
