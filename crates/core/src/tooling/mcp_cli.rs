//! Invoker for the MCP command-line client.
//!
//! Each [`ToolCall`] becomes
//! `<bin> tool call <tool> --server <server> --input <json>`.

use tokio::process::Command;

use super::invoker::{ToolCall, ToolError, ToolInvoker, ToolOutput};
use super::subprocess;

/// Default client binary, resolved through `PATH`.
pub const DEFAULT_MCP_CLI_BIN: &str = "manus-mcp-cli";

/// Default MCP server the tools are registered under.
pub const DEFAULT_MCP_SERVER: &str = "supabase";

/// Executes tool calls by shelling out to the MCP CLI.
#[derive(Debug, Clone)]
pub struct McpCliInvoker {
    bin: String,
    server: String,
}

impl McpCliInvoker {
    pub fn new(bin: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            server: server.into(),
        }
    }

    /// Argument vector for `call`, excluding the program itself.
    pub fn args(&self, call: &ToolCall) -> Vec<String> {
        vec![
            "tool".to_string(),
            "call".to_string(),
            call.tool.clone(),
            "--server".to_string(),
            self.server.clone(),
            "--input".to_string(),
            call.input.to_string(),
        ]
    }
}

impl Default for McpCliInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_MCP_CLI_BIN, DEFAULT_MCP_SERVER)
    }
}

impl ToolInvoker for McpCliInvoker {
    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(self.args(call));
        subprocess::run_command(&mut cmd, call.timeout).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
