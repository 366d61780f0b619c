//! Tool call types and the invoker trait.
//!
//! Defines [`ToolInvoker`], the trait the batch runner drives, along with
//! [`ToolCall`], [`ToolOutput`], and [`ToolError`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One request to a named tool on the external CLI.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Tool name, e.g. `deploy_edge_function` or `execute_sql`.
    pub tool: String,
    /// JSON payload, passed to the CLI as a single `--input` argument.
    pub input: Value,
    /// Maximum wall-clock time before the process is killed.
    pub timeout: Duration,
}

impl ToolCall {
    pub fn new(tool: impl Into<String>, input: Value, timeout: Duration) -> Self {
        Self {
            tool: tool.into(),
            input,
            timeout,
        }
    }
}

/// Captured output from a finished tool process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ToolOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors that prevent a tool process from producing an exit status.
///
/// A process that runs and exits non-zero is not an error at this layer;
/// it is reported through [`ToolOutput::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The process exceeded its timeout and was killed.
    #[error("Tool timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed wall-clock time before the process was killed.
        elapsed_ms: u64,
    },

    /// Spawning or waiting on the process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait implemented by anything that can execute a [`ToolCall`].
pub trait ToolInvoker: Send + Sync {
    /// Run `call` to completion (or timeout).
    fn invoke(
        &self,
        call: &ToolCall,
    ) -> impl std::future::Future<Output = Result<ToolOutput, ToolError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
