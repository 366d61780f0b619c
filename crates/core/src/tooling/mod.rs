//! External tool invocation.
//!
//! Every deployment and migration step is a single call to the MCP
//! command-line client. [`invoker`] defines the call/result types and the
//! [`invoker::ToolInvoker`] seam, [`subprocess`] owns spawn + timeout
//! handling, and [`mcp_cli`] wires the two together for the real CLI.

pub mod invoker;
pub mod mcp_cli;
pub mod subprocess;
