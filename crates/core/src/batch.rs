//! Sequential batch runner for tool-backed operations.
//!
//! A batch is a fixed, ordered list of [`Operation`]s. Each one is prepared
//! into a [`ToolCall`], handed to a [`ToolInvoker`], and classified as a
//! success or a [`FailureKind`]. The loop never stops early: every
//! operation is attempted and the aggregate lands in a [`BatchReport`].

use std::future::Future;

use serde::Serialize;

use crate::tooling::invoker::{ToolCall, ToolError, ToolInvoker};

/// Maximum stderr characters kept per failure.
pub const MAX_STDERR_CHARS: usize = 2_000;

/// Error raised while turning an operation into a tool call.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// A local file the operation depends on does not exist.
    #[error("Source file not found: {path}")]
    MissingSource { path: String },

    /// A local file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One unit of work in a batch.
pub trait Operation: Send + Sync {
    /// Identifier listed in the failure report.
    fn id(&self) -> String;

    /// One-line description for progress logs.
    fn summary(&self) -> String {
        self.id()
    }

    /// Build the tool call, reading any local inputs.
    fn prepare(&self) -> impl Future<Output = Result<ToolCall, OperationError>> + Send;
}

/// Why an operation counted as failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// Local input missing; the tool was never invoked.
    MissingSource { path: String },
    /// The tool ran and exited non-zero.
    NonZeroExit { exit_code: i32, stderr: String },
    /// The tool was killed after exceeding its timeout.
    Timeout { elapsed_ms: u64 },
    /// Anything else that stopped the invocation (spawn failure, unreadable input).
    Invocation { message: String },
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSource { path } => write!(f, "file not found: {path}"),
            Self::NonZeroExit { exit_code, stderr } if stderr.trim().is_empty() => {
                write!(f, "exit code {exit_code}")
            }
            Self::NonZeroExit { exit_code, stderr } => {
                write!(f, "exit code {exit_code}: {}", stderr.trim())
            }
            Self::Timeout { elapsed_ms } => write!(f, "timed out after {elapsed_ms}ms"),
            Self::Invocation { message } => write!(f, "{message}"),
        }
    }
}

impl From<OperationError> for FailureKind {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::MissingSource { path } => Self::MissingSource { path },
            other => Self::Invocation {
                message: other.to_string(),
            },
        }
    }
}

impl From<ToolError> for FailureKind {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Timeout { elapsed_ms } => Self::Timeout { elapsed_ms },
            ToolError::Io(e) => Self::Invocation {
                message: format!("failed to run tool: {e}"),
            },
        }
    }
}

/// A failed operation and its cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedOperation {
    pub id: String,
    pub cause: FailureKind,
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    /// Failed operations, in execution order.
    pub failures: Vec<FailedOperation>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit code: `0` when every operation succeeded, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    fn record_success(&mut self) {
        self.succeeded += 1;
    }

    fn record_failure(&mut self, id: String, cause: FailureKind) {
        self.failures.push(FailedOperation { id, cause });
    }
}

/// Run `operations` in order through `invoker`.
pub async fn run_batch<I, O>(invoker: &I, operations: &[O]) -> BatchReport
where
    I: ToolInvoker,
    O: Operation,
{
    let total = operations.len();
    let mut report = BatchReport {
        total,
        ..BatchReport::default()
    };

    for (index, operation) in operations.iter().enumerate() {
        let position = index + 1;
        let id = operation.id();
        tracing::info!(position, total, operation = %operation.summary(), "Running operation");

        match run_one(invoker, operation).await {
            Ok(duration_ms) => {
                tracing::info!(position, total, duration_ms, "Operation succeeded");
                report.record_success();
            }
            Err(cause) => {
                match &cause {
                    FailureKind::Timeout { elapsed_ms } => {
                        tracing::warn!(position, total, elapsed_ms, "Operation timed out");
                    }
                    FailureKind::MissingSource { path } => {
                        tracing::error!(position, total, path = %path, "Operation source missing");
                    }
                    FailureKind::NonZeroExit { exit_code, stderr } => {
                        tracing::error!(
                            position,
                            total,
                            exit_code,
                            stderr = %stderr.trim(),
                            "Operation failed"
                        );
                    }
                    FailureKind::Invocation { message } => {
                        tracing::error!(
                            position,
                            total,
                            error = %message,
                            "Operation raised an error"
                        );
                    }
                }
                report.record_failure(id, cause);
            }
        }
    }

    debug_assert_eq!(report.succeeded + report.failed(), report.total);
    report
}

/// Prepare and invoke a single operation, returning its duration on success.
async fn run_one<I, O>(invoker: &I, operation: &O) -> Result<u64, FailureKind>
where
    I: ToolInvoker,
    O: Operation,
{
    let call = operation.prepare().await?;
    let output = invoker.invoke(&call).await?;
    if output.succeeded() {
        Ok(output.duration_ms)
    } else {
        Err(FailureKind::NonZeroExit {
            exit_code: output.exit_code,
            stderr: truncate_chars(&output.stderr, MAX_STDERR_CHARS),
        })
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
