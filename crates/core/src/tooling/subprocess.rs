//! Subprocess execution with a bounded wait.
//!
//! [`run_command`] is the only place that spawns tool processes. Callers
//! build the [`tokio::process::Command`] (program + arguments) and hand it
//! over together with the timeout.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::invoker::{ToolError, ToolOutput};

/// Maximum stdout or stderr size captured per stream (10 MiB).
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Spawn `cmd`, capture stdout/stderr, and wait at most `timeout`.
///
/// Stdin is closed so an interactive prompt in the tool fails fast instead
/// of hanging until the timeout.
pub async fn run_command(cmd: &mut Command, timeout: Duration) -> Result<ToolOutput, ToolError> {
    // `kill_on_drop(true)` kills the child when it is dropped on timeout.
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();

    let mut child = cmd.spawn()?;

    // Drain both pipes concurrently with `child.wait()` (which borrows
    // `&mut child`) so a chatty tool cannot block on a full pipe.
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let mut stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let mut stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    // The deadline covers both pipes reaching EOF, not just the exit: a
    // background process left behind by the tool can hold them open.
    let finished = tokio::time::timeout(timeout, async {
        let status = child.wait().await?;
        let stdout_bytes = (&mut stdout_task).await.unwrap_or_default();
        let stderr_bytes = (&mut stderr_task).await.unwrap_or_default();
        Ok::<_, std::io::Error>((status, stdout_bytes, stderr_bytes))
    })
    .await;

    match finished {
        Ok(Ok((status, stdout_bytes, stderr_bytes))) => Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
            exit_code: status.code().unwrap_or(-1),
            duration_ms: start.elapsed().as_millis() as u64,
        }),
        Ok(Err(e)) => {
            stdout_task.abort();
            stderr_task.abort();
            Err(ToolError::Io(e))
        }
        Err(_elapsed) => {
            // `child` is dropped on return, which kills the process if it
            // is still running.
            stdout_task.abort();
            stderr_task.abort();
            Err(ToolError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
