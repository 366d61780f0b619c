//! Shared helpers for binary integration tests.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Stand-in for the MCP CLI.
///
/// Appends `<tool> <input-json>` to `$STUB_LOG` for every call. Exits `1`
/// when the input contains `$STUB_FAIL_PATTERN`, and sleeps when it
/// contains `$STUB_SLEEP_PATTERN`.
const STUB_CLI: &str = r#"#!/bin/bash
echo "$3 $7" >> "$STUB_LOG"
if [[ -n "$STUB_SLEEP_PATTERN" && "$7" == *"$STUB_SLEEP_PATTERN"* ]]; then
  sleep 10
fi
if [[ -n "$STUB_FAIL_PATTERN" && "$7" == *"$STUB_FAIL_PATTERN"* ]]; then
  echo "stub rejected $3" >&2
  exit 1
fi
echo '{"ok": true}'
"#;

/// A scratch workspace with a stub CLI installed.
pub struct Sandbox {
    pub dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let stub = dir.path().join("mcp-stub.sh");
        std::fs::write(&stub, STUB_CLI).expect("write stub");
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755))
            .expect("chmod stub");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn stub(&self) -> PathBuf {
        self.path().join("mcp-stub.sh")
    }

    pub fn log(&self) -> PathBuf {
        self.path().join("calls.log")
    }

    /// Every recorded tool call, one line each.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Base command for `bin` with a clean, sandbox-local environment.
    pub fn command(&self, bin: &str) -> Command {
        let mut cmd = Command::new(bin);
        cmd.current_dir(self.path())
            .env("RUST_LOG", "off")
            .env("SUPABASE_PROJECT_ID", "test-project")
            .env("MCP_CLI_BIN", self.stub())
            .env("STUB_LOG", self.log())
            .env_remove("MCP_SERVER")
            .env_remove("FUNCTIONS_DIR")
            .env_remove("DEPLOY_TIMEOUT_SECS")
            .env_remove("MIGRATION_TIMEOUT_SECS")
            .env_remove("STUB_FAIL_PATTERN")
            .env_remove("STUB_SLEEP_PATTERN");
        cmd
    }
}

pub fn run(cmd: &mut Command) -> (i32, String) {
    let Output { status, stdout, .. } = cmd.output().expect("run binary");
    (
        status.code().expect("exit code"),
        String::from_utf8_lossy(&stdout).into_owned(),
    )
}
