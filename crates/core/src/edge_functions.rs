//! Edge Function deployment descriptors.
//!
//! An [`EdgeFunction`] turns into one `deploy_edge_function` tool call.
//! Functions deployed from this repository upload their `index.ts`; the
//! resale functions are redeployed by name from code the platform already
//! holds.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde_json::{json, Value};

use crate::batch::{Operation, OperationError};
use crate::error::CoreError;
use crate::tooling::invoker::ToolCall;

/// Tool that deploys a single Edge Function.
pub const DEPLOY_TOOL: &str = "deploy_edge_function";

/// Entry-point file every function directory must contain.
pub const ENTRYPOINT_FILE: &str = "index.ts";

/// Default per-function deploy timeout.
pub const DEFAULT_DEPLOY_TIMEOUT: Duration = Duration::from_secs(120);

/// Admin dashboard functions, uploaded from local source.
pub const ADMIN_FUNCTIONS: &[&str] = &[
    "admin-get-deposits",
    "admin-get-withdrawals",
    "admin-get-shipping",
    "admin-update-shipping",
];

/// Resale marketplace functions, redeployed by name.
pub const RESALE_FUNCTIONS: &[&str] = &[
    "create-resale",
    "list-resale-items",
    "purchase-resale",
    "cancel-resale",
];

/// Where a function's code comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionSource {
    /// Read `<functions_dir>/<name>/index.ts` and upload it.
    Upload { functions_dir: PathBuf },
    /// Deploy by name only.
    Remote,
}

/// A single Edge Function deployment.
#[derive(Debug, Clone)]
pub struct EdgeFunction {
    pub project_id: String,
    pub name: String,
    pub source: FunctionSource,
    pub timeout: Duration,
}

impl EdgeFunction {
    /// Local entry-point path, or `None` for remote deploys.
    pub fn entrypoint(&self) -> Option<PathBuf> {
        match &self.source {
            FunctionSource::Upload { functions_dir } => {
                Some(functions_dir.join(&self.name).join(ENTRYPOINT_FILE))
            }
            FunctionSource::Remote => None,
        }
    }

    /// Build the tool payload, embedding `code` when the function is uploaded.
    pub fn payload(&self, code: Option<&str>) -> Value {
        match code {
            Some(content) => json!({
                "project_id": self.project_id,
                "name": self.name,
                "files": [
                    { "name": ENTRYPOINT_FILE, "content": content }
                ],
            }),
            None => json!({
                "project_id": self.project_id,
                "name": self.name,
            }),
        }
    }
}

impl Operation for EdgeFunction {
    fn id(&self) -> String {
        self.name.clone()
    }

    async fn prepare(&self) -> Result<ToolCall, OperationError> {
        let code = match self.entrypoint() {
            Some(path) => Some(read_source(&path).await?),
            None => None,
        };
        Ok(ToolCall::new(
            DEPLOY_TOOL,
            self.payload(code.as_deref()),
            self.timeout,
        ))
    }
}

async fn read_source(path: &Path) -> Result<String, OperationError> {
    let display = path.to_string_lossy().to_string();
    match tokio::fs::read_to_string(path).await {
        Ok(code) => Ok(code),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(OperationError::MissingSource { path: display })
        }
        Err(source) => Err(OperationError::Unreadable {
            path: display,
            source,
        }),
    }
}

/// Named group of functions deployed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionSet {
    Admin,
    Resale,
}

impl FunctionSet {
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Admin => ADMIN_FUNCTIONS,
            Self::Resale => RESALE_FUNCTIONS,
        }
    }

    /// Build the deploy list for this set.
    pub fn functions(
        self,
        project_id: &str,
        functions_dir: &Path,
        timeout: Duration,
    ) -> Vec<EdgeFunction> {
        let source = match self {
            Self::Admin => FunctionSource::Upload {
                functions_dir: functions_dir.to_path_buf(),
            },
            Self::Resale => FunctionSource::Remote,
        };
        self.names()
            .iter()
            .map(|name| EdgeFunction {
                project_id: project_id.to_string(),
                name: (*name).to_string(),
                source: source.clone(),
                timeout,
            })
            .collect()
    }
}

impl FromStr for FunctionSet {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "resale" => Ok(Self::Resale),
            other => Err(CoreError::Validation(format!(
                "Unknown function set '{other}' (expected 'admin' or 'resale')"
            ))),
        }
    }
}

impl std::fmt::Display for FunctionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Resale => f.write_str("resale"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
