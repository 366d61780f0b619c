//! Environment-driven configuration for the batch binaries.

use std::path::PathBuf;
use std::time::Duration;

use luckymart_core::edge_functions::DEFAULT_DEPLOY_TIMEOUT;
use luckymart_core::migration::DEFAULT_MIGRATION_TIMEOUT;
use luckymart_core::tooling::mcp_cli::{McpCliInvoker, DEFAULT_MCP_CLI_BIN, DEFAULT_MCP_SERVER};

/// Default location of the Edge Function sources, relative to the repo root.
pub const DEFAULT_FUNCTIONS_DIR: &str = "supabase/functions";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a positive integer (got '{value}')")]
    Invalid { name: &'static str, value: String },
}

/// Settings shared by `deploy-functions` and `run-migration`.
#[derive(Debug, Clone)]
pub struct OpsConfig {
    /// Supabase project the tools act on.
    pub project_id: String,
    /// MCP client executable.
    pub mcp_cli_bin: String,
    /// MCP server name passed via `--server`.
    pub mcp_server: String,
    /// Directory holding `<function>/index.ts`.
    pub functions_dir: PathBuf,
    /// Per-function deploy timeout.
    pub deploy_timeout: Duration,
    /// Per-statement migration timeout.
    pub migration_timeout: Duration,
}

impl OpsConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default              |
    /// |--------------------------|----------------------|
    /// | `SUPABASE_PROJECT_ID`    | required             |
    /// | `MCP_CLI_BIN`            | `manus-mcp-cli`      |
    /// | `MCP_SERVER`             | `supabase`           |
    /// | `FUNCTIONS_DIR`          | `supabase/functions` |
    /// | `DEPLOY_TIMEOUT_SECS`    | `120`                |
    /// | `MIGRATION_TIMEOUT_SECS` | `30`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let project_id =
            get("SUPABASE_PROJECT_ID").ok_or(ConfigError::Missing("SUPABASE_PROJECT_ID"))?;
        let mcp_cli_bin = get("MCP_CLI_BIN").unwrap_or_else(|| DEFAULT_MCP_CLI_BIN.into());
        let mcp_server = get("MCP_SERVER").unwrap_or_else(|| DEFAULT_MCP_SERVER.into());
        let functions_dir = get("FUNCTIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FUNCTIONS_DIR));
        let deploy_timeout = parse_secs("DEPLOY_TIMEOUT_SECS", get("DEPLOY_TIMEOUT_SECS"))?
            .unwrap_or(DEFAULT_DEPLOY_TIMEOUT);
        let migration_timeout =
            parse_secs("MIGRATION_TIMEOUT_SECS", get("MIGRATION_TIMEOUT_SECS"))?
                .unwrap_or(DEFAULT_MIGRATION_TIMEOUT);

        Ok(Self {
            project_id,
            mcp_cli_bin,
            mcp_server,
            functions_dir,
            deploy_timeout,
            migration_timeout,
        })
    }

    pub fn invoker(&self) -> McpCliInvoker {
        McpCliInvoker::new(&self.mcp_cli_bin, &self.mcp_server)
    }
}

fn parse_secs(name: &'static str, raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}
