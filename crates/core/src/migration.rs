//! Schema migrations applied one SQL statement at a time.
//!
//! Each [`SqlStatement`] becomes one `execute_sql` tool call. The built-in
//! [`LOTTERY_PRIZE_SHIPPING`] list is the schema change for lottery draws,
//! prizes, and prize shipping; [`split_sql_script`] runs an arbitrary `.sql`
//! file the same way.

use std::path::Path;
use std::time::Duration;

use serde_json::json;

use crate::batch::{Operation, OperationError};
use crate::error::CoreError;
use crate::tooling::invoker::ToolCall;

/// Tool that executes one SQL statement.
pub const EXECUTE_SQL_TOOL: &str = "execute_sql";

/// Default per-statement timeout.
pub const DEFAULT_MIGRATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters of SQL shown in progress lines.
pub const PREVIEW_CHARS: usize = 60;

/// Lottery draw results, prizes, and shipping. Every statement is
/// idempotent, so the list can be re-run after a partial failure.
pub const LOTTERY_PRIZE_SHIPPING: &[&str] = &[
    "ALTER TABLE lotteries ADD COLUMN IF NOT EXISTS winning_ticket_number INTEGER",
    "ALTER TABLE lotteries ADD COLUMN IF NOT EXISTS winning_user_id UUID",
    "ALTER TABLE lotteries ADD COLUMN IF NOT EXISTS vrf_proof TEXT",
    "ALTER TABLE lotteries ADD COLUMN IF NOT EXISTS vrf_timestamp BIGINT",
    "ALTER TABLE lotteries ADD COLUMN IF NOT EXISTS draw_time TIMESTAMP WITH TIME ZONE",
    r#"CREATE TABLE IF NOT EXISTS prizes (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        lottery_id UUID NOT NULL,
        user_id UUID NOT NULL,
        ticket_id UUID,
        winning_code VARCHAR(50) NOT NULL,
        prize_name VARCHAR(255) NOT NULL,
        prize_image TEXT,
        prize_value DECIMAL(15, 2) NOT NULL DEFAULT 0,
        status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
        won_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        processed_at TIMESTAMP WITH TIME ZONE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_prizes_user_id ON prizes(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_prizes_lottery_id ON prizes(lottery_id)",
    "CREATE INDEX IF NOT EXISTS idx_prizes_status ON prizes(status)",
    "CREATE INDEX IF NOT EXISTS idx_prizes_won_at ON prizes(won_at DESC)",
    r#"CREATE TABLE IF NOT EXISTS shipping (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        prize_id UUID NOT NULL,
        user_id UUID NOT NULL,
        recipient_name VARCHAR(100) NOT NULL,
        recipient_phone VARCHAR(20) NOT NULL,
        recipient_address TEXT NOT NULL,
        recipient_city VARCHAR(100),
        recipient_region VARCHAR(100),
        recipient_postal_code VARCHAR(20),
        recipient_country VARCHAR(50) DEFAULT 'Tajikistan',
        shipping_method VARCHAR(50),
        tracking_number VARCHAR(100),
        shipping_company VARCHAR(100),
        shipping_cost DECIMAL(10, 2) DEFAULT 0,
        status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
        requested_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        shipped_at TIMESTAMP WITH TIME ZONE,
        delivered_at TIMESTAMP WITH TIME ZONE,
        notes TEXT,
        admin_notes TEXT,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_shipping_prize_id ON shipping(prize_id)",
    "CREATE INDEX IF NOT EXISTS idx_shipping_user_id ON shipping(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_shipping_status ON shipping(status)",
    "CREATE INDEX IF NOT EXISTS idx_shipping_requested_at ON shipping(requested_at DESC)",
];

/// One SQL statement to execute against the project database.
#[derive(Debug, Clone)]
pub struct SqlStatement {
    pub project_id: String,
    pub query: String,
    pub timeout: Duration,
}

impl SqlStatement {
    pub fn new(project_id: impl Into<String>, query: impl Into<String>, timeout: Duration) -> Self {
        Self {
            project_id: project_id.into(),
            query: query.into(),
            timeout,
        }
    }
}

impl Operation for SqlStatement {
    /// The statement collapsed onto a single line.
    fn id(&self) -> String {
        self.query.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn summary(&self) -> String {
        let one_line = self.id();
        let preview: String = one_line.chars().take(PREVIEW_CHARS).collect();
        format!("{preview}...")
    }

    async fn prepare(&self) -> Result<ToolCall, OperationError> {
        Ok(ToolCall::new(
            EXECUTE_SQL_TOOL,
            json!({
                "project_id": self.project_id,
                "query": self.query,
            }),
            self.timeout,
        ))
    }
}

/// Build statements for `project_id` from raw SQL strings, in order.
pub fn statements<S: AsRef<str>>(
    project_id: &str,
    queries: &[S],
    timeout: Duration,
) -> Vec<SqlStatement> {
    queries
        .iter()
        .map(|q| SqlStatement::new(project_id, q.as_ref(), timeout))
        .collect()
}

/// Split a SQL script into individual statements.
///
/// Full-line `--` comments are dropped before splitting on `;`. Semicolons
/// inside string literals or function bodies are not understood, so scripts
/// with `DO $$ ... $$` blocks must be run another way.
pub fn split_sql_script(script: &str) -> Vec<String> {
    let without_comments: String = script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and split a SQL script from disk.
pub async fn read_sql_script(path: &Path) -> Result<Vec<String>, CoreError> {
    let script = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CoreError::Io {
            path: path.to_string_lossy().to_string(),
            source,
        })?;
    Ok(split_sql_script(&script))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn builtin_list_is_idempotent() {
        assert_eq!(LOTTERY_PRIZE_SHIPPING.len(), 15);
        assert!(LOTTERY_PRIZE_SHIPPING
            .iter()
            .all(|sql| sql.contains("IF NOT EXISTS")));
    }

    #[tokio::test]
    async fn statement_payload_carries_project_and_query() {
        let stmt = SqlStatement::new(
            "proj-123",
            "CREATE INDEX IF NOT EXISTS idx_prizes_status ON prizes(status)",
            DEFAULT_MIGRATION_TIMEOUT,
        );
        let call = stmt.prepare().await.expect("prepare");
        assert_eq!(call.tool, EXECUTE_SQL_TOOL);
        assert_eq!(call.timeout, Duration::from_secs(30));
        assert_eq!(call.input["project_id"], "proj-123");
        assert_eq!(
            call.input["query"],
            "CREATE INDEX IF NOT EXISTS idx_prizes_status ON prizes(status)"
        );
    }

    #[test]
    fn id_collapses_multiline_statements() {
        let stmt = SqlStatement::new(
            "p",
            "CREATE TABLE t (\n    id UUID,\n    name TEXT\n)",
            DEFAULT_MIGRATION_TIMEOUT,
        );
        assert_eq!(stmt.id(), "CREATE TABLE t ( id UUID, name TEXT )");
    }

    #[test]
    fn summary_previews_first_sixty_chars() {
        let stmt = SqlStatement::new("p", LOTTERY_PRIZE_SHIPPING[4], DEFAULT_MIGRATION_TIMEOUT);
        let summary = stmt.summary();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), PREVIEW_CHARS + 3);
        assert!(summary.starts_with("ALTER TABLE lotteries ADD COLUMN IF NOT EXISTS draw_time"));
    }

    #[test]
    fn split_drops_comments_and_empty_statements() {
        let script = "\
-- create tables
CREATE TABLE a (id INT);
  -- indented comment
CREATE INDEX idx_a ON a(id);

;
";
        assert_eq!(
            split_sql_script(script),
            vec!["CREATE TABLE a (id INT)", "CREATE INDEX idx_a ON a(id)"]
        );
    }

    #[test]
    fn split_keeps_statement_after_comment_line() {
        let script = "-- note\nALTER TABLE a ADD COLUMN b INT";
        assert_eq!(split_sql_script(script), vec!["ALTER TABLE a ADD COLUMN b INT"]);
    }

    #[tokio::test]
    async fn read_script_missing_file_is_io_error() {
        let result = read_sql_script(Path::new("/nonexistent/create_missing_tables.sql")).await;
        assert_matches!(
            result,
            Err(CoreError::Io { path, .. }) if path.contains("create_missing_tables")
        );
    }

    #[test]
    fn statements_preserve_order() {
        let stmts = statements("p", LOTTERY_PRIZE_SHIPPING, DEFAULT_MIGRATION_TIMEOUT);
        assert_eq!(stmts.len(), LOTTERY_PRIZE_SHIPPING.len());
        assert!(stmts[5].query.starts_with("CREATE TABLE IF NOT EXISTS prizes"));
        assert!(stmts[10].query.starts_with("CREATE TABLE IF NOT EXISTS shipping"));
    }
}
