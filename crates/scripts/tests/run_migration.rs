//! Integration tests for the `run-migration` binary.

mod common;

use common::{run, Sandbox};

const BIN: &str = env!("CARGO_BIN_EXE_run-migration");

/// The built-in list runs every statement in order.
#[test]
fn builtin_statements_all_succeed() {
    let sandbox = Sandbox::new();

    let (code, stdout) = run(&mut sandbox.command(BIN));

    assert_eq!(code, 0, "stdout:\n{stdout}");
    assert!(stdout.contains("Succeeded: 15/15"));

    let calls = sandbox.calls();
    assert_eq!(calls.len(), 15);
    assert!(calls.iter().all(|c| c.starts_with("execute_sql ")));
    assert!(calls[0].contains("winning_ticket_number"));
    assert!(calls[14].contains("idx_shipping_requested_at"));
}

/// One failing statement: exit 1, listed in the report, others still run.
#[test]
fn failed_statement_is_listed() {
    let sandbox = Sandbox::new();
    let script = sandbox.write(
        "migrations/create_missing_tables.sql",
        "-- tables used by the referral dashboard\n\
         CREATE TABLE IF NOT EXISTS referrals (id UUID PRIMARY KEY);\n\
         CREATE INDEX IF NOT EXISTS idx_broken_table ON broken_table(id);\n\
         CREATE INDEX IF NOT EXISTS idx_referrals_id ON referrals(id);\n",
    );

    let (code, stdout) = run(sandbox
        .command(BIN)
        .arg("--file")
        .arg(&script)
        .env("STUB_FAIL_PATTERN", "broken_table"));

    assert_eq!(code, 1, "stdout:\n{stdout}");
    assert!(stdout.contains("Succeeded: 2/3"));
    assert!(stdout.contains("Failed: 1/3"));
    assert!(stdout.contains(
        "  - CREATE INDEX IF NOT EXISTS idx_broken_table ON broken_table(id) \
         (exit code 1: stub rejected execute_sql)"
    ));
    assert_eq!(sandbox.calls().len(), 3);
}

/// A statement that hangs past `MIGRATION_TIMEOUT_SECS` fails on its own.
#[test]
fn statement_timeout_is_a_failure() {
    let sandbox = Sandbox::new();
    let script = sandbox.write("slow.sql", "SELECT pg_sleep(60);\nSELECT 1;\n");

    let (code, stdout) = run(sandbox
        .command(BIN)
        .arg("--file")
        .arg(&script)
        .env("MIGRATION_TIMEOUT_SECS", "1")
        .env("STUB_SLEEP_PATTERN", "pg_sleep"));

    assert_eq!(code, 1, "stdout:\n{stdout}");
    assert!(stdout.contains("Succeeded: 1/2"));
    assert!(stdout.contains("  - SELECT pg_sleep(60) (timed out after"));
}

#[test]
fn missing_script_is_a_startup_failure() {
    let sandbox = Sandbox::new();
    let (code, _) = run(sandbox.command(BIN).arg("--file").arg("nope.sql"));
    assert_eq!(code, 2);
    assert!(sandbox.calls().is_empty());
}

#[test]
fn unknown_argument_is_a_startup_failure() {
    let sandbox = Sandbox::new();
    let (code, _) = run(sandbox.command(BIN).arg("--rollback"));
    assert_eq!(code, 2);
}
