//! `run-migration` -- apply SQL statements one at a time through the MCP CLI.
//!
//! ```text
//! run-migration [--file PATH]
//! ```
//!
//! Without `--file` the built-in lottery/prize/shipping statements run.
//! Every statement is attempted even after a failure; the failed ones are
//! listed at the end. Exits `0` when all succeeded, `1` otherwise.

use std::path::PathBuf;

use anyhow::{bail, Context};
use luckymart_core::batch::run_batch;
use luckymart_core::migration::{self, LOTTERY_PRIZE_SHIPPING};
use luckymart_scripts::config::OpsConfig;
use luckymart_scripts::{logging, report, EXIT_STARTUP_FAILURE};

const USAGE: &str = "usage: run-migration [--file PATH]";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "run-migration aborted");
            eprintln!("{USAGE}");
            EXIT_STARTUP_FAILURE
        }
    };
    std::process::exit(code);
}

enum Source {
    Builtin,
    File(PathBuf),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<Source>> {
    let mut source = Source::Builtin;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--file" => {
                let path = args.next().context("--file requires a path")?;
                source = Source::File(PathBuf::from(path));
            }
            other => bail!("unexpected argument '{other}'"),
        }
    }
    Ok(Some(source))
}

async fn run() -> anyhow::Result<i32> {
    let Some(source) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(0);
    };

    let config = OpsConfig::from_env().context("invalid configuration")?;

    let (origin, queries) = match source {
        Source::Builtin => (
            "built-in".to_string(),
            LOTTERY_PRIZE_SHIPPING.iter().map(|q| q.to_string()).collect(),
        ),
        Source::File(path) => {
            let queries = migration::read_sql_script(&path).await?;
            (path.display().to_string(), queries)
        }
    };
    let statements = migration::statements(&config.project_id, &queries, config.migration_timeout);

    println!(
        "{}",
        report::render_batch_header(
            "Running database migration",
            &[
                ("Project", config.project_id.clone()),
                ("Source", origin),
                ("Statements", statements.len().to_string()),
            ],
        )
    );

    let batch = run_batch(&config.invoker(), &statements).await;

    println!("{}", report::render_batch_summary("Migration", &batch));
    Ok(batch.exit_code())
}
