//! `deploy-functions` -- deploy a set of Edge Functions through the MCP CLI.
//!
//! ```text
//! deploy-functions [admin|resale]
//! ```
//!
//! `admin` (the default) uploads `$FUNCTIONS_DIR/<name>/index.ts` for each
//! admin dashboard function; `resale` redeploys the resale functions by
//! name. Exits `0` when every function deployed, `1` otherwise. See
//! [`OpsConfig::from_env`] for the environment variables.

use anyhow::{bail, Context};
use luckymart_core::batch::run_batch;
use luckymart_core::edge_functions::FunctionSet;
use luckymart_scripts::config::OpsConfig;
use luckymart_scripts::{logging, report, EXIT_STARTUP_FAILURE};

const USAGE: &str = "usage: deploy-functions [admin|resale]";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "deploy-functions aborted");
            eprintln!("{USAGE}");
            EXIT_STARTUP_FAILURE
        }
    };
    std::process::exit(code);
}

async fn run() -> anyhow::Result<i32> {
    let mut args = std::env::args().skip(1);
    let set = match args.next().as_deref() {
        None => FunctionSet::Admin,
        Some("-h" | "--help") => {
            println!("{USAGE}");
            return Ok(0);
        }
        Some(flag) if flag.starts_with('-') => bail!("unknown option '{flag}'"),
        Some(arg) => arg.parse::<FunctionSet>()?,
    };
    if let Some(extra) = args.next() {
        bail!("unexpected argument '{extra}'");
    }

    let config = OpsConfig::from_env().context("invalid configuration")?;
    let functions = set.functions(
        &config.project_id,
        &config.functions_dir,
        config.deploy_timeout,
    );

    println!(
        "{}",
        report::render_batch_header(
            &format!("Deploying {set} Edge Functions"),
            &[
                ("Project", config.project_id.clone()),
                ("Functions", functions.len().to_string()),
            ],
        )
    );

    let batch = run_batch(&config.invoker(), &functions).await;

    println!("{}", report::render_batch_summary("Deployment", &batch));
    Ok(batch.exit_code())
}
