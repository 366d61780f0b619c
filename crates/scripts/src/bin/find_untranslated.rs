//! `find-untranslated` -- list hardcoded Chinese string literals.
//!
//! ```text
//! find-untranslated [--json] [ROOT...]
//! ```
//!
//! Scans `src/pages`, `src/contexts`, and `src/components` unless roots are
//! given. The report is informational and always exits `0`.

use anyhow::bail;
use luckymart_core::i18n_scan::{self, ScanOptions};
use luckymart_scripts::{logging, report, EXIT_STARTUP_FAILURE};

const USAGE: &str = "usage: find-untranslated [--json] [ROOT...]";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "find-untranslated aborted");
            eprintln!("{USAGE}");
            EXIT_STARTUP_FAILURE
        }
    };
    std::process::exit(code);
}

async fn run() -> anyhow::Result<i32> {
    let mut json = false;
    let mut roots = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(0);
            }
            "--json" => json = true,
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'"),
            _ => roots.push(arg),
        }
    }

    let options = if roots.is_empty() {
        ScanOptions::default()
    } else {
        ScanOptions::with_roots(roots)
    };

    let scan = i18n_scan::scan(&options).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&scan)?);
    } else {
        println!("{}", report::render_scan_report(&scan));
    }
    Ok(0)
}
