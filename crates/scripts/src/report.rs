//! Human-readable stdout reports.
//!
//! Rendering returns `String`s so the binaries only decide *where* output
//! goes and tests can assert on exact text.

use std::fmt::Write;

use luckymart_core::batch::BatchReport;
use luckymart_core::i18n_scan::{ScanReport, MAX_MATCHES_PER_FILE};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Banner printed before a batch starts.
pub fn render_batch_header(title: &str, details: &[(&str, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{title}");
    for (label, value) in details {
        let _ = writeln!(out, "{label}: {value}");
    }
    let _ = write!(out, "{}", rule());
    out
}

/// Summary printed after a batch: counts, then every failed identifier.
pub fn render_batch_summary(title: &str, report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{title} complete");
    let _ = writeln!(out, "Succeeded: {}/{}", report.succeeded, report.total);
    let _ = writeln!(out, "Failed: {}/{}", report.failed(), report.total);

    if report.is_success() {
        let _ = writeln!(out, "All operations succeeded.");
    } else {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed operations:");
        for failure in &report.failures {
            let _ = writeln!(out, "  - {} ({})", failure.id, failure.cause);
        }
    }
    let _ = write!(out, "{}", rule());
    out
}

/// Scan findings grouped by file, capped at [`MAX_MATCHES_PER_FILE`] each.
pub fn render_scan_report(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Hardcoded Chinese Strings ===");

    for findings in &report.files {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", findings.path.display());
        let (shown, remaining) = findings.truncated(MAX_MATCHES_PER_FILE);
        for m in shown {
            let _ = writeln!(out, "  Line {}: {}", m.line_number, m.text);
        }
        if remaining > 0 {
            let _ = writeln!(out, "  ... and {remaining} more");
        }
    }

    let _ = writeln!(out);
    let _ = write!(
        out,
        "{} matches in {} of {} files",
        report.total_matches(),
        report.files.len(),
        report.files_scanned
    );
    out
}
