//! Integration tests for the `find-untranslated` binary.

mod common;

use common::{run, Sandbox};

const BIN: &str = env!("CARGO_BIN_EXE_find-untranslated");

fn noisy_component() -> String {
    let mut source = String::from("import { toast } from \"sonner\";\n");
    for n in 1..=12 {
        source.push_str(&format!("  toast.error(\"错误{n}\");\n"));
    }
    source
}

/// Default roots are scanned relative to the working directory.
#[test]
fn scans_default_roots_and_caps_output() {
    let sandbox = Sandbox::new();
    sandbox.write("src/components/Wallet.tsx", &noisy_component());
    sandbox.write("src/pages/Home.tsx", "const title = t('home.title');\n");
    sandbox.write("src/contexts/Auth.ts", "throw new Error('登录失败');\n");
    sandbox.write("src/utils/format.ts", "const x = \"未扫描\";\n");

    let (code, stdout) = run(&mut sandbox.command(BIN));

    assert_eq!(code, 0, "stdout:\n{stdout}");
    assert!(stdout.contains("src/components/Wallet.tsx"));
    assert!(stdout.contains("  Line 2: 错误1"));
    assert!(stdout.contains("  Line 11: 错误10\n  ... and 2 more"));
    assert!(!stdout.contains("错误11"));
    assert!(stdout.contains("src/contexts/Auth.ts\n  Line 1: 登录失败"));
    assert!(!stdout.contains("Home.tsx"));
    assert!(!stdout.contains("未扫描"));
    assert!(stdout.contains("13 matches in 2 of 3 files"));
}

/// `--json` emits the full, untruncated report.
#[test]
fn json_output_is_complete() {
    let sandbox = Sandbox::new();
    sandbox.write("web/Wallet.tsx", &noisy_component());

    let (code, stdout) = run(sandbox.command(BIN).arg("--json").arg("web"));

    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("json report");
    assert_eq!(report["files_scanned"], 1);
    assert_eq!(report["files"][0]["matches"].as_array().expect("matches").len(), 12);
    assert_eq!(report["files"][0]["matches"][11]["text"], "错误12");
}

/// A mistyped flag is rejected instead of being scanned as a root.
#[test]
fn unknown_option_is_a_startup_failure() {
    let sandbox = Sandbox::new();
    sandbox.write("web/Wallet.tsx", &noisy_component());

    let (code, stdout) = run(sandbox.command(BIN).arg("--jsn").arg("web"));

    assert_eq!(code, 2);
    assert!(!stdout.contains("错误1"));
}
