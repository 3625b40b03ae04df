//! CLI integration tests for nodectl
//!
//! Tests run against the built binary and a fake node CLI shim, so no
//! real node is needed anywhere. Skipped quietly when the binary has not
//! been built yet (same pattern as a fresh checkout).

use std::env;
use std::path::PathBuf;
use std::process::Command;

fn get_binary_path() -> PathBuf {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let root = PathBuf::from(manifest_dir).parent().unwrap().parent().unwrap().to_path_buf();
    let release = root.join("target/release/nodectl");
    if release.exists() {
        release
    } else {
        root.join("target/debug/nodectl")
    }
}

#[test]
fn help_lists_status_and_tunables() {
    let binary = get_binary_path();
    if !binary.exists() {
        eprintln!("nodectl binary not built; skipping");
        return;
    }

    let output = Command::new(&binary).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status"));
    assert!(stdout.contains("--min-connections"));
    assert!(stdout.contains("--readiness-attempts"));
}

#[cfg(unix)]
mod with_fake_node_cli {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    const FAKE_CLI: &str = r#"#!/bin/sh
# Fake node CLI: answer the four status verbs with canned payloads.
for arg in "$@"; do verb="$arg"; done
case "$verb" in
  getblockchaininfo)
    echo '{"blocks":800000,"headers":800000,"verificationprogress":1.0,"chain":"main","size_on_disk":500000000000,"pruned":false}' ;;
  getnetworkinfo)
    echo '{"version":270000,"subversion":"/Satoshi:27.0.0/","connections":12,"networks":[{"name":"ipv4"},{"name":"ipv6"}]}' ;;
  getmempoolinfo)
    echo '{"size":42,"bytes":1048576}' ;;
  uptime)
    echo '90061' ;;
  *)
    echo "error: unknown command" >&2; exit 1 ;;
esac
"#;

    fn write_fake_cli(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("fake-node-cli");
        fs::write(&path, FAKE_CLI).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn end_to_end_healthy_report() {
        let binary = get_binary_path();
        if !binary.exists() {
            eprintln!("nodectl binary not built; skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let fake_cli = write_fake_cli(dir.path());

        let output = Command::new(&binary)
            .args([
                "--cli-bin",
                fake_cli.to_str().unwrap(),
                "--datadir",
                dir.path().to_str().unwrap(),
                "--readiness-attempts",
                "3",
                "--readiness-interval-secs",
                "1",
                "status",
            ])
            .output()
            .unwrap();

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        assert!(stdout.contains("fully synced"));
        assert!(stdout.contains("465.66 GB"));
        assert!(stdout.contains("12 connections"));
    }

    #[test]
    fn end_to_end_json_report() {
        let binary = get_binary_path();
        if !binary.exists() {
            eprintln!("nodectl binary not built; skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let fake_cli = write_fake_cli(dir.path());

        let output = Command::new(&binary)
            .args([
                "--cli-bin",
                fake_cli.to_str().unwrap(),
                "--datadir",
                dir.path().to_str().unwrap(),
                "--readiness-attempts",
                "3",
                "--readiness-interval-secs",
                "1",
                "status",
                "--json",
            ])
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(report["chain"]["chain"], "main");
        assert_eq!(report["health"]["sync"]["state"], "fully_synced");
        assert_eq!(report["network"]["connections"], 12);
    }

    #[test]
    fn missing_cli_exits_one_with_suggestion() {
        let binary = get_binary_path();
        if !binary.exists() {
            eprintln!("nodectl binary not built; skipping");
            return;
        }

        let output = Command::new(&binary)
            .args([
                "--cli-bin",
                "definitely-not-a-real-node-cli-9931",
                "--readiness-attempts",
                "1",
                "--readiness-interval-secs",
                "1",
                "status",
            ])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Error:"));
        assert!(stderr.contains("Suggestion:"));
    }
}
