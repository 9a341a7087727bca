use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[source]
mode = "simulated"
read_timeout_ms = 10

[simulation]
emit_probability = 0.5
extent = 10
seed = 1

[refresh]
interval_ms = 100
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

/// Validate the per-cycle JSONL schema and the closing summary record.
#[rstest]
fn jsonl_tick_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("heatmap").unwrap();
    cmd.arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .arg("run")
        .arg("--ticks")
        .arg("4")
        .arg("--no-console")
        .arg("--out")
        .arg(dir.path().join("out"));

    let out = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&out);
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 5, "stdout was: {stdout}");

    for (i, r) in records[..4].iter().enumerate() {
        for key in ["timestamp", "tick", "outcome", "x", "y", "v", "rows", "cols", "notice"] {
            assert!(r.get(key).is_some(), "missing {key} in {r}");
        }
        assert_eq!(r["tick"], i as u64 + 1);
        let outcome = r["outcome"].as_str().unwrap();
        assert!(["applied", "idle", "rejected", "source_unavailable"].contains(&outcome));
        if outcome == "applied" {
            assert!(r["x"].is_u64() && r["y"].is_u64() && r["v"].is_f64());
        } else {
            assert!(r["x"].is_null());
        }
    }

    let summary = &records[4];
    assert_eq!(summary["stop"], "tick_budget");
    assert_eq!(summary["ticks"], 4);
}

/// With --json, errors are reported as a JSON object on stderr.
#[rstest]
fn jsonl_error_schema() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "[render]\nalpha = 3.0\n").unwrap();

    let mut cmd = Command::cargo_bin("heatmap").unwrap();
    cmd.arg("--json").arg("--config").arg(&cfg).arg("self-check");
    let out = cmd.assert().code(2).get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&out);
    let line = stderr
        .lines()
        .rev()
        .find(|l| l.contains("\"reason\""))
        .unwrap_or("");
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Config");
    assert_eq!(v["exit_code"], 2);
    assert!(v["message"].as_str().unwrap().contains("render.alpha"));
}
