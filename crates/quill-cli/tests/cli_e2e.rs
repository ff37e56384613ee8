//! End-to-end tests for the quill binary
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Command with `QUILL_HOME` pointed at a scratch directory
fn quill(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quill").expect("Failed to find quill binary");
    cmd.env("QUILL_HOME", temp.path()).env("RUST_LOG", "off");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("Failed to run quill");
    assert!(output.status.success(), "quill exited with {:?}", output.status);
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_classify_query_only() {
    let temp = TempDir::new().unwrap();
    let value = stdout_json(quill(&temp).args(["classify", "这份文档有什么问题？"]));
    assert_eq!(value["isQueryOnly"], Value::Bool(true));
    assert_eq!(value["needsPlanning"], Value::Bool(false));
}

#[test]
fn test_plan_creates_default_config_and_plans() {
    let temp = TempDir::new().unwrap();
    let value = stdout_json(quill(&temp).args([
        "plan",
        "首先把全文字体设置为宋体，然后调整行距，最后插入页码",
        "--confirm-steps",
    ]));

    assert!(temp.path().join("config.toml").exists());
    assert_eq!(value["complexity"]["complexity"], "complex");
    let steps = value["plan"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert!(steps.iter().all(|step| step["needsConfirmation"] == Value::Bool(true)));
}

#[test]
fn test_plan_for_simple_request_is_null() {
    let temp = TempDir::new().unwrap();
    let value = stdout_json(quill(&temp).args(["plan", "把标题加粗"]));
    assert!(value["plan"].is_null());
}

#[test]
fn test_review_plan_from_file() {
    let temp = TempDir::new().unwrap();
    let findings = temp.path().join("review.json");
    fs::write(
        &findings,
        r#"{"issues": [
            {"issue": "缺少页码", "index": 0},
            {"issue": "行距过小", "suggestion": "设为1.5倍", "index": 1}
        ]}"#,
    )
    .unwrap();

    let value = stdout_json(quill(&temp).args([
        "review-plan",
        "根据审查结果进行修改",
        "--findings",
        findings.to_str().unwrap(),
    ]));
    assert_eq!(value["source"], "review");
    assert_eq!(value["steps"][0]["toolName"], "word_insert_page_numbers");
    assert_eq!(value["steps"][1]["toolArgs"]["lineSpacing"], 1.5);
}

#[test]
fn test_review_plan_rejects_inquiry() {
    let temp = TempDir::new().unwrap();
    let findings = temp.path().join("review.json");
    fs::write(&findings, r#"{"issues": [{"issue": "缺少页码", "index": 0}]}"#).unwrap();

    quill(&temp)
        .args([
            "review-plan",
            "这些问题是什么意思？",
            "--findings",
            findings.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No actionable steps"));
}

#[test]
fn test_prompt_lists_findings() {
    let temp = TempDir::new().unwrap();
    let findings = temp.path().join("review.json");
    fs::write(&findings, r#"{"issues": [{"issue": "缺少页码", "index": 0}]}"#).unwrap();

    quill(&temp)
        .args(["prompt", "修复文档", "--summary", "A short report"])
        .args(["--findings", findings.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Known issues"))
        .stdout(predicate::str::contains("1. 缺少页码"))
        .stdout(predicate::str::contains("A short report"));
}

#[test]
fn test_simulate_halts_on_failing_tool() {
    let temp = TempDir::new().unwrap();
    let value = stdout_json(quill(&temp).args([
        "simulate",
        "首先把全文字体设置为宋体，然后调整行距，最后插入页码",
        "--fail",
        "word_set_paragraph_spacing",
    ]));

    assert_eq!(value["success"], Value::Bool(false));
    assert_eq!(value["stepResults"].as_array().unwrap().len(), 2);
    assert_eq!(value["report"]["totalSteps"], 3);
    assert_eq!(value["report"]["failedSteps"], 1);
}

#[test]
fn test_simulate_continue_on_error() {
    let temp = TempDir::new().unwrap();
    let value = stdout_json(quill(&temp).args([
        "simulate",
        "首先把全文字体设置为宋体，然后调整行距，最后插入页码",
        "--fail",
        "word_set_paragraph_spacing",
        "--continue-on-error",
    ]));

    assert_eq!(value["stepResults"].as_array().unwrap().len(), 3);
    assert_eq!(value["report"]["successfulSteps"], 2);
}

#[test]
fn test_simulate_verbose_logs_each_step() {
    let temp = TempDir::new().unwrap();
    quill(&temp)
        .env("RUST_LOG", "quill_orchestrator=info")
        .args([
            "simulate",
            "首先把全文字体设置为宋体，然后调整行距，最后插入页码",
            "--verbose",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("(word_set_font) completed"))
        .stderr(predicate::str::contains("Run finished: 3/3 succeeded"));
}

#[test]
fn test_style_plan() {
    let temp = TempDir::new().unwrap();
    let value = stdout_json(quill(&temp).args(["style", "academic"]));
    assert_eq!(value["steps"][0]["toolArgs"]["fontName"], "Times New Roman");
}

#[test]
fn test_explicit_config_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    fs::write(&config, "[execution]\ntimeout_ms = 1234\n").unwrap();

    let value = stdout_json(quill(&temp).args(["config", "--config", config.to_str().unwrap()]));
    assert_eq!(value["execution"]["timeout_ms"], 1234);
    assert!(!temp.path().join("config.toml").exists());
}
