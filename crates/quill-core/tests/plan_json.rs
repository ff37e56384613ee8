//! Wire shape of plans handed to hosts.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

use std::time::Duration;

use quill_core::{IssueType, PlanSource, RiskLevel, TaskPlan, TaskStep};
use serde_json::{Map, json};

fn sample_plan() -> TaskPlan {
    let mut args = Map::new();
    args.insert("lineSpacing".to_owned(), json!(1.5));

    let spacing = TaskStep::new("Set line spacing")
        .with_tool("word_set_paragraph_spacing")
        .with_args(args)
        .with_estimated_time(1_000)
        .with_issue_type(IssueType::Format);
    let rewrite = TaskStep::new("Rewrite the summary")
        .with_expected_tools(vec!["word_find_replace".to_owned()])
        .with_risk(RiskLevel::High)
        .with_estimated_time(2_500);

    TaskPlan::new("Tidy document", "调整行距并改写摘要", PlanSource::Dynamic, vec![spacing, rewrite])
        .unwrap()
}

#[test]
fn test_plan_serializes_for_hosts() {
    let plan = sample_plan();
    let value = serde_json::to_value(&plan).unwrap();

    assert_eq!(value["title"], json!("Tidy document"));
    assert_eq!(value["originalRequest"], json!("调整行距并改写摘要"));
    assert!(value.get("createdAt").is_some());
    assert!(value.get("sourceIssueCount").is_none());

    let first = &value["steps"][0];
    assert_eq!(first["toolName"], json!("word_set_paragraph_spacing"));
    assert_eq!(first["toolArgs"]["lineSpacing"], json!(1.5));
    assert_eq!(first["estimatedTime"], json!(1_000));
    assert_eq!(first["issueType"], json!("format"));
    assert_eq!(value["steps"][1]["riskLevel"], json!("high"));
}

#[test]
fn test_step_round_trips_through_json() {
    let plan = sample_plan();
    let encoded = serde_json::to_string(&plan.steps()[1]).unwrap();
    let decoded: TaskStep = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, plan.steps()[1]);
    assert_eq!(decoded.resolved_tool(), Some("word_find_replace"));
}

#[test]
fn test_plan_aggregates() {
    let plan = sample_plan();
    assert_eq!(plan.total_estimated_time(), Duration::from_millis(3_500));
    assert_eq!(plan.max_risk(), RiskLevel::High);
    assert!(plan.requires_confirmation());
    assert_eq!(plan.into_steps().len(), 2);
}

#[test]
fn test_confirmation_can_be_waived_on_high_risk_step() {
    let step = TaskStep::new("Delete blank pages")
        .with_tool("word_delete_blank_pages")
        .with_risk(RiskLevel::High)
        .with_confirmation(false);
    let plan = TaskPlan::new("Cleanup", "删除空白页", PlanSource::Dynamic, vec![step]).unwrap();
    assert_eq!(plan.max_risk(), RiskLevel::High);
    assert!(!plan.requires_confirmation());
}
