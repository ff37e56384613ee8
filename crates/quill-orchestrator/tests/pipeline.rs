//! Request-to-result runs through the full pipeline.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

use std::sync::{Arc, Mutex};

use quill_core::QuillConfig;
use quill_orchestrator::{AssistantOrchestrator, ProgressUpdate};
use quill_planning::{ComplexityLevel, ReviewFinding, ReviewResult};
use quill_tooling::{FnTool, ToolError, ToolOutput, ToolRegistry};

const FORMATTING_REQUEST: &str = "首先把全文字体设置为宋体，然后调整行距，最后插入页码";

/// Registry whose tools record their own names into `calls`
fn recording_registry(names: &[&str], calls: &Arc<Mutex<Vec<String>>>) -> ToolRegistry {
    names.iter().fold(ToolRegistry::new(), |registry, name| {
        let calls = Arc::clone(calls);
        let tool_name = (*name).to_owned();
        registry.with_tool(Arc::new(FnTool::new(*name, move |_input| {
            let calls = Arc::clone(&calls);
            let tool_name = tool_name.clone();
            async move {
                calls.lock().unwrap().push(tool_name.clone());
                Ok::<_, ToolError>(ToolOutput::success(format!("{tool_name} done")))
            }
        })))
    })
}

#[tokio::test]
async fn test_complex_request_runs_every_planned_step() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = recording_registry(
        &["word_set_font", "word_set_paragraph_spacing", "word_insert_page_numbers"],
        &calls,
    );
    let orchestrator = AssistantOrchestrator::new(QuillConfig::default(), registry);

    let outcome = orchestrator.plan_request(FORMATTING_REQUEST);
    assert_eq!(outcome.complexity.complexity, ComplexityLevel::Complex);
    assert!(outcome.complexity.needs_planning);

    let updates = Mutex::new(Vec::<ProgressUpdate>::new());
    let record = |update: &ProgressUpdate| updates.lock().unwrap().push(update.clone());
    let result = orchestrator
        .process_request(FORMATTING_REQUEST, Some(&record))
        .await
        .unwrap()
        .unwrap();

    assert!(result.success);
    assert!(result.is_complete());
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "word_set_font".to_owned(),
            "word_set_paragraph_spacing".to_owned(),
            "word_insert_page_numbers".to_owned(),
        ]
    );
    let percentages: Vec<u8> = updates
        .lock()
        .unwrap()
        .iter()
        .map(|update| update.percentage)
        .collect();
    assert_eq!(percentages, vec![33, 66, 100]);
    assert_eq!(result.report.successful_steps, 3);
}

#[tokio::test]
async fn test_missing_tool_halts_under_default_config() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = recording_registry(&["word_set_font", "word_insert_page_numbers"], &calls);
    let orchestrator = AssistantOrchestrator::new(QuillConfig::default(), registry);

    let result = orchestrator
        .process_request(FORMATTING_REQUEST, None)
        .await
        .unwrap()
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.step_results.len(), 2);
    let failure = result.first_failure().unwrap();
    assert_eq!(failure.step_number, 2);
    assert_eq!(
        failure.error.as_deref(),
        Some("Tool not found: word_set_paragraph_spacing")
    );
    assert_eq!(*calls.lock().unwrap(), vec!["word_set_font".to_owned()]);
    assert_eq!(result.report.skipped_steps(), 1);
}

#[tokio::test]
async fn test_continue_on_error_attempts_remaining_steps() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = recording_registry(&["word_set_font", "word_insert_page_numbers"], &calls);
    let mut config = QuillConfig::default();
    config.execution.stop_on_error = false;
    let orchestrator = AssistantOrchestrator::new(config, registry);

    let result = orchestrator
        .process_request(FORMATTING_REQUEST, None)
        .await
        .unwrap()
        .unwrap();

    let outcomes: Vec<bool> = result.step_results.iter().map(|step| step.success).collect();
    assert_eq!(outcomes, vec![true, false, true]);
    assert_eq!(result.report.failed_steps, 1);
    assert!(!result.report.overall_success);
}

#[tokio::test]
async fn test_review_plan_prefers_registered_candidate_tool() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = recording_registry(&["word_insert_page_numbers", "word_add_comment"], &calls);
    let orchestrator = AssistantOrchestrator::new(QuillConfig::default(), registry);

    let review = ReviewResult {
        issues: vec![
            ReviewFinding::new(0, "缺少页码"),
            ReviewFinding::new(1, "结论部分论证不足").with_suggestion("补充数据支撑"),
        ],
        summary: None,
    };
    let plan = orchestrator
        .plan_review(&review, "根据审查结果进行修改")
        .unwrap();
    let result = orchestrator.execute_plan(&plan, None).await.unwrap();

    assert!(result.success);
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["word_insert_page_numbers".to_owned(), "word_add_comment".to_owned()]
    );
}
