use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result, bail};
use quill_core::{QuillConfig, TaskPlan};
use quill_orchestrator::{
    AssistantOrchestrator, DocumentStyle, OrchestrationEngine, OrchestrationOptions,
    ProgressUpdate, style_plan,
};
use quill_planning::{
    ComplexityClassifier, DecomposeOptions, RequestClassifier as _, ReviewResult, TaskDecomposer,
};
use quill_tooling::{FnTool, ToolError, ToolOutput, ToolRegistry};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Loads `path`, or the default config file when no path is given
pub fn load_config(path: Option<&Path>) -> Result<QuillConfig> {
    let config = match path {
        Some(path) => QuillConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => QuillConfig::load_or_create()?,
    };
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_review(path: &Path) -> Result<ReviewResult> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read findings from {}", path.display()))?;
    let review = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid review JSON in {}", path.display()))?;
    Ok(review)
}

pub fn handle_classify(request: &str) -> Result<()> {
    let result = ComplexityClassifier::new().classify(request);
    info!("Classified request as {}", result.complexity);
    print_json(&result)
}

pub fn handle_plan(
    mut config: QuillConfig,
    request: &str,
    max_steps: Option<usize>,
    confirm_steps: bool,
) -> Result<()> {
    if let Some(max) = max_steps {
        if max == 0 {
            bail!("--max-steps must be at least 1");
        }
        config.planning.max_steps = max;
    }
    if confirm_steps {
        config.planning.require_step_confirmation = true;
    }

    let orchestrator = AssistantOrchestrator::new(config, ToolRegistry::new());
    let outcome = orchestrator.plan_request(request);
    match &outcome.plan {
        Some(plan) => info!("Built plan '{}' with {} steps", plan.title(), plan.len()),
        None => info!("No plan needed ({})", outcome.complexity.complexity),
    }
    print_json(&outcome)
}

pub fn handle_review_plan(request: &str, findings: &Path) -> Result<()> {
    let review = read_review(findings)?;
    let Some(plan) = TaskDecomposer::new().decompose_from_review_results(&review, request) else {
        bail!("No actionable steps could be derived from {}", findings.display());
    };
    info!("Derived {} steps from {} findings", plan.len(), review.issues.len());
    print_json(&plan)
}

pub fn handle_prompt(request: &str, summary: Option<&str>, findings: Option<&Path>) -> Result<()> {
    let issues = match findings {
        Some(path) => read_review(path)?.issues,
        None => Vec::new(),
    };
    let prompt = TaskDecomposer::new().build_planning_prompt(request, summary, &issues);
    println!("{prompt}");
    Ok(())
}

pub fn handle_style(style: DocumentStyle) -> Result<()> {
    print_json(&style_plan(style))
}

pub fn handle_config(config: &QuillConfig) -> Result<()> {
    print_json(config)
}

/// Options for a dry run
pub struct SimulateArgs {
    pub timeout_ms: Option<u64>,
    pub continue_on_error: bool,
    pub verbose: bool,
    pub fail: Vec<String>,
}

pub async fn handle_simulate(config: &QuillConfig, request: &str, args: &SimulateArgs) -> Result<()> {
    let planning = DecomposeOptions::from(&config.planning);
    let Some(plan) = TaskDecomposer::new().decompose(request, &planning) else {
        bail!("No plan could be built for this request");
    };

    let mut options = OrchestrationOptions::from(&config.execution);
    if let Some(timeout_ms) = args.timeout_ms {
        options = options.with_timeout(Duration::from_millis(timeout_ms));
    }
    if args.continue_on_error {
        options = options.with_stop_on_error(false);
    }
    if args.verbose {
        options = options.with_verbose(true);
    }

    let engine = OrchestrationEngine::new(dry_run_registry(&plan, &args.fail));
    let report_progress = |update: &ProgressUpdate| {
        info!(
            "[{}/{}] {}% {} ({})",
            update.current_step,
            update.total_steps,
            update.percentage,
            update.step_description,
            update.function_name
        );
    };
    let result = engine
        .execute_plan(&plan, Some(&report_progress), &options)
        .await?;
    print_json(&result)
}

/// Registers an echoing tool for every tool the plan names.
///
/// Tools listed in `failing` report failure instead.
fn dry_run_registry(plan: &TaskPlan, failing: &[String]) -> ToolRegistry {
    let names: BTreeSet<&str> = plan
        .steps()
        .iter()
        .flat_map(|step| step.candidate_tools())
        .collect();

    names.into_iter().fold(ToolRegistry::new(), |registry, name| {
        let fails = failing.iter().any(|failing_name| failing_name == name);
        let tool_name = name.to_owned();
        registry.with_tool(Arc::new(FnTool::new(name, move |input| {
            let tool_name = tool_name.clone();
            async move {
                let started = Instant::now();
                let output = if fails {
                    ToolOutput::error(format!("{tool_name} failed (dry run)"))
                } else {
                    ToolOutput::success_with_data(
                        format!("{tool_name} (dry run)"),
                        Value::Object(input.params),
                    )
                };
                let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                Ok::<_, ToolError>(output.with_execution_time(elapsed))
            }
        })))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{PlanSource, TaskStep};

    #[test]
    fn test_dry_run_registry_covers_candidates() {
        let step = TaskStep::new("Fix")
            .with_tool("word_set_font")
            .with_expected_tools(vec!["word_format_text".to_owned()]);
        let plan = TaskPlan::new("Fix", "fix", PlanSource::Dynamic, vec![step]).unwrap();

        let registry = dry_run_registry(&plan, &[]);
        assert!(registry.contains("word_set_font"));
        assert!(registry.contains("word_format_text"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[planning]\nmax_steps = 3\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.planning.max_steps, 3);
    }
}
