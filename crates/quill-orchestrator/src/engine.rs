//! Sequential step execution against a tool registry.
//!
//! Steps run strictly one after another, each raced against the configured
//! timeout. Tool failures, missing tools, panics and timeouts all become a
//! failed [`StepResult`]; only structurally invalid input is returned as an
//! error.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::FutureExt as _;
use quill_core::{Error, Result, TaskPlan, TaskStep};
use quill_tooling::{ToolInput, ToolRegistry};
use serde_json::{Map, Value};
use tokio::time;
use tracing::{debug, info, warn};

use crate::types::{
    ExecutionReport, ExecutionStep, OrchestrationOptions, OrchestrationResult, ProgressUpdate,
    StepResult,
};

/// Observer invoked before each step runs
pub type ProgressCallback<'cb> = &'cb (dyn Fn(&ProgressUpdate) + Send + Sync);

/// Runs step lists against a registry.
#[derive(Clone)]
pub struct OrchestrationEngine {
    registry: ToolRegistry,
}

impl OrchestrationEngine {
    /// Creates an engine over `registry`
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// The registry tools are resolved from
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Checks a step list before execution.
    ///
    /// # Errors
    /// Returns [`Error::EmptyPlan`], [`Error::TooManySteps`],
    /// [`Error::MissingToolName`] or [`Error::MissingArguments`] for the first
    /// problem found.
    pub fn validate(steps: &[ExecutionStep], max_steps: usize) -> Result<()> {
        if steps.is_empty() {
            return Err(Error::EmptyPlan);
        }
        if steps.len() > max_steps {
            return Err(Error::TooManySteps {
                count: steps.len(),
                max: max_steps,
            });
        }
        for (index, step) in steps.iter().enumerate() {
            if step.tool_name.trim().is_empty() {
                return Err(Error::MissingToolName { step: index + 1 });
            }
            if !matches!(step.arguments, Some(Value::Object(_))) {
                return Err(Error::MissingArguments { step: index + 1 });
            }
        }
        Ok(())
    }

    /// Picks the tool a planned step should run with.
    ///
    /// The first candidate tool that is registered wins. When none is, the
    /// first candidate is kept so the failure names it.
    pub fn resolve_step(&self, step: &TaskStep) -> ExecutionStep {
        let mut resolved = ExecutionStep::from(step);
        if let Some(name) = step
            .candidate_tools()
            .into_iter()
            .find(|name| self.registry.contains(name))
        {
            name.clone_into(&mut resolved.tool_name);
        }
        resolved
    }

    /// Executes a plan's steps in order.
    ///
    /// # Errors
    /// Same as [`Self::execute_steps`].
    pub async fn execute_plan(
        &self,
        plan: &TaskPlan,
        progress: Option<ProgressCallback<'_>>,
        options: &OrchestrationOptions,
    ) -> Result<OrchestrationResult> {
        let steps: Vec<ExecutionStep> = plan
            .steps()
            .iter()
            .map(|step| self.resolve_step(step))
            .collect();
        info!("Executing plan {} ({})", plan.id(), plan.title());
        self.execute_steps(&steps, progress, options).await
    }

    /// Executes `steps` in order, one at a time.
    ///
    /// # Errors
    /// Returns a validation error when `options.validate_steps` is set and the
    /// step list is malformed. Nothing runs and no progress is reported in
    /// that case. Step failures are never returned as errors.
    pub async fn execute_steps(
        &self,
        steps: &[ExecutionStep],
        progress: Option<ProgressCallback<'_>>,
        options: &OrchestrationOptions,
    ) -> Result<OrchestrationResult> {
        if options.validate_steps {
            Self::validate(steps, options.max_steps)?;
        }

        let started = Instant::now();
        let total_steps = steps.len();
        let mut step_results = Vec::with_capacity(total_steps);
        debug!("Starting run of {total_steps} steps");

        for (index, step) in steps.iter().enumerate() {
            let step_number = index + 1;

            if let Some(callback) = progress {
                callback(&ProgressUpdate {
                    current_step: step_number,
                    total_steps,
                    step_description: step.description.clone(),
                    function_name: step.tool_name.clone(),
                    percentage: (step_number * 100 / total_steps) as u8,
                });
            }

            let result = self.run_step(step_number, step, options).await;
            let halt = !result.success && options.stop_on_error && !step.skip_on_error;

            if result.success {
                if options.verbose {
                    info!("Step {step_number}/{total_steps} ({}) completed", step.tool_name);
                } else {
                    debug!("Step {step_number}/{total_steps} ({}) completed", step.tool_name);
                }
            } else {
                warn!(
                    "Step {step_number}/{total_steps} ({}) failed: {}",
                    step.tool_name, result.message
                );
            }

            step_results.push(result);

            if halt {
                warn!(
                    "Stopping run after step {step_number}; {} steps not attempted",
                    total_steps - step_number
                );
                break;
            }
        }

        let report = ExecutionReport::from_results(total_steps, &step_results, started.elapsed());
        if options.verbose {
            info!(
                "Run finished: {}/{} succeeded, {} failed in {}ms",
                report.successful_steps,
                report.total_steps,
                report.failed_steps,
                report.total_execution_time_ms
            );
        }

        Ok(OrchestrationResult {
            success: report.overall_success,
            step_results,
            report,
        })
    }

    async fn run_step(
        &self,
        step_number: usize,
        step: &ExecutionStep,
        options: &OrchestrationOptions,
    ) -> StepResult {
        let started = Instant::now();

        let Some(tool) = self.registry.get_tool(&step.tool_name) else {
            return StepResult::failed(
                step_number,
                step,
                format!("Tool not found: {}", step.tool_name),
                None,
                started.elapsed(),
            );
        };

        let params = match &step.arguments {
            Some(Value::Object(map)) => map.clone(),
            None => Map::new(),
            Some(_) => {
                return StepResult::failed(
                    step_number,
                    step,
                    "Arguments must be a key/value mapping".to_owned(),
                    None,
                    started.elapsed(),
                );
            }
        };

        let invocation = AssertUnwindSafe(tool.execute(ToolInput::new(params))).catch_unwind();

        match time::timeout(options.timeout, invocation).await {
            Err(_elapsed) => StepResult::failed(
                step_number,
                step,
                format!("Step timed out after {}ms", options.timeout.as_millis()),
                None,
                started.elapsed(),
            ),
            Ok(Err(payload)) => StepResult::failed(
                step_number,
                step,
                format!("Tool panicked: {}", panic_message(payload.as_ref())),
                None,
                started.elapsed(),
            ),
            Ok(Ok(Err(err))) => StepResult::failed(
                step_number,
                step,
                err.to_string(),
                None,
                started.elapsed(),
            ),
            Ok(Ok(Ok(output))) if output.success => StepResult::completed(
                step_number,
                step,
                output.message,
                output.data,
                started.elapsed(),
            ),
            Ok(Ok(Ok(output))) => StepResult::failed(
                step_number,
                step,
                output.message,
                output.data,
                started.elapsed(),
            ),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
