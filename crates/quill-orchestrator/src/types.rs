use std::time::Duration;

use quill_core::{ExecutionConfig, TaskStep};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default per-step timeout
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);
/// Default upper bound on steps per run
pub const DEFAULT_MAX_STEPS: usize = 50;

/// Options for a single orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestrationOptions {
    /// Halt after the first failed step not marked `skip_on_error`
    pub stop_on_error: bool,
    /// Log per-step outcomes at info level
    pub verbose: bool,
    /// Time allowed for each tool invocation
    pub timeout: Duration,
    /// Reject structurally invalid step lists before running anything
    pub validate_steps: bool,
    /// Upper bound enforced by validation
    pub max_steps: usize,
}

impl Default for OrchestrationOptions {
    fn default() -> Self {
        Self {
            stop_on_error: true,
            verbose: false,
            timeout: DEFAULT_STEP_TIMEOUT,
            validate_steps: true,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl From<&ExecutionConfig> for OrchestrationOptions {
    fn from(config: &ExecutionConfig) -> Self {
        Self {
            stop_on_error: config.stop_on_error,
            verbose: config.verbose,
            timeout: Duration::from_millis(config.timeout_ms),
            validate_steps: config.validate_steps,
            max_steps: config.max_steps,
        }
    }
}

impl OrchestrationOptions {
    /// Sets the stop-on-error policy
    #[must_use]
    pub fn with_stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Sets the per-step timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables validation
    #[must_use]
    pub fn with_validation(mut self, validate_steps: bool) -> Self {
        self.validate_steps = validate_steps;
        self
    }

    /// Enables info-level per-step logging
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Progress notification sent before each step runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// One-based index of the step about to run
    pub current_step: usize,
    /// Number of steps in the run
    pub total_steps: usize,
    /// Description of the step about to run
    pub step_description: String,
    /// Tool the step invokes
    pub function_name: String,
    /// Share of the run reached by this step, 0 to 100
    pub percentage: u8,
}

/// A step as the engine consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    /// Human-readable summary
    pub description: String,
    /// Registry key of the tool to invoke
    pub tool_name: String,
    /// Tool arguments; must be a JSON object
    #[serde(default)]
    pub arguments: Option<Value>,
    /// Keep going after this step fails, even when stopping on error
    #[serde(default)]
    pub skip_on_error: bool,
}

impl ExecutionStep {
    /// Creates a step with an empty argument object
    pub fn new<D: Into<String>, T: Into<String>>(description: D, tool_name: T) -> Self {
        Self {
            description: description.into(),
            tool_name: tool_name.into(),
            arguments: Some(Value::Object(Map::new())),
            skip_on_error: false,
        }
    }

    /// Sets the arguments
    #[must_use]
    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = Some(arguments);
        self
    }

    /// Marks the step as non-fatal
    #[must_use]
    pub fn skip_on_error(mut self) -> Self {
        self.skip_on_error = true;
        self
    }
}

impl From<&TaskStep> for ExecutionStep {
    fn from(step: &TaskStep) -> Self {
        Self {
            description: step.description.clone(),
            tool_name: step.resolved_tool().unwrap_or_default().to_owned(),
            arguments: Some(Value::Object(step.tool_args.clone())),
            skip_on_error: false,
        }
    }
}

/// Outcome of one attempted step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// One-based position in the run
    pub step_number: usize,
    /// Step description
    pub description: String,
    /// Tool that was invoked
    pub tool_name: String,
    /// Whether the step completed
    pub success: bool,
    /// Tool message, or the reason the step failed
    pub message: String,
    /// Wall-clock time spent on the step in milliseconds
    pub duration_ms: u64,
    /// Failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Tool payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl StepResult {
    pub(crate) fn completed(
        step_number: usize,
        step: &ExecutionStep,
        message: String,
        data: Option<Value>,
        duration: Duration,
    ) -> Self {
        Self {
            step_number,
            description: step.description.clone(),
            tool_name: step.tool_name.clone(),
            success: true,
            message,
            duration_ms: millis(duration),
            error: None,
            data,
        }
    }

    pub(crate) fn failed(
        step_number: usize,
        step: &ExecutionStep,
        error: String,
        data: Option<Value>,
        duration: Duration,
    ) -> Self {
        Self {
            step_number,
            description: step.description.clone(),
            tool_name: step.tool_name.clone(),
            success: false,
            message: error.clone(),
            duration_ms: millis(duration),
            error: Some(error),
            data,
        }
    }
}

/// Per-step line of an execution report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    /// One-based position in the run
    pub step_number: usize,
    /// Tool that was invoked
    pub tool_name: String,
    /// Whether the step completed
    pub success: bool,
    /// Tool message or failure reason
    pub message: String,
    /// Milliseconds spent on the step
    pub duration_ms: u64,
    /// Failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&StepResult> for StepSummary {
    fn from(result: &StepResult) -> Self {
        Self {
            step_number: result.step_number,
            tool_name: result.tool_name.clone(),
            success: result.success,
            message: result.message.clone(),
            duration_ms: result.duration_ms,
            error: result.error.clone(),
        }
    }
}

/// Aggregate of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    /// Steps submitted to the run
    pub total_steps: usize,
    /// Steps that completed
    pub successful_steps: usize,
    /// Steps that failed
    pub failed_steps: usize,
    /// Wall-clock time of the whole run in milliseconds
    #[serde(rename = "totalExecutionTime")]
    pub total_execution_time_ms: u64,
    /// True when no attempted step failed
    pub overall_success: bool,
    /// One line per attempted step
    pub steps: Vec<StepSummary>,
}

impl ExecutionReport {
    pub(crate) fn from_results(total_steps: usize, results: &[StepResult], elapsed: Duration) -> Self {
        let successful_steps = results.iter().filter(|result| result.success).count();
        let failed_steps = results.len() - successful_steps;
        Self {
            total_steps,
            successful_steps,
            failed_steps,
            total_execution_time_ms: millis(elapsed),
            overall_success: failed_steps == 0,
            steps: results.iter().map(StepSummary::from).collect(),
        }
    }

    /// Steps never attempted because the run halted early
    pub fn skipped_steps(&self) -> usize {
        self.total_steps - self.successful_steps - self.failed_steps
    }
}

/// What `execute_steps` returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    /// True when no attempted step failed; steps never attempted do not count
    pub success: bool,
    /// Results of attempted steps, in order
    pub step_results: Vec<StepResult>,
    /// Aggregated report
    pub report: ExecutionReport,
}

impl OrchestrationResult {
    /// Whether every submitted step was attempted and succeeded
    pub fn is_complete(&self) -> bool {
        self.success && self.report.skipped_steps() == 0
    }

    /// First failed step, if any
    pub fn first_failure(&self) -> Option<&StepResult> {
        self.step_results.iter().find(|result| !result.success)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
