//! Plan execution for the quill document-editing assistant.
//!
//! This crate runs task plans against a [`quill_tooling::ToolRegistry`]:
//! - `OrchestrationEngine` executes steps sequentially with per-step timeouts
//! - `AssistantOrchestrator` ties classification, decomposition and execution together
//! - `builders` provides canned plans for common formatting jobs
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::float_cmp,
        reason = "Allow for tests"
    )
)]

/// Canned plan constructors.
pub mod builders;
/// Sequential execution engine.
pub mod engine;
/// Classify, plan and execute pipeline.
pub mod pipeline;
/// Options, progress and result types.
pub mod types;

pub use builders::{DocumentStyle, single_tool_plan, style_plan};
pub use engine::{OrchestrationEngine, ProgressCallback};
pub use pipeline::{AssistantOrchestrator, PlanningOutcome};
pub use types::{
    DEFAULT_MAX_STEPS, DEFAULT_STEP_TIMEOUT, ExecutionReport, ExecutionStep, OrchestrationOptions,
    OrchestrationResult, ProgressUpdate, StepResult, StepSummary,
};
