//! Task decomposition.
//!
//! Turns a request into a [`TaskPlan`] through one of three paths:
//! a pre-authored template, keyword-group decomposition, or a list of
//! findings from an earlier review pass. Every path returns `None` rather
//! than an empty plan when nothing actionable is found.

mod dynamic;
/// Argument extractors over free text
pub mod extract;
mod prompt;
mod review;
mod templates;

pub use review::{ReviewFinding, ReviewResult};

use quill_core::{PlanSource, PlanningConfig, TaskPlan, TaskStep};
use tracing::debug;

use crate::text::truncate_chars;

/// Characters of the request kept in a dynamic plan title
const TITLE_PREVIEW_CHARS: usize = 30;

/// Options for [`TaskDecomposer::decompose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposeOptions {
    /// Cap on dynamically decomposed steps
    pub max_steps: usize,
    /// Force confirmation on every step
    pub require_step_confirmation: bool,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            max_steps: 10,
            require_step_confirmation: false,
        }
    }
}

impl From<&PlanningConfig> for DecomposeOptions {
    fn from(config: &PlanningConfig) -> Self {
        Self {
            max_steps: config.max_steps,
            require_step_confirmation: config.require_step_confirmation,
        }
    }
}

impl DecomposeOptions {
    /// Sets the step cap
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets whether every step needs confirmation
    #[must_use]
    pub fn with_step_confirmation(mut self, required: bool) -> Self {
        self.require_step_confirmation = required;
        self
    }
}

/// Decomposes requests into plans
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskDecomposer;

#[allow(
    clippy::unused_self,
    reason = "Stateless; callers hold a decomposer value alongside the classifier"
)]
impl TaskDecomposer {
    /// Creates a new decomposer
    pub fn new() -> Self {
        Self
    }

    /// Plans `intent` from a matching template, falling back to keyword groups.
    ///
    /// Returns `None` when neither path finds anything to do.
    pub fn decompose(&self, intent: &str, options: &DecomposeOptions) -> Option<TaskPlan> {
        let lower = intent.to_lowercase();

        if let Some(template) = templates::find_template(&lower) {
            debug!("Request matched template {}", template.name);
            let steps: Vec<TaskStep> = template
                .steps()
                .iter()
                .map(|step| step.instantiate(options.require_step_confirmation))
                .collect();
            return TaskPlan::new(template.title, intent, PlanSource::Template, steps);
        }

        let steps = dynamic::steps_for(
            intent,
            options.max_steps,
            options.require_step_confirmation,
        );
        if steps.is_empty() {
            debug!("No template or keyword group matched");
            return None;
        }
        TaskPlan::new(
            format!(
                "Custom plan: {}",
                truncate_chars(intent, TITLE_PREVIEW_CHARS)
            ),
            intent,
            PlanSource::Dynamic,
            steps,
        )
    }

    /// Plans remediation for the findings of an earlier review.
    ///
    /// Returns `None` when `user_intent` only asks about the findings, when
    /// there are no findings, or when no finding yields a safe step.
    pub fn decompose_from_review_results(
        &self,
        review: &ReviewResult,
        user_intent: &str,
    ) -> Option<TaskPlan> {
        review::plan_from_review(review, user_intent)
    }

    /// Builds the remediation step for a single finding.
    ///
    /// Returns `None` when the finding needs a concrete target (style
    /// application, generic formatting) and none can be extracted.
    pub fn create_step_from_issue(&self, finding: &ReviewFinding) -> Option<TaskStep> {
        review::step_from_finding(finding)
    }

    /// Formats a planning prompt for a language model
    pub fn build_planning_prompt(
        &self,
        request: &str,
        summary: Option<&str>,
        findings: &[ReviewFinding],
    ) -> String {
        prompt::build(request, summary, findings)
    }
}
