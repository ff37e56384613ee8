//! Request pipeline: classify, decompose, execute.

use std::sync::Arc;

use quill_core::{QuillConfig, Result, TaskPlan};
use quill_planning::{
    ComplexityClassifier, ComplexityResult, DecomposeOptions, RequestClassifier, ReviewResult,
    TaskDecomposer,
};
use quill_tooling::ToolRegistry;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::{OrchestrationEngine, ProgressCallback};
use crate::types::{OrchestrationOptions, OrchestrationResult};

/// Verdict and plan for a request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningOutcome {
    /// Classifier verdict
    pub complexity: ComplexityResult,
    /// Plan, when one was warranted and could be built
    pub plan: Option<TaskPlan>,
}

/// Coordinates the classifier, decomposer and engine.
pub struct AssistantOrchestrator {
    config: QuillConfig,
    classifier: Arc<dyn RequestClassifier>,
    decomposer: TaskDecomposer,
    engine: OrchestrationEngine,
}

impl AssistantOrchestrator {
    /// Creates a pipeline over `registry` with the keyword classifier
    pub fn new(config: QuillConfig, registry: ToolRegistry) -> Self {
        Self {
            config,
            classifier: Arc::new(ComplexityClassifier::new()),
            decomposer: TaskDecomposer::new(),
            engine: OrchestrationEngine::new(registry),
        }
    }

    /// Replaces the classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn RequestClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &QuillConfig {
        &self.config
    }

    /// The execution engine
    pub fn engine(&self) -> &OrchestrationEngine {
        &self.engine
    }

    /// Classifies a request
    pub fn analyze_request(&self, request: &str) -> ComplexityResult {
        self.classifier.classify(request)
    }

    /// Classifies a request and plans it when planning is warranted
    pub fn plan_request(&self, request: &str) -> PlanningOutcome {
        let complexity = self.analyze_request(request);

        let plan = if complexity.is_query_only || !complexity.needs_planning {
            debug!("Request does not need a plan ({})", complexity.complexity);
            None
        } else {
            let options = DecomposeOptions::from(&self.config.planning);
            self.decomposer.decompose(request, &options)
        };

        PlanningOutcome { complexity, plan }
    }

    /// Plans remediation for an earlier review's findings
    pub fn plan_review(&self, review: &ReviewResult, request: &str) -> Option<TaskPlan> {
        self.decomposer.decompose_from_review_results(review, request)
    }

    /// Executes a plan with the configured execution options.
    ///
    /// # Errors
    /// Returns a validation error when the plan's steps are malformed.
    pub async fn execute_plan(
        &self,
        plan: &TaskPlan,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<OrchestrationResult> {
        let options = OrchestrationOptions::from(&self.config.execution);
        self.engine.execute_plan(plan, progress, &options).await
    }

    /// Plans and executes a request end to end.
    ///
    /// Returns `Ok(None)` when the request gets no plan; the caller should
    /// answer it without tools.
    ///
    /// # Errors
    /// Returns a validation error when the planned steps are malformed.
    pub async fn process_request(
        &self,
        request: &str,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<Option<OrchestrationResult>> {
        let PlanningOutcome { plan, .. } = self.plan_request(request);
        let Some(plan) = plan else {
            return Ok(None);
        };
        info!("Planned {} steps for request", plan.len());
        self.execute_plan(&plan, progress).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_planning::{ComplexityLevel, ReviewFinding};

    struct AlwaysPlan;

    impl RequestClassifier for AlwaysPlan {
        fn classify(&self, _request: &str) -> ComplexityResult {
            let mut result = ComplexityClassifier::new().classify("首先统一全文字体，然后调整行距");
            result.complexity = ComplexityLevel::Complex;
            result.needs_planning = true;
            result.is_query_only = false;
            result
        }
    }

    fn pipeline() -> AssistantOrchestrator {
        AssistantOrchestrator::new(QuillConfig::default(), ToolRegistry::new())
    }

    #[test]
    fn test_query_gets_no_plan() {
        let outcome = pipeline().plan_request("这份文档有什么问题？");
        assert!(outcome.complexity.is_query_only);
        assert!(outcome.plan.is_none());
    }

    #[test]
    fn test_simple_request_gets_no_plan() {
        let outcome = pipeline().plan_request("把标题加粗");
        assert!(!outcome.complexity.needs_planning);
        assert!(outcome.plan.is_none());
    }

    #[test]
    fn test_injected_classifier_is_used() {
        let orchestrator = pipeline().with_classifier(Arc::new(AlwaysPlan));
        let outcome = orchestrator.plan_request("把标题加粗");
        assert!(outcome.complexity.needs_planning);
        assert!(outcome.plan.is_some());
    }

    #[test]
    fn test_plan_review_delegates() {
        let review = ReviewResult {
            issues: vec![ReviewFinding::new(0, "缺少页码")],
            summary: None,
        };
        let plan = pipeline().plan_review(&review, "修复这些问题").unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[tokio::test]
    async fn test_process_request_without_plan_is_none() {
        let outcome = pipeline()
            .process_request("这份文档有什么问题？", None)
            .await
            .unwrap();
        assert!(outcome.is_none());
    }
}
