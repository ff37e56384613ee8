//! Complexity classification.
//!
//! [`ComplexityClassifier`] decides whether a request is a single edit, a
//! question, or something that warrants a multi-step plan. Classification is
//! a pure function of the request text and the static rule tables in
//! [`rules`] and [`shortcuts`].

/// Detection of references back to earlier output
pub mod context_reference;
/// Classification result types
pub mod result;
/// The weighted indicator battery
pub mod rules;
/// Query-only and single-operation short-circuits
pub mod shortcuts;

pub use context_reference::ContextReference;
pub use result::{ComplexityLevel, ComplexityResult, ContextReferenceType};

use rules::{INDICATORS, RequestText};
use tracing::debug;

/// Score at or above which a request is complex
const COMPLEX_THRESHOLD: f64 = 5.0;
/// Score at or above which a request is moderate
const MODERATE_THRESHOLD: f64 = 2.0;
/// Moderate requests at or above this score still get a plan
const MODERATE_PLANNING_THRESHOLD: f64 = 3.0;
/// Upper bound on the suggested step count
const MAX_SUGGESTED_STEPS: usize = 8;
/// Upper bound on reported confidence
const MAX_CONFIDENCE: f64 = 0.95;

const REVIEW_REFERENCE_WEIGHT: f64 = 2.5;
const PREVIOUS_REFERENCE_WEIGHT: f64 = 1.5;

/// Anything that can classify a request.
pub trait RequestClassifier: Send + Sync {
    /// Classifies `request`. Never fails.
    fn classify(&self, request: &str) -> ComplexityResult;
}

/// Keyword and pattern based classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComplexityClassifier;

impl ComplexityClassifier {
    /// Creates a new classifier
    pub fn new() -> Self {
        Self
    }

    fn score(request: &RequestText<'_>, reference: &ContextReference) -> (f64, Vec<String>) {
        let mut score = 0.0;
        let mut indicators = Vec::new();

        for indicator in INDICATORS {
            if let Some(signal) = (indicator.evaluate)(request) {
                debug!(
                    "Indicator {} fired (+{}): {}",
                    indicator.name, signal.weight, signal.label
                );
                score += signal.weight;
                indicators.push(signal.label);
            }
        }

        if reference.is_detected() {
            let (weight, label) = match reference.kind {
                Some(ContextReferenceType::Review) => {
                    (REVIEW_REFERENCE_WEIGHT, "References review findings")
                }
                _ => (PREVIOUS_REFERENCE_WEIGHT, "References earlier content"),
            };
            score += weight;
            indicators.push(format!("{label}: {}", reference.tokens.join(", ")));
        }

        (score, indicators)
    }
}

impl RequestClassifier for ComplexityClassifier {
    fn classify(&self, request: &str) -> ComplexityResult {
        let text = RequestText::new(request);

        if shortcuts::is_query_only(request, &text.lower) {
            debug!("Request classified as query-only");
            return ComplexityResult::query_only();
        }

        let reference = ContextReference::detect(request);

        if !reference.is_review() && shortcuts::is_single_operation(request, &text.lower) {
            debug!("Request classified as a single operation");
            return ComplexityResult::single_operation();
        }

        let (score, mut indicators) = Self::score(&text, &reference);

        let (mut complexity, mut needs_planning, suggested_step_count) =
            if score >= COMPLEX_THRESHOLD {
                (
                    ComplexityLevel::Complex,
                    true,
                    Some(suggested_steps(score)),
                )
            } else if score >= MODERATE_THRESHOLD {
                (
                    ComplexityLevel::Moderate,
                    score >= MODERATE_PLANNING_THRESHOLD,
                    None,
                )
            } else {
                (ComplexityLevel::Simple, false, None)
            };

        if reference.is_review() && !needs_planning {
            needs_planning = true;
            complexity = ComplexityLevel::Moderate;
            indicators.push("Planning forced: request asks to act on review findings".to_owned());
        }

        debug!(
            "Classified request: {complexity} (score {score:.1}, planning {needs_planning})"
        );

        ComplexityResult {
            complexity,
            needs_planning,
            indicators,
            suggested_step_count,
            confidence: f64::min(0.5 + 0.1 * score, MAX_CONFIDENCE),
            score,
            is_query_only: false,
            has_context_reference: reference.is_detected(),
            context_reference_type: reference.is_detected().then_some(reference.kind).flatten(),
            context_reference_tokens: if reference.is_detected() {
                reference.tokens
            } else {
                Vec::new()
            },
        }
    }
}

fn suggested_steps(score: f64) -> usize {
    let half = (score / 2.0).ceil() as usize;
    (half + 2).min(MAX_SUGGESTED_STEPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(request: &str) -> ComplexityResult {
        ComplexityClassifier::new().classify(request)
    }

    #[test]
    fn test_classification_is_deterministic() {
        for request in [
            "首先统一全文字体，然后为每个章节添加标题样式，最后生成目录",
            "这份文档有什么问题？",
            "把标题加粗",
            "根据审查结果进行修改",
            "",
        ] {
            assert_eq!(classify(request), classify(request));
        }
    }

    #[test]
    fn test_query_only_short_circuit() {
        let result = classify("这份文档有什么问题？");
        assert!(result.is_query_only);
        assert!(!result.needs_planning);
        assert_eq!(result.complexity, ComplexityLevel::Simple);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_execution_keyword_defeats_query_only() {
        let result = classify("修改文档中存在的问题");
        assert!(!result.is_query_only);
    }

    #[test]
    fn test_single_operation_short_circuit() {
        let result = classify("把标题加粗");
        assert_eq!(result.complexity, ComplexityLevel::Simple);
        assert!(!result.needs_planning);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_review_reference_forces_planning() {
        let result = classify("根据审查结果进行修改");
        assert!(result.needs_planning);
        assert!(result.has_context_reference);
        assert_eq!(
            result.context_reference_type,
            Some(ContextReferenceType::Review)
        );
        assert!(!result.context_reference_tokens.is_empty());
    }

    #[test]
    fn test_weak_review_mention_is_forced_to_moderate() {
        let result = classify("按照审查意见来");
        assert!(result.needs_planning);
        assert_eq!(result.complexity, ComplexityLevel::Moderate);
        assert!(result
            .indicators
            .iter()
            .any(|indicator| indicator.starts_with("Planning forced")));
    }

    #[test]
    fn test_complex_request() {
        let result = classify(
            "首先统一全文字体，然后调整标题、正文和表格的格式，最后插入目录并添加页码",
        );
        assert_eq!(result.complexity, ComplexityLevel::Complex);
        assert!(result.needs_planning);
        let suggested = result.suggested_step_count.unwrap();
        assert!((3..=MAX_SUGGESTED_STEPS).contains(&suggested));
        assert!(result.confidence <= MAX_CONFIDENCE);
    }

    #[test]
    fn test_plain_request_is_simple() {
        let result = classify("标题太长了，帮我看看");
        assert_eq!(result.complexity, ComplexityLevel::Simple);
        assert!(!result.needs_planning);
        assert!(!result.is_query_only);
    }

    #[test]
    fn test_confidence_tracks_score() {
        let result = classify("把所有表格和图片的格式统一");
        assert!(result.score > 0.0);
        let expected = f64::min(0.5 + 0.1 * result.score, MAX_CONFIDENCE);
        assert!((result.confidence - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_suggested_steps_is_capped() {
        assert_eq!(suggested_steps(5.0), 5);
        assert_eq!(suggested_steps(6.0), 5);
        assert_eq!(suggested_steps(30.0), MAX_SUGGESTED_STEPS);
    }

    #[test]
    fn test_classifier_as_trait_object() {
        let classifier: Box<dyn RequestClassifier> = Box::new(ComplexityClassifier);
        assert!(classifier.classify("这份文档有什么问题？").is_query_only);
    }
}
