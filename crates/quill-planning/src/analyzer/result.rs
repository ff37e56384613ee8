use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural complexity of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    /// A single atomic edit
    Simple,
    /// A few related edits
    Moderate,
    /// A multi-step task
    Complex,
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(formatter, "simple"),
            Self::Moderate => write!(formatter, "moderate"),
            Self::Complex => write!(formatter, "complex"),
        }
    }
}

/// What earlier output a request refers back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextReferenceType {
    /// Findings of an earlier review pass
    Review,
    /// Something mentioned earlier in the conversation
    Previous,
}

/// The classifier's verdict on a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityResult {
    /// Complexity tier
    pub complexity: ComplexityLevel,
    /// Whether a multi-step plan should be built
    pub needs_planning: bool,
    /// Human-readable signals that fired, in evaluation order
    pub indicators: Vec<String>,
    /// Hint for how many steps a plan should have
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_step_count: Option<usize>,
    /// Confidence in the verdict, 0 to 1
    pub confidence: f64,
    /// Accumulated indicator score
    pub score: f64,
    /// The request only asks for information; never plan it
    pub is_query_only: bool,
    /// The request refers back to earlier output
    pub has_context_reference: bool,
    /// Kind of earlier output referred to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_reference_type: Option<ContextReferenceType>,
    /// Lexical tokens that signalled the reference
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_reference_tokens: Vec<String>,
}

impl ComplexityResult {
    /// Verdict for a request that only asks for information
    pub(crate) fn query_only() -> Self {
        Self {
            complexity: ComplexityLevel::Simple,
            needs_planning: false,
            indicators: vec!["Query-only request".to_owned()],
            suggested_step_count: None,
            confidence: 0.95,
            score: 0.0,
            is_query_only: true,
            has_context_reference: false,
            context_reference_type: None,
            context_reference_tokens: Vec::new(),
        }
    }

    /// Verdict for a canonical single-operation request
    pub(crate) fn single_operation() -> Self {
        Self {
            complexity: ComplexityLevel::Simple,
            needs_planning: false,
            indicators: vec!["Single-operation request".to_owned()],
            suggested_step_count: None,
            confidence: 0.9,
            score: 0.0,
            is_query_only: false,
            has_context_reference: false,
            context_reference_type: None,
            context_reference_tokens: Vec::new(),
        }
    }
}
