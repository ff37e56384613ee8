//! Task plan structure for multi-step document edits.
//!
//! A [`TaskPlan`] is an ordered, non-empty list of [`TaskStep`]s produced by
//! the planner and consumed by the orchestration engine. Plans are immutable
//! once built; re-planning produces a new plan.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(Uuid);

impl PlanId {
    /// Generates a fresh random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "plan-{}", self.0)
    }
}

/// Informational risk of a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Cosmetic change that is trivially reverted
    #[default]
    Low,
    /// Change touching text or document structure
    Medium,
    /// Change that is hard to undo by hand
    High,
}

impl RiskLevel {
    /// Default confirmation policy upstream gatekeepers apply for this risk.
    #[must_use]
    pub const fn requires_confirmation(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(formatter, "low"),
            Self::Medium => write!(formatter, "medium"),
            Self::High => write!(formatter, "high"),
        }
    }
}

/// Category of a reported issue a step remediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Document structure: table of contents, page numbering
    Structure,
    /// Paragraph and character formatting
    Format,
    /// Generic style application on a concrete target
    Style,
    /// Text content
    Content,
    /// Anything uncategorized
    Other,
}

impl IssueType {
    /// Execution tier; lower tiers run first.
    ///
    /// Structure precedes format, which precedes content, which precedes
    /// everything else. Style shares the slot between format and content.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Structure => 0,
            Self::Format => 1,
            Self::Style => 2,
            Self::Content => 3,
            Self::Other => 4,
        }
    }

    /// Parses a loose category hint such as the `type` field of a finding.
    #[must_use]
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_lowercase().as_str() {
            "structure" | "结构" => Some(Self::Structure),
            "format" | "formatting" | "格式" => Some(Self::Format),
            "style" | "样式" => Some(Self::Style),
            "content" | "text" | "内容" => Some(Self::Content),
            "other" | "其他" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(formatter, "structure"),
            Self::Format => write!(formatter, "format"),
            Self::Style => write!(formatter, "style"),
            Self::Content => write!(formatter, "content"),
            Self::Other => write!(formatter, "other"),
        }
    }
}

/// How a plan was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    /// Instantiated from a pre-authored template
    Template,
    /// Assembled from keyword groups found in the request
    Dynamic,
    /// Derived from previously reported findings
    Review,
}

/// Converts a `json!` object literal into a tool argument map.
///
/// Anything other than an object yields an empty map.
pub fn into_args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// A single planned tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStep {
    /// Human-readable summary of the step
    pub description: String,
    /// Tool the executor should invoke
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Ordered fallback tools when `tool_name` is absent or unavailable
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_tools: Vec<String>,
    /// Tool-specific arguments, passed through unvalidated
    #[serde(default)]
    pub tool_args: Map<String, Value>,
    /// Informational risk
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Whether an external gatekeeper must approve the step first
    #[serde(default)]
    pub needs_confirmation: bool,
    /// Estimated duration in milliseconds, for display only
    #[serde(default, rename = "estimatedTime")]
    pub estimated_time_ms: u64,
    /// Category of the originating finding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<IssueType>,
    /// `issue-<index>` of the originating finding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_issue_id: Option<String>,
    /// Verbatim text of the originating finding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_issue_text: Option<String>,
    /// Where in the document the finding was reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_hint: Option<String>,
    /// Source issue ids that should conceptually run before this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl TaskStep {
    /// Creates a low-risk step with no tool and no arguments
    pub fn new<T: Into<String>>(description: T) -> Self {
        Self {
            description: description.into(),
            tool_name: None,
            expected_tools: Vec::new(),
            tool_args: Map::new(),
            risk_level: RiskLevel::Low,
            needs_confirmation: false,
            estimated_time_ms: 0,
            issue_type: None,
            source_issue_id: None,
            source_issue_text: None,
            location_hint: None,
            depends_on: Vec::new(),
        }
    }

    /// Sets the primary tool
    #[must_use]
    pub fn with_tool<T: Into<String>>(mut self, tool_name: T) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    /// Sets the fallback tool list
    #[must_use]
    pub fn with_expected_tools(mut self, tools: Vec<String>) -> Self {
        self.expected_tools = tools;
        self
    }

    /// Sets the tool arguments
    #[must_use]
    pub fn with_args(mut self, args: Map<String, Value>) -> Self {
        self.tool_args = args;
        self
    }

    /// Sets the risk level and the matching default confirmation policy
    #[must_use]
    pub fn with_risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self.needs_confirmation = risk_level.requires_confirmation();
        self
    }

    /// Overrides the confirmation flag
    #[must_use]
    pub fn with_confirmation(mut self, needs_confirmation: bool) -> Self {
        self.needs_confirmation = needs_confirmation;
        self
    }

    /// Sets the display estimate in milliseconds
    #[must_use]
    pub fn with_estimated_time(mut self, estimated_time_ms: u64) -> Self {
        self.estimated_time_ms = estimated_time_ms;
        self
    }

    /// Sets the originating issue category
    #[must_use]
    pub fn with_issue_type(mut self, issue_type: IssueType) -> Self {
        self.issue_type = Some(issue_type);
        self
    }

    /// Tool the executor should try first: `tool_name`, else the first expected tool.
    #[must_use]
    pub fn resolved_tool(&self) -> Option<&str> {
        self.tool_name
            .as_deref()
            .or_else(|| self.expected_tools.first().map(String::as_str))
            .filter(|name| !name.trim().is_empty())
    }

    /// Every tool this step may be executed with, in preference order, without duplicates.
    #[must_use]
    pub fn candidate_tools(&self) -> Vec<&str> {
        let mut candidates: Vec<&str> = Vec::new();
        for name in self
            .tool_name
            .iter()
            .chain(self.expected_tools.iter())
            .map(String::as_str)
        {
            if !name.trim().is_empty() && !candidates.contains(&name) {
                candidates.push(name);
            }
        }
        candidates
    }
}

/// An ordered, non-empty sequence of steps plus plan metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPlan {
    id: PlanId,
    title: String,
    original_request: String,
    source: PlanSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_issue_count: Option<usize>,
    created_at: DateTime<Utc>,
    steps: Vec<TaskStep>,
}

impl TaskPlan {
    /// Creates a plan, or `None` when `steps` is empty.
    pub fn new<T: Into<String>, R: Into<String>>(
        title: T,
        original_request: R,
        source: PlanSource,
        steps: Vec<TaskStep>,
    ) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }
        Some(Self {
            id: PlanId::new(),
            title: title.into(),
            original_request: original_request.into(),
            source,
            source_issue_count: None,
            created_at: Utc::now(),
            steps,
        })
    }

    /// Creates a plan from a first step and any number of following steps.
    pub fn from_first<T: Into<String>, R: Into<String>>(
        title: T,
        original_request: R,
        source: PlanSource,
        first: TaskStep,
        rest: Vec<TaskStep>,
    ) -> Self {
        let mut steps = Vec::with_capacity(rest.len() + 1);
        steps.push(first);
        steps.extend(rest);
        Self {
            id: PlanId::new(),
            title: title.into(),
            original_request: original_request.into(),
            source,
            source_issue_count: None,
            created_at: Utc::now(),
            steps,
        }
    }

    /// Records how many findings the plan was derived from
    #[must_use]
    pub fn with_source_issue_count(mut self, count: usize) -> Self {
        self.source_issue_count = Some(count);
        self
    }

    /// Plan identifier
    pub fn id(&self) -> PlanId {
        self.id
    }

    /// Plan title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Verbatim user request the plan was built for
    pub fn original_request(&self) -> &str {
        &self.original_request
    }

    /// How the plan was derived
    pub fn source(&self) -> PlanSource {
        self.source
    }

    /// Number of findings a review-derived plan was built from
    pub fn source_issue_count(&self) -> Option<usize> {
        self.source_issue_count
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[TaskStep] {
        &self.steps
    }

    /// Number of steps; never zero
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of step estimates
    pub fn total_estimated_time(&self) -> Duration {
        Duration::from_millis(self.steps.iter().map(|step| step.estimated_time_ms).sum())
    }

    /// Whether any step needs external approval
    pub fn requires_confirmation(&self) -> bool {
        self.steps.iter().any(|step| step.needs_confirmation)
    }

    /// Highest risk across all steps
    pub fn max_risk(&self) -> RiskLevel {
        self.steps
            .iter()
            .map(|step| step.risk_level)
            .max()
            .unwrap_or_default()
    }

    /// Consumes the plan, returning its steps
    pub fn into_steps(self) -> Vec<TaskStep> {
        self.steps
    }
}
