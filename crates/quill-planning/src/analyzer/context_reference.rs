//! Detection of requests that refer back to earlier output.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::result::ContextReferenceType;
use crate::text::compile;

/// Confidence at which a reference counts as detected
pub const DETECTION_THRESHOLD: f64 = 0.3;

const REVIEW_CONTRIBUTION: f64 = 0.5;
const PREVIOUS_CONTRIBUTION: f64 = 0.25;
const ACTION_CONTRIBUTION: f64 = 0.2;

static REVIEW_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)审查结果|审查发现|审查意见|审阅结果|检查结果|按照?建议|根据建议|上述建议|修改建议|review (?:found|results?|findings)|per the suggestions?|the suggestions above|suggested fixes",
    )
});

/// Lead-ins that overlap the review phrases they introduce, so they are scanned separately
static REVIEW_LEAD_INS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)根据审查|基于审查|按照?审查|based on (?:the )?review"));

static DEMONSTRATIVES: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)这些|那些|这个问题|那个|上述|以上|上面|前面提到的?|刚才|之前的|\b(?:these|those|the above|mentioned above|above-mentioned|previous|that)\b",
    )
});

static APPLY_VERBS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)应用|执行|修复|修改|处理|改正|更正|落实|\b(?:apply|execute|fix|correct|resolve|implement)\b")
});

/// Outcome of scanning a request for references to earlier output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextReference {
    /// Strongest kind of reference found
    pub kind: Option<ContextReferenceType>,
    /// Clamped sum of contributions, 0 to 1
    pub confidence: f64,
    /// Tokens that contributed, in scan order
    pub tokens: Vec<String>,
}

impl ContextReference {
    /// Scans `request` for review vocabulary, demonstratives and apply verbs.
    ///
    /// Apply verbs only contribute when one of the other two groups matched.
    pub fn detect(request: &str) -> Self {
        let mut review_tokens = collect(&REVIEW_VOCABULARY, request);
        for token in collect(&REVIEW_LEAD_INS, request) {
            if !review_tokens.contains(&token) {
                review_tokens.push(token);
            }
        }
        let previous_tokens = collect(&DEMONSTRATIVES, request);

        let mut confidence = 0.0;
        let mut tokens = Vec::new();

        let kind = if review_tokens.is_empty() {
            if previous_tokens.is_empty() {
                None
            } else {
                Some(ContextReferenceType::Previous)
            }
        } else {
            Some(ContextReferenceType::Review)
        };

        if !review_tokens.is_empty() {
            confidence += REVIEW_CONTRIBUTION;
            tokens.extend(review_tokens);
        }
        if !previous_tokens.is_empty() {
            confidence += PREVIOUS_CONTRIBUTION;
            tokens.extend(previous_tokens);
        }
        if kind.is_some() {
            let action_tokens = collect(&APPLY_VERBS, request);
            if !action_tokens.is_empty() {
                confidence += ACTION_CONTRIBUTION;
                tokens.extend(action_tokens);
            }
        }

        Self {
            kind,
            confidence: f64::min(confidence, 1.0),
            tokens,
        }
    }

    /// Whether the reference is strong enough to act on
    pub fn is_detected(&self) -> bool {
        self.kind.is_some() && self.confidence >= DETECTION_THRESHOLD
    }

    /// Whether a review reference was detected
    pub fn is_review(&self) -> bool {
        self.is_detected() && self.kind == Some(ContextReferenceType::Review)
    }
}

fn collect(pattern: &Regex, request: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for found in pattern.find_iter(request) {
        let token = found.as_str().to_owned();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
