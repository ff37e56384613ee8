//! Short-circuit checks evaluated before indicator scoring.

use std::sync::LazyLock;

use regex::Regex;

use super::rules::MULTI_STEP_TERMS;
use crate::text::{compile, contains_any};

/// Words that signal the user wants something changed.
///
/// Any of these rules a request out of being query-only, whatever else it says.
pub const EXECUTION_TERMS: &[&str] = &[
    "修改", "修复", "改正", "更正", "调整", "设置", "应用", "执行", "删除", "替换", "添加", "插入",
    "处理", "优化", "格式化", "加粗", "居中", "对齐", "统一", "生成", "更新", "创建", "排版", "改成",
    "改为", "去掉", "modify", "fix", "apply", "delete", "replace", "change", "correct", "update",
    "insert", "remove", "format", "set", "adjust", "bold", "center", "generate", "create",
];

static QUERY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"有(?:什么|哪些|没有)(?:问题|错误|不足|地方|需要)",
        r"存在(?:什么|哪些)",
        r"(?:告诉我|说说|讲讲|介绍一下|解释一下|说明一下|了解一下)",
        r"(?:是什么|是否|怎么样|为什么)",
        r"(?i)\b(?:what|which)\s+(?:issues|problems|errors|mistakes)\b",
        r"(?i)\btell me about\b",
        r"(?i)^\s*(?:explain|describe|summari[sz]e|list)\b",
        r"[?？]\s*$",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static SINGLE_OPERATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^(?:请|帮我)?(?:把|将)?[^，,。；;、和并及与然]{0,20}(?:加粗|变粗|斜体|倾斜|下划线|居中|左对齐|右对齐)$",
        r"^(?:请|帮我)?(?:插入|删除|替换)[^，,。；;、和并及与然]{0,30}$",
        r"(?i)^(?:please )?(?:bold|italici[sz]e|underline|center|left-align|right-align) (?:the )?[a-z0-9 ]{0,30}$",
        r"(?i)^(?:please )?(?:insert|delete|replace) [^,.;]{0,40}$",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

/// Whether `request` only asks for information.
///
/// `lower` is the lowercased request.
pub fn is_query_only(request: &str, lower: &str) -> bool {
    if contains_any(lower, EXECUTION_TERMS) {
        return false;
    }
    QUERY_PATTERNS.iter().any(|pattern| pattern.is_match(request.trim()))
}

/// Whether `request` is one directly-phrased attribute toggle or insert/delete/replace.
pub fn is_single_operation(request: &str, lower: &str) -> bool {
    if contains_any(lower, MULTI_STEP_TERMS) {
        return false;
    }
    let trimmed = request
        .trim()
        .trim_end_matches(|letter: char| matches!(letter, '。' | '.' | '!' | '！'));
    SINGLE_OPERATION_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(trimmed))
}
