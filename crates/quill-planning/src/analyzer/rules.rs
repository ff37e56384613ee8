//! Weighted indicator battery used to score request complexity.
//!
//! Each [`Indicator`] is an independent predicate over the request. The
//! classifier folds over [`INDICATORS`] in order, summing the weight of every
//! indicator that fires and recording its label.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::{compile, contains_any, matched_terms};

/// Sequencing words that imply more than one step
pub const MULTI_STEP_TERMS: &[&str] = &[
    "首先", "然后", "接着", "随后", "最后", "其次", "之后", "再然后", "第一步", "第二步", "第三步",
    "first", "firstly", "then", "next", "finally", "after that", "afterwards",
];

const BATCH_TERMS: &[&str] = &[
    "所有", "全部", "每个", "整个文档", "整篇", "全文", "批量", "统一", "all", "every",
    "entire document", "whole document", "throughout",
];

const COMPLEX_MODIFICATION_TERMS: &[&str] = &[
    "重构", "重新排版", "重新组织", "统一格式", "标准化", "规范化", "整理", "排版", "restructure",
    "reformat", "reorganize", "reorganise", "standardize", "standardise", "normalize",
    "clean up",
];

const CROSS_DOCUMENT_TERMS: &[&str] = &[
    "多个文档", "多份文档", "跨文档", "另一个文档", "其他文档", "合并文档", "multiple documents",
    "across documents", "another document", "other documents", "merge documents",
];

/// Document parts a request may touch, with the terms naming each one
const DOCUMENT_PARTS: &[(&str, &[&str])] = &[
    ("title", &["标题", "title", "heading"]),
    ("body", &["正文", "body"]),
    ("table", &["表格", "table"]),
    ("image", &["图片", "图像", "image", "picture"]),
    ("header", &["页眉", "header"]),
    ("footer", &["页脚", "footer"]),
    ("toc", &["目录", "table of contents", "toc"]),
    ("chapter", &["章节", "chapter", "section"]),
];

/// Most matched keywords shown in a single indicator label
const LABEL_EXAMPLE_LIMIT: usize = 3;

static OPERATION_VERBS: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)修改|设置|调整|添加|插入|删除|替换|格式化|加粗|居中|生成|更新|创建|应用|\b(?:change|set|adjust|add|insert|delete|remove|replace|format|bold|center|generate|update|create|apply)\b",
    )
});

static LIST_STRUCTURE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^\s*(?:\d+[.、)）]|[-*•])\s*\S|1[.、)）]\D.+2[.、)）]\D")
});

static CONDITIONAL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)如果.+(?:就|则|那么)|若.+则|当.+时|\bif\b.+\bthen\b|\bwhen\b|\bunless\b")
});

static ITERATION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)每一?[个张页段节行处]|逐[个一条页段]|依次|分别|\b(?:each|one by one|for each)\b")
});

static CROSS_DOCUMENT_TRANSFER: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)(?:从|把|将).{0,30}(?:复制|移动|导入|合并).{0,30}(?:到|至|进).{0,20}(?:另一个|其他|新)(?:文档|文件)|\b(?:copy|move|import)\b.{0,40}\b(?:from|into|to)\b.{0,30}\b(?:another|other|new) (?:document|file)",
    )
});

static ANALYZE_THEN_OPERATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)(?:分析|检查|审查|检测|找出).{0,20}(?:然后|并|再|后).{0,10}(?:修改|修复|调整|处理|优化)|\b(?:analy[sz]e|check|review)\b.{0,30}\b(?:then|and)\b.{0,15}\b(?:fix|modify|adjust|correct)\b",
    )
});

/// A request prepared for indicator evaluation
pub struct RequestText<'req> {
    /// The request as typed
    pub original: &'req str,
    /// Lowercased request
    pub lower: String,
    /// Length in characters, not bytes
    pub char_count: usize,
}

impl<'req> RequestText<'req> {
    /// Prepares `request` for evaluation
    pub fn new(request: &'req str) -> Self {
        Self {
            original: request,
            lower: request.to_lowercase(),
            char_count: request.trim().chars().count(),
        }
    }
}

/// A fired indicator: its weight and a readable label
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Score contribution
    pub weight: f64,
    /// Human-readable description
    pub label: String,
}

impl Signal {
    fn new(weight: f64, label: String) -> Self {
        Self { weight, label }
    }
}

/// One independent predicate-plus-weight rule
pub struct Indicator {
    /// Stable identifier for tests and logging
    pub name: &'static str,
    /// Evaluates the rule; `None` when it does not fire
    pub evaluate: fn(&RequestText<'_>) -> Option<Signal>,
}

/// The scoring battery, in evaluation order
pub static INDICATORS: &[Indicator] = &[
    Indicator {
        name: "multi_step",
        evaluate: multi_step,
    },
    Indicator {
        name: "batch_scope",
        evaluate: batch_scope,
    },
    Indicator {
        name: "complex_modification",
        evaluate: complex_modification,
    },
    Indicator {
        name: "cross_document_terms",
        evaluate: cross_document_terms,
    },
    Indicator {
        name: "document_parts",
        evaluate: document_parts,
    },
    Indicator {
        name: "operation_density",
        evaluate: operation_density,
    },
    Indicator {
        name: "list_structure",
        evaluate: list_structure,
    },
    Indicator {
        name: "length",
        evaluate: length,
    },
    Indicator {
        name: "conditional",
        evaluate: conditional,
    },
    Indicator {
        name: "iteration",
        evaluate: iteration,
    },
    Indicator {
        name: "cross_document_transfer",
        evaluate: cross_document_transfer,
    },
    Indicator {
        name: "analyze_then_operate",
        evaluate: analyze_then_operate,
    },
];

fn examples(terms: &[&str]) -> String {
    terms
        .iter()
        .take(LABEL_EXAMPLE_LIMIT)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn multi_step(request: &RequestText<'_>) -> Option<Signal> {
    let found = matched_terms(&request.lower, MULTI_STEP_TERMS);
    (!found.is_empty())
        .then(|| Signal::new(2.0, format!("Multi-step keywords: {}", examples(&found))))
}

fn batch_scope(request: &RequestText<'_>) -> Option<Signal> {
    let found = matched_terms(&request.lower, BATCH_TERMS);
    (!found.is_empty()).then(|| Signal::new(1.5, format!("Batch scope: {}", examples(&found))))
}

fn complex_modification(request: &RequestText<'_>) -> Option<Signal> {
    let found = matched_terms(&request.lower, COMPLEX_MODIFICATION_TERMS);
    (!found.is_empty()).then(|| {
        Signal::new(
            2.0,
            format!("Complex modification: {}", examples(&found)),
        )
    })
}

fn cross_document_terms(request: &RequestText<'_>) -> Option<Signal> {
    let found = matched_terms(&request.lower, CROSS_DOCUMENT_TERMS);
    (!found.is_empty())
        .then(|| Signal::new(3.0, format!("Cross-document: {}", examples(&found))))
}

fn document_parts(request: &RequestText<'_>) -> Option<Signal> {
    let parts: Vec<&str> = DOCUMENT_PARTS
        .iter()
        .filter(|(_, terms)| contains_any(&request.lower, terms))
        .map(|(part, _)| *part)
        .collect();
    let weight = match parts.len() {
        0 | 1 => return None,
        2 => 1.5,
        _ => 2.5,
    };
    Some(Signal::new(
        weight,
        format!("Touches {} document parts: {}", parts.len(), parts.join(", ")),
    ))
}

fn operation_density(request: &RequestText<'_>) -> Option<Signal> {
    let count = OPERATION_VERBS.find_iter(request.original).count();
    let weight = match count {
        0 | 1 => return None,
        2 => 1.0,
        3 | 4 => 2.0,
        _ => 3.0,
    };
    Some(Signal::new(weight, format!("{count} operation verbs")))
}

fn list_structure(request: &RequestText<'_>) -> Option<Signal> {
    LIST_STRUCTURE
        .is_match(request.original)
        .then(|| Signal::new(2.0, "Numbered or bulleted list".to_owned()))
}

fn length(request: &RequestText<'_>) -> Option<Signal> {
    if request.char_count > 220 {
        Some(Signal::new(2.0, format!("Long request ({} chars)", request.char_count)))
    } else if request.char_count > 120 {
        Some(Signal::new(1.0, format!("Medium-length request ({} chars)", request.char_count)))
    } else {
        None
    }
}

fn conditional(request: &RequestText<'_>) -> Option<Signal> {
    CONDITIONAL
        .is_match(request.original)
        .then(|| Signal::new(1.5, "Conditional logic".to_owned()))
}

fn iteration(request: &RequestText<'_>) -> Option<Signal> {
    ITERATION
        .is_match(request.original)
        .then(|| Signal::new(1.5, "Iterates over elements".to_owned()))
}

fn cross_document_transfer(request: &RequestText<'_>) -> Option<Signal> {
    CROSS_DOCUMENT_TRANSFER
        .is_match(request.original)
        .then(|| Signal::new(2.0, "Transfers content between documents".to_owned()))
}

fn analyze_then_operate(request: &RequestText<'_>) -> Option<Signal> {
    ANALYZE_THEN_OPERATE
        .is_match(request.original)
        .then(|| Signal::new(2.0, "Analyze then operate".to_owned()))
}
