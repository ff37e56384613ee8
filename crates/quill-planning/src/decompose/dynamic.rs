//! Keyword-group decomposition for requests no template covers.

use quill_core::{RiskLevel, TaskStep};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::extract::{self, SpacingSetting};
use crate::text::{contains_any, contains_term};

/// A domain keyword group contributing at most one step.
struct KeywordGroup {
    name: &'static str,
    terms: &'static [&'static str],
    description: &'static str,
    tool: &'static str,
    risk: RiskLevel,
    estimated_time_ms: u64,
    build_args: fn(&str, &str) -> Map<String, Value>,
}

/// Groups in scan order; steps are emitted in this order.
const GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "formatting",
        terms: &["加粗", "粗体", "斜体", "下划线", "bold", "italic", "underline"],
        description: "Apply text formatting",
        tool: "word_format_text",
        risk: RiskLevel::Low,
        estimated_time_ms: 1_000,
        build_args: formatting_args,
    },
    KeywordGroup {
        name: "font",
        terms: &["字体", "字号", "font"],
        description: "Set font",
        tool: "word_set_font",
        risk: RiskLevel::Low,
        estimated_time_ms: 1_000,
        build_args: font_args,
    },
    KeywordGroup {
        name: "color",
        terms: &["颜色", "标红", "红色", "蓝色", "绿色", "color", "colour"],
        description: "Set font color",
        tool: "word_set_font_color",
        risk: RiskLevel::Low,
        estimated_time_ms: 800,
        build_args: color_args,
    },
    KeywordGroup {
        name: "alignment",
        terms: &["对齐", "居中", "align", "center", "centre", "justify"],
        description: "Set paragraph alignment",
        tool: "word_set_alignment",
        risk: RiskLevel::Low,
        estimated_time_ms: 800,
        build_args: alignment_args,
    },
    KeywordGroup {
        name: "spacing",
        terms: &["行距", "间距", "段前", "段后", "spacing"],
        description: "Set paragraph spacing",
        tool: "word_set_paragraph_spacing",
        risk: RiskLevel::Low,
        estimated_time_ms: 1_000,
        build_args: spacing_args,
    },
    KeywordGroup {
        name: "sorting",
        terms: &["排序", "sort"],
        description: "Sort data range",
        tool: "excel_sort_range",
        risk: RiskLevel::Medium,
        estimated_time_ms: 1_500,
        build_args: sorting_args,
    },
    KeywordGroup {
        name: "chart",
        terms: &["图表", "柱状图", "折线图", "饼图", "chart"],
        description: "Insert chart",
        tool: "excel_insert_chart",
        risk: RiskLevel::Low,
        estimated_time_ms: 2_500,
        build_args: chart_args,
    },
    KeywordGroup {
        name: "toc",
        terms: &["目录", "table of contents"],
        description: "Insert table of contents",
        tool: "word_insert_toc",
        risk: RiskLevel::Medium,
        estimated_time_ms: 2_000,
        build_args: toc_args,
    },
    KeywordGroup {
        name: "page_numbers",
        terms: &["页码", "page number", "page numbers"],
        description: "Insert page numbers",
        tool: "word_insert_page_numbers",
        risk: RiskLevel::Low,
        estimated_time_ms: 1_000,
        build_args: page_number_args,
    },
];

/// One step per matching group, in scan order, at most `max_steps`.
pub fn steps_for(request: &str, max_steps: usize, require_confirmation: bool) -> Vec<TaskStep> {
    let lower = request.to_lowercase();
    GROUPS
        .iter()
        .filter(|group| contains_any(&lower, group.terms))
        .take(max_steps)
        .map(|group| {
            debug!("Keyword group {} matched", group.name);
            let step = TaskStep::new(group.description)
                .with_tool(group.tool)
                .with_args((group.build_args)(request, &lower))
                .with_risk(group.risk)
                .with_estimated_time(group.estimated_time_ms);
            if require_confirmation {
                step.with_confirmation(true)
            } else {
                step
            }
        })
        .collect()
}

fn with_quoted_target(request: &str) -> Map<String, Value> {
    let mut args = Map::new();
    if let Some(text) = extract::quoted_segments(request).into_iter().next() {
        args.insert("searchText".to_owned(), json!(text));
    }
    args
}

fn formatting_args(request: &str, lower: &str) -> Map<String, Value> {
    let mut args = with_quoted_target(request);
    for (key, terms) in [
        ("bold", &["加粗", "粗体", "bold"][..]),
        ("italic", &["斜体", "italic"][..]),
        ("underline", &["下划线", "underline"][..]),
    ] {
        if contains_any(lower, terms) {
            args.insert(key.to_owned(), json!(true));
        }
    }
    args
}

fn font_args(request: &str, _lower: &str) -> Map<String, Value> {
    let mut args = with_quoted_target(request);
    let font = extract::font_settings(request);
    if font.name.is_none() && font.size.is_none() {
        args.insert("fontName".to_owned(), json!("宋体"));
        args.insert("fontSize".to_owned(), json!(12));
    }
    font.write_to(&mut args);
    args
}

fn color_args(request: &str, _lower: &str) -> Map<String, Value> {
    let mut args = with_quoted_target(request);
    args.insert(
        "color".to_owned(),
        json!(extract::color(request).unwrap_or_else(|| "#000000".to_owned())),
    );
    args
}

fn alignment_args(request: &str, _lower: &str) -> Map<String, Value> {
    let mut args = with_quoted_target(request);
    args.insert(
        "alignment".to_owned(),
        json!(extract::alignment(request).unwrap_or("left")),
    );
    args
}

fn spacing_args(request: &str, _lower: &str) -> Map<String, Value> {
    extract::spacing_value(request)
        .unwrap_or_else(SpacingSetting::default_line_spacing)
        .to_args()
}

fn sorting_args(_request: &str, lower: &str) -> Map<String, Value> {
    let descending = contains_any(lower, &["降序", "从大到小", "descending", "desc"]);
    let mut args = Map::new();
    args.insert("column".to_owned(), json!("A"));
    args.insert("ascending".to_owned(), json!(!descending));
    args.insert("hasHeader".to_owned(), json!(true));
    args
}

fn chart_args(_request: &str, lower: &str) -> Map<String, Value> {
    let chart_type = if contains_any(lower, &["折线", "line chart"]) {
        "line"
    } else if contains_any(lower, &["饼图", "pie"]) {
        "pie"
    } else if contains_term(lower, "bar") {
        "bar"
    } else {
        "column"
    };
    let mut args = Map::new();
    args.insert("chartType".to_owned(), json!(chart_type));
    args
}

fn toc_args(_request: &str, _lower: &str) -> Map<String, Value> {
    let mut args = Map::new();
    args.insert("position".to_owned(), json!("start"));
    args.insert("levels".to_owned(), json!(3));
    args
}

fn page_number_args(request: &str, lower: &str) -> Map<String, Value> {
    let position = if contains_any(lower, &["页眉", "顶部", "top", "header"]) {
        "top"
    } else {
        "bottom"
    };
    let mut args = Map::new();
    args.insert("position".to_owned(), json!(position));
    args.insert(
        "alignment".to_owned(),
        json!(extract::alignment(request).unwrap_or("center")),
    );
    args
}
