//! Remediation plans from previously reported review findings.

use std::sync::LazyLock;

use quill_core::{IssueType, PlanSource, RiskLevel, TaskPlan, TaskStep};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::extract::{self, EditTarget, SpacingSetting};
use crate::text::{compile, contains_any};

/// A single problem reported by a review pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFinding {
    /// Free-text description of the problem
    pub issue: String,
    /// Where in the document the problem is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Tools the review pass thinks can fix it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_tools: Vec<String>,
    /// Position in the review output
    #[serde(default)]
    pub index: usize,
    /// Loose category hint such as "format" or "content"
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
}

impl ReviewFinding {
    /// Creates a finding with only the issue text set
    pub fn new<T: Into<String>>(index: usize, issue: T) -> Self {
        Self {
            issue: issue.into(),
            index,
            ..Self::default()
        }
    }

    /// Sets the location
    #[must_use]
    pub fn with_location<T: Into<String>>(mut self, location: T) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the suggested fix
    #[must_use]
    pub fn with_suggestion<T: Into<String>>(mut self, suggestion: T) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Sets the category hint
    #[must_use]
    pub fn with_type<T: Into<String>>(mut self, issue_type: T) -> Self {
        self.issue_type = Some(issue_type.into());
        self
    }

    /// Sets the tools the review pass expects
    #[must_use]
    pub fn with_expected_tools(mut self, tools: Vec<String>) -> Self {
        self.expected_tools = tools;
        self
    }

    /// Identifier stamped on steps derived from this finding
    pub fn source_id(&self) -> String {
        format!("issue-{}", self.index)
    }

    fn suggestion_text(&self) -> &str {
        self.suggestion.as_deref().unwrap_or_default()
    }

    fn target(&self) -> Option<EditTarget> {
        EditTarget::resolve(&self.issue, self.location.as_deref())
    }
}

/// Output of a review pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Reported findings, in review order
    #[serde(default)]
    pub issues: Vec<ReviewFinding>,
    /// Overall summary, if the review produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Any of these makes an intent an edit request, whatever else it asks.
const INQUIRY_ACTION_TERMS: &[&str] = &[
    "修改", "修复", "改正", "更正", "处理", "应用", "执行", "调整", "解决", "删除", "替换", "添加",
    "插入", "统一", "设置", "优化", "格式化", "加粗", "居中", "对齐", "生成", "更新", "创建", "排版",
    "改成", "改为", "去掉", "补充", "fix", "apply", "modify", "correct", "resolve", "change",
    "update", "delete", "remove", "replace", "insert", "add", "set", "adjust", "format", "bold",
    "center", "generate", "create",
];

static INQUIRY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"有(?:什么|哪些)(?:问题|错误)",
        r"(?:解释|说明|告诉我|看看|了解)",
        r"(?:是什么|为什么|什么意思)",
        r"(?i)\b(?:what|why|which|explain|describe|tell me)\b",
        r"[?？]\s*$",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

/// Whether `intent` only asks to understand the findings
pub(super) fn is_inquiry(intent: &str) -> bool {
    if contains_any(&intent.to_lowercase(), INQUIRY_ACTION_TERMS) {
        return false;
    }
    INQUIRY_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(intent.trim()))
}

const TOC_TERMS: &[&str] = &["目录", "table of contents", "toc"];
const HEADING_TERMS: &[&str] = &["标题", "heading"];

/// Finding categories, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Heading,
    TableOfContents,
    Spacing,
    Font,
    Alignment,
    GenericFormat,
    PageNumbers,
    Image,
    Table,
    Content,
    Uncategorized,
}

static CATEGORY_MATCHERS: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    [
        (Category::Heading, r"(?i)标题|大纲|heading|outline"),
        (Category::TableOfContents, r"(?i)目录|table of contents|\btoc\b"),
        (Category::Spacing, r"(?i)行距|间距|段前|段后|spacing|line height"),
        (Category::Font, r"(?i)字体|字号|加粗|粗体|\bfont|\bbold"),
        (Category::Alignment, r"(?i)对齐|居中|\balign|\bcent(?:er|re)"),
        (Category::GenericFormat, r"(?i)格式|样式|\bformat|\bstyle"),
        (Category::PageNumbers, r"(?i)页码|page numbers?"),
        (Category::Image, r"(?i)图片|图像|插图|\bimage|\bpicture|\bfigure"),
        (Category::Table, r"(?i)表格|\btables?\b"),
        (
            Category::Content,
            r"(?i)内容|文字|文本|措辞|错别字|拼写|语法|\btypo|\bspelling|\bgrammar|\bwording|\btext\b|\bcontent",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| (category, compile(pattern)))
    .collect()
});

impl Category {
    fn of(issue: &str) -> Self {
        let mentions_toc = contains_any(&issue.to_lowercase(), TOC_TERMS);
        CATEGORY_MATCHERS
            .iter()
            .filter(|(category, _)| !(mentions_toc && *category == Self::Heading))
            .find(|(_, pattern)| pattern.is_match(issue))
            .map_or(Self::Uncategorized, |(category, _)| *category)
    }
}

/// Builds the remediation step for one finding, or `None` when it cannot be done safely.
pub(super) fn step_from_finding(finding: &ReviewFinding) -> Option<TaskStep> {
    let category = Category::of(&finding.issue);
    let step = match category {
        Category::Heading => heading_step(finding),
        Category::TableOfContents => Some(toc_step(finding)),
        Category::Spacing => Some(spacing_step(finding)),
        Category::Font => Some(font_step(finding)),
        Category::Alignment => Some(alignment_step(finding)),
        Category::GenericFormat => format_step(finding),
        Category::PageNumbers => Some(page_number_step(finding)),
        Category::Image => Some(image_step(finding)),
        Category::Table => Some(table_step(finding)),
        Category::Content => Some(content_step(finding)),
        Category::Uncategorized => Some(fallback_step(finding)),
    };

    let Some(mut step) = step else {
        debug!(
            "Skipping finding {} ({category:?}): no concrete target",
            finding.index
        );
        return None;
    };

    for tool in &finding.expected_tools {
        if !step.expected_tools.contains(tool) {
            step.expected_tools.push(tool.clone());
        }
    }
    step.source_issue_id = Some(finding.source_id());
    step.source_issue_text = Some(finding.issue.clone());
    step.location_hint = finding.location.clone();
    Some(step)
}

fn args_with_target(target: Option<&EditTarget>) -> Map<String, Value> {
    let mut args = Map::new();
    if let Some(target) = target {
        target.write_to(&mut args);
    }
    args
}

fn scope(target: Option<&EditTarget>) -> String {
    target.map_or_else(|| "the document".to_owned(), EditTarget::describe)
}

fn heading_step(finding: &ReviewFinding) -> Option<TaskStep> {
    let target = finding.target()?;
    let Some(style) = extract::style_name(finding.suggestion_text())
        .or_else(|| extract::style_name(&finding.issue))
    else {
        return Some(comment_step(finding, IssueType::Format));
    };

    let mut args = args_with_target(Some(&target));
    args.insert("styleName".to_owned(), json!(style));

    Some(
        TaskStep::new(format!("Apply {style} to {}", target.describe()))
            .with_tool("word_apply_style")
            .with_args(args)
            .with_risk(RiskLevel::Low)
            .with_estimated_time(1_500)
            .with_issue_type(IssueType::Format),
    )
}

fn toc_step(finding: &ReviewFinding) -> TaskStep {
    let lower = format!("{} {}", finding.issue, finding.suggestion_text()).to_lowercase();
    let update = contains_any(
        &lower,
        &["更新", "过时", "不一致", "不匹配", "update", "outdated", "stale"],
    );
    let (tool, fallback, description) = if update {
        ("word_update_toc", "word_insert_toc", "Update the table of contents")
    } else {
        ("word_insert_toc", "word_update_toc", "Insert a table of contents")
    };

    let mut args = Map::new();
    args.insert("levels".to_owned(), json!(3));
    if !update {
        args.insert("position".to_owned(), json!("start"));
    }

    TaskStep::new(description)
        .with_tool(tool)
        .with_expected_tools(vec![tool.to_owned(), fallback.to_owned()])
        .with_args(args)
        .with_risk(RiskLevel::Medium)
        .with_estimated_time(2_000)
        .with_issue_type(IssueType::Structure)
}

fn spacing_step(finding: &ReviewFinding) -> TaskStep {
    let target = finding.target();
    let spacing = extract::spacing_value(finding.suggestion_text())
        .or_else(|| extract::spacing_value(&finding.issue))
        .unwrap_or_else(SpacingSetting::default_line_spacing);

    let mut args = spacing.to_args();
    if let Some(target) = &target {
        target.write_to(&mut args);
    }

    TaskStep::new(format!(
        "Set {} to {} {} for {}",
        spacing.property,
        spacing.value,
        spacing.unit,
        scope(target.as_ref())
    ))
    .with_tool("word_set_paragraph_spacing")
    .with_args(args)
    .with_estimated_time(1_000)
    .with_issue_type(IssueType::Format)
}

fn font_step(finding: &ReviewFinding) -> TaskStep {
    let font = extract::font_settings(finding.suggestion_text())
        .or(extract::font_settings(&finding.issue));
    if font.is_empty() {
        return comment_step(finding, IssueType::Format);
    }

    let target = finding.target();
    let mut args = args_with_target(target.as_ref());
    font.write_to(&mut args);

    TaskStep::new(format!("Adjust font of {}", scope(target.as_ref())))
        .with_tool("word_set_font")
        .with_args(args)
        .with_estimated_time(1_000)
        .with_issue_type(IssueType::Format)
}

fn alignment_step(finding: &ReviewFinding) -> TaskStep {
    let Some(alignment) = extract::alignment(finding.suggestion_text())
        .or_else(|| extract::alignment(&finding.issue))
    else {
        return comment_step(finding, IssueType::Format);
    };

    let target = finding.target();
    let mut args = args_with_target(target.as_ref());
    args.insert("alignment".to_owned(), json!(alignment));

    TaskStep::new(format!("Align {} {alignment}", scope(target.as_ref())))
        .with_tool("word_set_alignment")
        .with_args(args)
        .with_estimated_time(800)
        .with_issue_type(IssueType::Format)
}

fn format_step(finding: &ReviewFinding) -> Option<TaskStep> {
    let target = finding.target()?;
    let suggestion = finding.suggestion_text();

    let mut args = args_with_target(Some(&target));
    extract::font_settings(suggestion).write_to(&mut args);
    if let Some(alignment) = extract::alignment(suggestion) {
        args.insert("alignment".to_owned(), json!(alignment));
    }
    if let Some(color) = extract::color(suggestion) {
        args.insert("color".to_owned(), json!(color));
    }

    Some(
        TaskStep::new(format!("Format {}", target.describe()))
            .with_tool("word_format_text")
            .with_args(args)
            .with_estimated_time(1_200)
            .with_issue_type(IssueType::Style),
    )
}

fn page_number_step(finding: &ReviewFinding) -> TaskStep {
    let text = format!("{} {}", finding.issue, finding.suggestion_text());
    let lower = text.to_lowercase();
    let position = if contains_any(&lower, &["页眉", "顶部", "header", "top"]) {
        "top"
    } else {
        "bottom"
    };

    let mut args = Map::new();
    args.insert("position".to_owned(), json!(position));
    args.insert(
        "alignment".to_owned(),
        json!(extract::alignment(&text).unwrap_or("center")),
    );

    TaskStep::new("Insert page numbers")
        .with_tool("word_insert_page_numbers")
        .with_args(args)
        .with_estimated_time(1_000)
        .with_issue_type(IssueType::Structure)
}

fn image_step(finding: &ReviewFinding) -> TaskStep {
    let target = finding.target();
    let mut args = args_with_target(target.as_ref());
    args.insert(
        "alignment".to_owned(),
        json!(extract::alignment(finding.suggestion_text()).unwrap_or("center")),
    );

    TaskStep::new(format!("Format images in {}", scope(target.as_ref())))
        .with_tool("word_format_image")
        .with_args(args)
        .with_estimated_time(1_500)
        .with_issue_type(IssueType::Content)
}

fn table_step(finding: &ReviewFinding) -> TaskStep {
    let target = finding.target();
    let mut args = args_with_target(target.as_ref());
    args.insert("autoFit".to_owned(), json!(true));
    args.insert("borders".to_owned(), json!(true));

    TaskStep::new(format!("Format tables in {}", scope(target.as_ref())))
        .with_tool("word_format_table")
        .with_args(args)
        .with_estimated_time(1_500)
        .with_issue_type(IssueType::Format)
}

fn content_step(finding: &ReviewFinding) -> TaskStep {
    let find = extract::quoted_segments(&finding.issue).into_iter().next();
    let replace = extract::quoted_segments(finding.suggestion_text())
        .into_iter()
        .next();

    let (Some(find), Some(replace)) = (find, replace) else {
        return comment_step(finding, IssueType::Content);
    };

    let mut args = Map::new();
    args.insert("findText".to_owned(), json!(find));
    args.insert("replaceText".to_owned(), json!(replace));

    TaskStep::new(format!("Replace “{find}” with “{replace}”"))
        .with_tool("word_find_replace")
        .with_args(args)
        .with_risk(RiskLevel::Medium)
        .with_estimated_time(1_000)
        .with_issue_type(IssueType::Content)
}

fn fallback_step(finding: &ReviewFinding) -> TaskStep {
    let issue_type = finding
        .issue_type
        .as_deref()
        .and_then(IssueType::from_hint)
        .unwrap_or(IssueType::Other);

    let Some(tool) = finding.expected_tools.first() else {
        return comment_step(finding, issue_type);
    };

    let target = finding.target();
    TaskStep::new(format!("Resolve: {}", finding.issue))
        .with_tool(tool.clone())
        .with_args(args_with_target(target.as_ref()))
        .with_risk(RiskLevel::Medium)
        .with_estimated_time(1_500)
        .with_issue_type(issue_type)
}

fn comment_step(finding: &ReviewFinding, issue_type: IssueType) -> TaskStep {
    let comment = finding
        .suggestion
        .as_deref()
        .filter(|suggestion| !suggestion.trim().is_empty())
        .map_or_else(
            || format!("Review: {}", finding.issue),
            |suggestion| format!("{}: {suggestion}", finding.issue),
        );

    let target = finding.target();
    let mut args = args_with_target(target.as_ref());
    args.insert("comment".to_owned(), json!(comment));

    TaskStep::new(format!("Add review comment on {}", scope(target.as_ref())))
        .with_tool("word_add_comment")
        .with_args(args)
        .with_estimated_time(500)
        .with_issue_type(issue_type)
}

/// Whether the finding a step came from mentions any of `terms`, word-bounded for ASCII
fn source_mentions(step: &TaskStep, terms: &[&str]) -> bool {
    step.source_issue_text
        .as_deref()
        .is_some_and(|text| contains_any(&text.to_lowercase(), terms))
}

/// Orders steps by issue tier and wires table-of-contents steps after heading fixes.
pub(super) fn order_and_link(mut steps: Vec<TaskStep>) -> Vec<TaskStep> {
    steps.sort_by_key(|step| step.issue_type.map_or(u8::MAX, IssueType::priority));

    let heading_ids: Vec<String> = steps
        .iter()
        .filter(|step| step.issue_type == Some(IssueType::Format))
        .filter(|step| source_mentions(step, HEADING_TERMS))
        .filter_map(|step| step.source_issue_id.clone())
        .collect();

    if !heading_ids.is_empty() {
        for step in &mut steps {
            if step.issue_type == Some(IssueType::Structure) && source_mentions(step, TOC_TERMS) {
                step.depends_on.clone_from(&heading_ids);
            }
        }
    }
    steps
}

/// Builds the review plan, or `None` when nothing actionable remains.
pub(super) fn plan_from_review(review: &ReviewResult, user_intent: &str) -> Option<TaskPlan> {
    if is_inquiry(user_intent) {
        debug!("Review request is an inquiry; not planning");
        return None;
    }
    if review.issues.is_empty() {
        return None;
    }

    let steps: Vec<TaskStep> = review.issues.iter().filter_map(step_from_finding).collect();
    let steps = order_and_link(steps);
    debug!(
        "Derived {} steps from {} findings",
        steps.len(),
        review.issues.len()
    );

    TaskPlan::new(
        format!("Resolve {} review findings", review.issues.len()),
        user_intent,
        PlanSource::Review,
        steps,
    )
    .map(|plan| plan.with_source_issue_count(review.issues.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_priority() {
        assert_eq!(Category::of("标题“引言”级别错误"), Category::Heading);
        assert_eq!(Category::of("目录中缺少部分标题"), Category::TableOfContents);
        assert_eq!(Category::of("行距过小"), Category::Spacing);
        assert_eq!(Category::of("字体不统一"), Category::Font);
        assert_eq!(Category::of("段落未居中"), Category::Alignment);
        assert_eq!(Category::of("“摘要”样式不对"), Category::GenericFormat);
        assert_eq!(Category::of("缺少页码"), Category::PageNumbers);
        assert_eq!(Category::of("图片太大"), Category::Image);
        assert_eq!(Category::of("表格没有边框"), Category::Table);
        assert_eq!(Category::of("存在错别字"), Category::Content);
        assert_eq!(Category::of("引用来源缺失"), Category::Uncategorized);
    }

    #[test]
    fn test_heading_without_target_is_skipped() {
        let finding = ReviewFinding::new(0, "标题层级不正确");
        assert!(step_from_finding(&finding).is_none());
    }

    #[test]
    fn test_heading_with_quoted_target() {
        let finding = ReviewFinding::new(2, "标题“研究方法”应为二级标题");
        let step = step_from_finding(&finding).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_apply_style"));
        assert_eq!(step.tool_args["styleName"], json!("Heading 2"));
        assert_eq!(step.tool_args["searchText"], json!("研究方法"));
        assert_eq!(step.source_issue_id.as_deref(), Some("issue-2"));
        assert_eq!(step.issue_type, Some(IssueType::Format));
    }

    #[test]
    fn test_heading_without_style_name_becomes_comment() {
        let finding = ReviewFinding::new(3, "标题“研究方法”字号过小").with_suggestion("改为三号");
        let step = step_from_finding(&finding).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_add_comment"));
        assert!(step.tool_args.get("styleName").is_none());
        assert_eq!(step.tool_args["searchText"], json!("研究方法"));
        assert_eq!(step.tool_args["comment"], json!("标题“研究方法”字号过小: 改为三号"));
        assert_eq!(step.issue_type, Some(IssueType::Format));
    }

    #[test]
    fn test_generic_format_uses_location_target() {
        let finding = ReviewFinding::new(1, "样式不统一")
            .with_location("第三章")
            .with_suggestion("加粗并居中");
        let step = step_from_finding(&finding).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_format_text"));
        assert_eq!(step.tool_args["location"], json!("第三章"));
        assert_eq!(step.tool_args["bold"], json!(true));
        assert_eq!(step.tool_args["alignment"], json!("center"));
        assert_eq!(step.location_hint.as_deref(), Some("第三章"));
    }

    #[test]
    fn test_content_find_replace() {
        let finding = ReviewFinding::new(4, "错别字“帐号”")
            .with_suggestion("改为“账号”");
        let step = step_from_finding(&finding).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_find_replace"));
        assert_eq!(step.tool_args["findText"], json!("帐号"));
        assert_eq!(step.tool_args["replaceText"], json!("账号"));
    }

    #[test]
    fn test_content_without_quotes_falls_back_to_comment() {
        let finding = ReviewFinding::new(4, "部分内容表述不清").with_suggestion("精简措辞");
        let step = step_from_finding(&finding).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_add_comment"));
        assert_eq!(step.issue_type, Some(IssueType::Content));
    }

    #[test]
    fn test_uncategorized_uses_expected_tool_and_type_hint() {
        let finding = ReviewFinding::new(7, "引用来源缺失")
            .with_type("content")
            .with_expected_tools(vec!["word_insert_footnote".to_owned()]);
        let step = step_from_finding(&finding).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_insert_footnote"));
        assert_eq!(step.issue_type, Some(IssueType::Content));

        let step = step_from_finding(&ReviewFinding::new(8, "引用来源缺失")).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_add_comment"));
        assert_eq!(step.issue_type, Some(IssueType::Other));
    }

    #[test]
    fn test_toc_update_or_insert() {
        let step = step_from_finding(&ReviewFinding::new(0, "目录已过时")).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_update_toc"));
        let step = step_from_finding(&ReviewFinding::new(0, "缺少目录")).unwrap();
        assert_eq!(step.tool_name.as_deref(), Some("word_insert_toc"));
        assert_eq!(step.issue_type, Some(IssueType::Structure));
    }

    #[test]
    fn test_inquiry_detection() {
        assert!(is_inquiry("这些问题是什么意思？"));
        assert!(is_inquiry("Explain the findings"));
        assert!(!is_inquiry("修复这些问题"));
        assert!(!is_inquiry("根据审查结果进行修改"));
    }

    #[test]
    fn test_edit_verbs_override_inquiry_phrasing() {
        for intent in [
            "帮我看看并删除审查发现的问题",
            "按审查意见统一格式，然后告诉我结果",
            "Delete what the review found",
            "Insert the page numbers the review found missing, and explain",
        ] {
            assert!(!is_inquiry(intent), "{intent} should be an edit request");
        }
    }

    #[test]
    fn test_english_toc_finding_counts_as_toc() {
        assert_eq!(Category::of("TOC is outdated"), Category::TableOfContents);
        assert_eq!(Category::of("Protocol section heading is wrong"), Category::Heading);
    }
}
