//! Pre-authored plan templates keyed by trigger phrases.

use std::sync::LazyLock;

use quill_core::{RiskLevel, TaskStep, into_args};
use serde_json::{Map, Value, json};

use crate::text::contains_any;

/// One literal step of a template.
#[derive(Debug, Clone)]
pub struct TemplateStep {
    description: &'static str,
    tool: &'static str,
    args: Map<String, Value>,
    risk: RiskLevel,
    estimated_time_ms: u64,
}

impl TemplateStep {
    fn new(description: &'static str, tool: &'static str, args: Value) -> Self {
        Self {
            description,
            tool,
            args: into_args(args),
            risk: RiskLevel::Low,
            estimated_time_ms: 1_000,
        }
    }

    #[must_use]
    fn risk(mut self, risk: RiskLevel) -> Self {
        self.risk = risk;
        self
    }

    #[must_use]
    fn time(mut self, estimated_time_ms: u64) -> Self {
        self.estimated_time_ms = estimated_time_ms;
        self
    }

    /// Instantiates the step; arguments are copied, never shared
    pub fn instantiate(&self, require_confirmation: bool) -> TaskStep {
        let step = TaskStep::new(self.description)
            .with_tool(self.tool)
            .with_args(self.args.clone())
            .with_risk(self.risk)
            .with_estimated_time(self.estimated_time_ms);
        if require_confirmation {
            step.with_confirmation(true)
        } else {
            step
        }
    }
}

/// A named, trigger-keyed list of steps.
#[derive(Debug, Clone)]
pub struct PlanTemplate {
    /// Stable template identifier
    pub name: &'static str,
    /// Title given to plans built from this template
    pub title: &'static str,
    triggers: &'static [&'static str],
    steps: Vec<TemplateStep>,
}

impl PlanTemplate {
    /// Whether the lowercased request contains any trigger phrase
    pub fn matches(&self, lower: &str) -> bool {
        contains_any(lower, self.triggers)
    }

    /// The template's steps
    pub fn steps(&self) -> &[TemplateStep] {
        &self.steps
    }
}

/// Templates in matching order; the first match wins.
pub static TEMPLATES: LazyLock<Vec<PlanTemplate>> = LazyLock::new(|| {
    vec![
        PlanTemplate {
            name: "academic_paper",
            title: "Format as an academic paper",
            triggers: &["论文", "学术", "毕业设计", "academic paper", "thesis", "dissertation"],
            steps: vec![
                TemplateStep::new(
                    "Set standard page margins",
                    "word_set_page_margins",
                    json!({"top": 2.54, "bottom": 2.54, "left": 3.17, "right": 3.17, "unit": "cm"}),
                ),
                TemplateStep::new(
                    "Apply heading styles to section titles",
                    "word_apply_heading_styles",
                    json!({"levels": 3, "numbering": true}),
                )
                .risk(RiskLevel::Medium)
                .time(2_000),
                TemplateStep::new(
                    "Set body font to SimSun 12pt",
                    "word_set_font",
                    json!({"fontName": "宋体", "fontSize": 12, "scope": "body"}),
                ),
                TemplateStep::new(
                    "Set 1.5 line spacing",
                    "word_set_paragraph_spacing",
                    json!({"lineSpacing": 1.5, "unit": "multiple", "scope": "body"}),
                ),
                TemplateStep::new(
                    "Insert table of contents",
                    "word_insert_toc",
                    json!({"position": "start", "levels": 3}),
                )
                .risk(RiskLevel::Medium)
                .time(2_000),
                TemplateStep::new(
                    "Insert page numbers",
                    "word_insert_page_numbers",
                    json!({"position": "bottom", "alignment": "center"}),
                ),
            ],
        },
        PlanTemplate {
            name: "business_report",
            title: "Format as a business report",
            triggers: &[
                "商务报告",
                "商业报告",
                "工作报告",
                "年度报告",
                "business report",
                "annual report",
            ],
            steps: vec![
                TemplateStep::new(
                    "Apply the report title style",
                    "word_apply_style",
                    json!({"location": "first paragraph", "styleName": "Title"}),
                ),
                TemplateStep::new(
                    "Apply heading styles to section titles",
                    "word_apply_heading_styles",
                    json!({"levels": 2, "numbering": false}),
                )
                .risk(RiskLevel::Medium)
                .time(2_000),
                TemplateStep::new(
                    "Set body font to Microsoft YaHei 11pt",
                    "word_set_font",
                    json!({"fontName": "微软雅黑", "fontSize": 11, "scope": "body"}),
                ),
                TemplateStep::new(
                    "Format all tables",
                    "word_format_table",
                    json!({"style": "Grid Table 4", "autoFit": true, "borders": true}),
                )
                .time(1_500),
                TemplateStep::new(
                    "Add a document header",
                    "word_add_header",
                    json!({"text": "", "alignment": "right"}),
                ),
                TemplateStep::new(
                    "Insert page numbers",
                    "word_insert_page_numbers",
                    json!({"position": "bottom", "alignment": "right"}),
                ),
            ],
        },
        PlanTemplate {
            name: "table_of_contents",
            title: "Generate a table of contents",
            triggers: &[
                "生成目录",
                "插入目录",
                "添加目录",
                "创建目录",
                "generate toc",
                "insert a table of contents",
                "add a table of contents",
                "generate a table of contents",
            ],
            steps: vec![
                TemplateStep::new(
                    "Apply heading styles so the table of contents has entries",
                    "word_apply_heading_styles",
                    json!({"levels": 3, "numbering": false}),
                )
                .risk(RiskLevel::Medium)
                .time(2_000),
                TemplateStep::new(
                    "Insert table of contents",
                    "word_insert_toc",
                    json!({"position": "start", "levels": 3}),
                )
                .risk(RiskLevel::Medium)
                .time(2_000),
            ],
        },
        PlanTemplate {
            name: "document_cleanup",
            title: "Clean up the document",
            triggers: &[
                "清理文档",
                "清除空行",
                "删除空行",
                "删除多余空格",
                "clean up the document",
                "remove empty lines",
                "remove blank lines",
            ],
            steps: vec![
                TemplateStep::new(
                    "Remove empty paragraphs",
                    "word_remove_empty_paragraphs",
                    json!({}),
                )
                .risk(RiskLevel::Medium),
                TemplateStep::new(
                    "Collapse repeated spaces",
                    "word_find_replace",
                    json!({"findText": "  ", "replaceText": " ", "matchAll": true}),
                )
                .risk(RiskLevel::Medium),
                TemplateStep::new(
                    "Normalize paragraph spacing",
                    "word_set_paragraph_spacing",
                    json!({"spaceBefore": 0, "spaceAfter": 6, "unit": "pt", "scope": "body"}),
                ),
            ],
        },
        PlanTemplate {
            name: "document_formatting",
            title: "Standardize document formatting",
            triggers: &[
                "格式化文档",
                "整理格式",
                "统一格式",
                "排版文档",
                "format the document",
                "reformat",
            ],
            steps: vec![
                TemplateStep::new(
                    "Apply heading styles to section titles",
                    "word_apply_heading_styles",
                    json!({"levels": 3, "numbering": false}),
                )
                .risk(RiskLevel::Medium)
                .time(2_000),
                TemplateStep::new(
                    "Unify body font",
                    "word_set_font",
                    json!({"fontName": "宋体", "fontSize": 12, "scope": "body"}),
                ),
                TemplateStep::new(
                    "Unify line spacing",
                    "word_set_paragraph_spacing",
                    json!({"lineSpacing": 1.5, "unit": "multiple", "scope": "body"}),
                ),
                TemplateStep::new(
                    "Justify body paragraphs",
                    "word_set_alignment",
                    json!({"alignment": "justify", "scope": "body"}),
                )
                .time(800),
            ],
        },
        PlanTemplate {
            name: "data_report",
            title: "Build a data report",
            triggers: &[
                "数据报告",
                "数据分析报告",
                "销售报表",
                "data report",
                "sales report",
            ],
            steps: vec![
                TemplateStep::new(
                    "Sort the data range",
                    "excel_sort_range",
                    json!({"range": "A1", "column": "A", "ascending": true, "hasHeader": true}),
                )
                .risk(RiskLevel::Medium),
                TemplateStep::new(
                    "Insert a summary chart",
                    "excel_insert_chart",
                    json!({"chartType": "column", "range": "A1"}),
                )
                .time(2_500),
                TemplateStep::new(
                    "Auto-fit column widths",
                    "excel_auto_fit_columns",
                    json!({}),
                )
                .time(500),
            ],
        },
    ]
});

/// First template whose triggers appear in `lower`
pub fn find_template(lower: &str) -> Option<&'static PlanTemplate> {
    TEMPLATES.iter().find(|template| template.matches(lower))
}
