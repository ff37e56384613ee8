//! Canned plan constructors.

use std::fmt;
use std::str::FromStr;

use quill_core::{Error, PlanSource, RiskLevel, TaskPlan, TaskStep, into_args};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Document style categories with a canned formatting plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStyle {
    /// Serif body, justified, 1.5 spacing
    Academic,
    /// Sans-serif body, tight spacing
    Business,
    /// Relaxed spacing, left aligned
    Casual,
}

impl fmt::Display for DocumentStyle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Academic => write!(formatter, "academic"),
            Self::Business => write!(formatter, "business"),
            Self::Casual => write!(formatter, "casual"),
        }
    }
}

impl FromStr for DocumentStyle {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "academic" | "学术" => Ok(Self::Academic),
            "business" | "商务" => Ok(Self::Business),
            "casual" | "日常" => Ok(Self::Casual),
            other => Err(Error::Other(format!("Unknown document style: {other}"))),
        }
    }
}

struct StyleSpec {
    font_name: &'static str,
    font_size: f64,
    line_spacing: f64,
    alignment: &'static str,
    space_after_pt: u32,
}

impl DocumentStyle {
    const fn spec(self) -> StyleSpec {
        match self {
            Self::Academic => StyleSpec {
                font_name: "Times New Roman",
                font_size: 12.0,
                line_spacing: 1.5,
                alignment: "justify",
                space_after_pt: 0,
            },
            Self::Business => StyleSpec {
                font_name: "Calibri",
                font_size: 11.0,
                line_spacing: 1.15,
                alignment: "left",
                space_after_pt: 6,
            },
            Self::Casual => StyleSpec {
                font_name: "Arial",
                font_size: 11.0,
                line_spacing: 1.5,
                alignment: "left",
                space_after_pt: 10,
            },
        }
    }
}

/// Formatting plan for a document style
pub fn style_plan(style: DocumentStyle) -> TaskPlan {
    let spec = style.spec();
    let numbered = style == DocumentStyle::Academic;
    let first = TaskStep::new(format!("Set body font to {} {}pt", spec.font_name, spec.font_size))
        .with_tool("word_set_font")
        .with_args(into_args(json!({
            "fontName": spec.font_name,
            "fontSize": spec.font_size,
            "scope": "body",
        })))
        .with_estimated_time(1_000);

    let rest = vec![
        TaskStep::new(format!("Set line spacing to {}", spec.line_spacing))
            .with_tool("word_set_paragraph_spacing")
            .with_args(into_args(json!({
                "lineSpacing": spec.line_spacing,
                "spaceAfter": spec.space_after_pt,
                "unit": "multiple",
                "scope": "body",
            })))
            .with_estimated_time(1_000),
        TaskStep::new(format!("Align body paragraphs {}", spec.alignment))
            .with_tool("word_set_alignment")
            .with_args(into_args(json!({"alignment": spec.alignment, "scope": "body"})))
            .with_estimated_time(800),
        TaskStep::new("Apply heading styles")
            .with_tool("word_apply_heading_styles")
            .with_args(into_args(json!({"levels": 3, "numbering": numbered})))
            .with_risk(RiskLevel::Medium)
            .with_estimated_time(2_000),
    ];

    TaskPlan::from_first(
        format!("Apply {style} style"),
        format!("Format document in {style} style"),
        PlanSource::Template,
        first,
        rest,
    )
}

/// One-step plan wrapping a single tool call
pub fn single_tool_plan<N, D>(tool_name: N, arguments: Map<String, Value>, description: D) -> TaskPlan
where
    N: Into<String>,
    D: Into<String>,
{
    let tool_name = tool_name.into();
    let description = description.into();
    let step = TaskStep::new(description.clone())
        .with_tool(tool_name.clone())
        .with_args(arguments);
    TaskPlan::from_first(
        format!("Run {tool_name}"),
        description,
        PlanSource::Template,
        step,
        Vec::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parsing() {
        assert_eq!("Academic".parse::<DocumentStyle>().unwrap(), DocumentStyle::Academic);
        assert_eq!(" business ".parse::<DocumentStyle>().unwrap(), DocumentStyle::Business);
        assert!("gothic".parse::<DocumentStyle>().is_err());
    }

    #[test]
    fn test_style_plans_differ() {
        let academic = style_plan(DocumentStyle::Academic);
        let casual = style_plan(DocumentStyle::Casual);
        assert_eq!(academic.len(), 4);
        assert_eq!(academic.steps()[0].tool_args["fontName"], json!("Times New Roman"));
        assert_eq!(casual.steps()[0].tool_args["fontName"], json!("Arial"));
        assert_eq!(academic.max_risk(), RiskLevel::Medium);
    }

    #[test]
    fn test_single_tool_plan() {
        let mut args = Map::new();
        args.insert("text".to_owned(), json!("Draft"));
        let plan = single_tool_plan("word_add_watermark", args, "Add a draft watermark");
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps()[0].resolved_tool(), Some("word_add_watermark"));
        assert_eq!(plan.original_request(), "Add a draft watermark");
    }
}
