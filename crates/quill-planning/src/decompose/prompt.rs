//! Planning prompt for a downstream language model.

use super::review::ReviewFinding;

const OUTPUT_FORMAT: &str = r#"Respond with JSON only, in this shape:
{
  "title": "short plan title",
  "steps": [
    {
      "description": "what this step does",
      "toolName": "tool_to_call",
      "toolArgs": {},
      "riskLevel": "low | medium | high",
      "estimatedTime": 1000
    }
  ]
}"#;

const RULES: &[&str] = &[
    "Each step calls exactly one tool.",
    "Order steps so structural changes come before formatting, and formatting before content edits.",
    "Never apply a style to the whole document unless the request asks for it.",
    "Mark steps that delete or replace content as medium or high risk.",
    "Return an empty steps array if nothing needs to change.",
];

/// Formats the request, an optional summary and prior findings into a prompt.
pub fn build(request: &str, summary: Option<&str>, findings: &[ReviewFinding]) -> String {
    let mut sections = vec![
        "You are planning edits to an open document. Break the request into ordered tool calls."
            .to_owned(),
        format!("## Request\n{}", request.trim()),
    ];

    if let Some(summary) = summary.map(str::trim).filter(|summary| !summary.is_empty()) {
        sections.push(format!("## Document summary\n{summary}"));
    }

    if !findings.is_empty() {
        let lines: Vec<String> = findings.iter().map(finding_line).collect();
        sections.push(format!("## Known issues\n{}", lines.join("\n")));
    }

    let rules: Vec<String> = RULES.iter().map(|rule| format!("- {rule}")).collect();
    sections.push(format!("## Rules\n{}", rules.join("\n")));
    sections.push(format!("## Output format\n{OUTPUT_FORMAT}"));

    sections.join("\n\n")
}

fn finding_line(finding: &ReviewFinding) -> String {
    let mut line = format!("{}. {}", finding.index + 1, finding.issue.trim());
    if let Some(location) = finding.location.as_deref() {
        line.push_str(&format!(" (location: {location})"));
    }
    if let Some(suggestion) = finding.suggestion.as_deref() {
        line.push_str(&format!("\n   Suggested fix: {suggestion}"));
    }
    if !finding.expected_tools.is_empty() {
        line.push_str(&format!(
            "\n   Candidate tools: {}",
            finding.expected_tools.join(", ")
        ));
    }
    line
}
