//! Small argument extractors over free-text findings and requests.
//!
//! Each extractor looks for one kind of value (a quoted target, a style name,
//! a spacing value, font settings, an alignment, a color) and returns `None`
//! when the text does not state it. Callers decide on defaults.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value, json};

use crate::text::{compile, contains_any};

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"“([^”]+)”|"([^"]+)"|「([^」]+)」|『([^』]+)』|‘([^’]+)’"#)
});

static HEADING_LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)标题\s*([1-9])|([一二三四五六1-9])\s*级标题|heading\s*([1-9])")
});

static SPACING: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)(\d+(?:\.\d+)?)\s*(倍|磅|pt|行|lines?|px|cm|mm)")
});

static FONT_POINTS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(\d+(?:\.\d+)?)\s*(?:磅|pt|points?)"));

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| compile(r"#[0-9a-fA-F]{6}\b"));

const FONT_NAMES: &[&str] = &[
    "微软雅黑", "宋体", "黑体", "楷体", "仿宋", "Times New Roman", "Arial", "Calibri", "Cambria",
];

/// Chinese named font sizes in points; "小" variants first so "小四" wins over "四号"
const NAMED_SIZES: &[(&str, f64)] = &[
    ("小初", 36.0),
    ("小一", 24.0),
    ("小二", 18.0),
    ("小三", 15.0),
    ("小四", 12.0),
    ("小五", 9.0),
    ("初号", 42.0),
    ("一号", 26.0),
    ("二号", 22.0),
    ("三号", 16.0),
    ("四号", 14.0),
    ("五号", 10.5),
];

const NAMED_COLORS: &[(&[&str], &str)] = &[
    (&["红色", "标红", "red"], "#FF0000"),
    (&["蓝色", "blue"], "#0000FF"),
    (&["绿色", "green"], "#008000"),
    (&["黑色", "black"], "#000000"),
    (&["灰色", "gray", "grey"], "#808080"),
    (&["黄色", "yellow"], "#FFFF00"),
    (&["橙色", "orange"], "#FFA500"),
    (&["紫色", "purple"], "#800080"),
    (&["白色", "white"], "#FFFFFF"),
];

/// Every quoted segment in `text`, in order of appearance
pub fn quoted_segments(text: &str) -> Vec<String> {
    QUOTED
        .captures_iter(text)
        .filter_map(|captures| {
            captures
                .iter()
                .skip(1)
                .flatten()
                .next()
                .map(|found| found.as_str().trim().to_owned())
        })
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// What an edit applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// Literal text to search for
    Text(String),
    /// A described location such as "第二章"
    Location(String),
}

impl EditTarget {
    /// Resolves a target: quoted text in `issue` first, then `location`.
    pub fn resolve(issue: &str, location: Option<&str>) -> Option<Self> {
        if let Some(text) = quoted_segments(issue).into_iter().next() {
            return Some(Self::Text(text));
        }
        location
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .map(|location| Self::Location(location.to_owned()))
    }

    /// Human-readable form for step descriptions
    pub fn describe(&self) -> String {
        match self {
            Self::Text(text) => format!("“{text}”"),
            Self::Location(location) => location.clone(),
        }
    }

    /// Writes the target into a tool argument map
    pub fn write_to(&self, args: &mut Map<String, Value>) {
        match self {
            Self::Text(text) => args.insert("searchText".to_owned(), json!(text)),
            Self::Location(location) => args.insert("location".to_owned(), json!(location)),
        };
    }
}

/// Paragraph style named in `text`, e.g. "Heading 2" for "二级标题"
pub fn style_name(text: &str) -> Option<String> {
    if let Some(captures) = HEADING_LEVEL.captures(text) {
        let digit = captures
            .iter()
            .skip(1)
            .flatten()
            .next()
            .and_then(|found| heading_level(found.as_str()));
        if let Some(level) = digit {
            return Some(format!("Heading {level}"));
        }
    }
    let lower = text.to_lowercase();
    let named = [
        (&["副标题", "subtitle"][..], "Subtitle"),
        (&["正文", "normal", "body text"][..], "Normal"),
        (&["引用", "quote"][..], "Quote"),
    ];
    named
        .iter()
        .find(|(terms, _)| contains_any(&lower, terms))
        .map(|(_, style)| (*style).to_owned())
}

fn heading_level(token: &str) -> Option<u8> {
    match token {
        "一" => Some(1),
        "二" => Some(2),
        "三" => Some(3),
        "四" => Some(4),
        "五" => Some(5),
        "六" => Some(6),
        digits => digits.parse().ok(),
    }
}

/// A paragraph spacing value with the property it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacingSetting {
    /// `spaceBefore`, `spaceAfter` or `lineSpacing`
    pub property: &'static str,
    /// Numeric amount
    pub value: f64,
    /// `multiple`, `pt`, `lines`, `px`, `cm` or `mm`
    pub unit: &'static str,
}

impl SpacingSetting {
    /// Default body line spacing
    pub fn default_line_spacing() -> Self {
        Self {
            property: "lineSpacing",
            value: 1.5,
            unit: "multiple",
        }
    }

    /// Tool arguments for this setting
    pub fn to_args(&self) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert(self.property.to_owned(), json!(self.value));
        args.insert("unit".to_owned(), json!(self.unit));
        args
    }
}

/// First number-plus-unit spacing value in `text`
pub fn spacing_value(text: &str) -> Option<SpacingSetting> {
    let captures = SPACING.captures(text)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = match captures.get(2)?.as_str().to_lowercase().as_str() {
        "倍" => "multiple",
        "磅" | "pt" => "pt",
        "行" | "line" | "lines" => "lines",
        "px" => "px",
        "cm" => "cm",
        _ => "mm",
    };
    let lower = text.to_lowercase();
    let property = if contains_any(&lower, &["段前", "before"]) {
        "spaceBefore"
    } else if contains_any(&lower, &["段后", "after"]) {
        "spaceAfter"
    } else {
        "lineSpacing"
    };
    Some(SpacingSetting {
        property,
        value,
        unit,
    })
}

/// Character formatting named in a piece of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontSettings {
    /// Font family
    pub name: Option<String>,
    /// Size in points
    pub size: Option<f64>,
    /// Requested bold state
    pub bold: Option<bool>,
}

impl FontSettings {
    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.size.is_none() && self.bold.is_none()
    }

    /// Fills unset fields from `other`
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            name: self.name.or(other.name),
            size: self.size.or(other.size),
            bold: self.bold.or(other.bold),
        }
    }

    /// Writes the set fields into a tool argument map
    pub fn write_to(&self, args: &mut Map<String, Value>) {
        if let Some(name) = &self.name {
            args.insert("fontName".to_owned(), json!(name));
        }
        if let Some(size) = self.size {
            args.insert("fontSize".to_owned(), json!(size));
        }
        if let Some(bold) = self.bold {
            args.insert("bold".to_owned(), json!(bold));
        }
    }
}

/// Font name, size and weight stated in `text`
pub fn font_settings(text: &str) -> FontSettings {
    let lower = text.to_lowercase();

    let name = FONT_NAMES
        .iter()
        .find(|name| lower.contains(&name.to_lowercase()))
        .map(|name| (*name).to_owned());

    let size = NAMED_SIZES
        .iter()
        .find(|(label, _)| text.contains(label))
        .map(|(_, points)| *points)
        .or_else(|| {
            FONT_POINTS
                .captures(text)
                .and_then(|captures| captures.get(1))
                .and_then(|found| found.as_str().parse().ok())
        });

    let bold = if contains_any(&lower, &["取消加粗", "不加粗", "不要加粗", "unbold", "not bold"]) {
        Some(false)
    } else if contains_any(&lower, &["加粗", "粗体", "bold"]) {
        Some(true)
    } else {
        None
    };

    FontSettings { name, size, bold }
}

/// Paragraph alignment stated in `text`
pub fn alignment(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    let table: [(&[&str], &'static str); 4] = [
        (&["两端对齐", "justify", "justified"], "justify"),
        (&["居中", "center", "centre", "centered"], "center"),
        (&["左对齐", "靠左", "left"], "left"),
        (&["右对齐", "靠右", "right"], "right"),
    ];
    table
        .iter()
        .find(|(terms, _)| contains_any(&lower, terms))
        .map(|(_, value)| *value)
}

/// Color stated in `text` as a `#RRGGBB` hex string
pub fn color(text: &str) -> Option<String> {
    if let Some(found) = HEX_COLOR.find(text) {
        return Some(found.as_str().to_uppercase());
    }
    let lower = text.to_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(terms, _)| contains_any(&lower, terms))
        .map(|(_, hex)| (*hex).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_segments() {
        assert_eq!(
            quoted_segments("将“引言”和「结论」设为标题"),
            vec!["引言".to_owned(), "结论".to_owned()]
        );
        assert_eq!(quoted_segments(r#"replace "teh" here"#), vec!["teh".to_owned()]);
        assert!(quoted_segments("没有引号").is_empty());
    }

    #[test]
    fn test_edit_target_prefers_quotes() {
        assert_eq!(
            EditTarget::resolve("“第一章”格式错误", Some("第二页")),
            Some(EditTarget::Text("第一章".to_owned()))
        );
        assert_eq!(
            EditTarget::resolve("格式错误", Some(" 第二页 ")),
            Some(EditTarget::Location("第二页".to_owned()))
        );
        assert_eq!(EditTarget::resolve("格式错误", Some("  ")), None);
    }

    #[test]
    fn test_style_name() {
        assert_eq!(style_name("应设为二级标题").as_deref(), Some("Heading 2"));
        assert_eq!(style_name("使用标题1样式").as_deref(), Some("Heading 1"));
        assert_eq!(style_name("Use Heading 3").as_deref(), Some("Heading 3"));
        assert_eq!(style_name("改为正文样式").as_deref(), Some("Normal"));
        assert_eq!(style_name("格式不统一"), None);
    }

    #[test]
    fn test_spacing_value() {
        let spacing = spacing_value("行距应为1.5倍").unwrap();
        assert_eq!(spacing.property, "lineSpacing");
        assert_eq!(spacing.value, 1.5);
        assert_eq!(spacing.unit, "multiple");

        let spacing = spacing_value("段前间距设为12磅").unwrap();
        assert_eq!(spacing.property, "spaceBefore");
        assert_eq!(spacing.unit, "pt");

        assert!(spacing_value("行距太小").is_none());
    }

    #[test]
    fn test_font_settings() {
        let font = font_settings("正文应使用宋体小四号");
        assert_eq!(font.name.as_deref(), Some("宋体"));
        assert_eq!(font.size, Some(12.0));
        assert_eq!(font.bold, None);

        let font = font_settings("Use Times New Roman 11pt, bold");
        assert_eq!(font.name.as_deref(), Some("Times New Roman"));
        assert_eq!(font.size, Some(11.0));
        assert_eq!(font.bold, Some(true));

        assert_eq!(font_settings("取消加粗").bold, Some(false));
        assert!(font_settings("字体不统一").is_empty());
    }

    #[test]
    fn test_alignment_and_color() {
        assert_eq!(alignment("标题应居中"), Some("center"));
        assert_eq!(alignment("正文两端对齐"), Some("justify"));
        assert_eq!(alignment("align left"), Some("left"));
        assert_eq!(color("改为红色"), Some("#FF0000".to_owned()));
        assert_eq!(color("use #1f2a3b"), Some("#1F2A3B".to_owned()));
        assert_eq!(color("无颜色"), None);
    }
}
