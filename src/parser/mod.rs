//! Line-oriented parser for free-text AI analysis reports.
//!
//! A report is a block of lines where some lines carry a fixed marker such as
//! `问题分类:`. Each marker opens a section that collects the remainder of its
//! own line plus every following non-marker line, until the next marker or
//! the end of input. Text before the first marker is dropped.

use std::fmt;

use log::debug;
use serde::Serialize;

/// Token placed between the lines accumulated into one section.
pub const LINE_BREAK: &str = "<br>";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ProblemCategory,
    InternalCause,
    ExternalCause,
    Solution,
    Severity,
    DiscoveryPhase,
    RootCause,
}

/// Markers in match priority order. The first marker contained in a line wins.
const MARKERS: [(&str, SectionKind); 7] = [
    ("问题分类:", SectionKind::ProblemCategory),
    ("系统内部原因分析:", SectionKind::InternalCause),
    ("系统外部原因分析:", SectionKind::ExternalCause),
    ("解决方案:", SectionKind::Solution),
    ("问题严重程度:", SectionKind::Severity),
    ("发现阶段:", SectionKind::DiscoveryPhase),
    ("根本原因分析:", SectionKind::RootCause),
];

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::ProblemCategory,
        SectionKind::InternalCause,
        SectionKind::ExternalCause,
        SectionKind::Solution,
        SectionKind::Severity,
        SectionKind::DiscoveryPhase,
        SectionKind::RootCause,
    ];

    /// The literal marker, colon included, that opens this section.
    pub fn marker(self) -> &'static str {
        MARKERS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(marker, _)| *marker)
            .unwrap_or_default()
    }

    /// Display title: the marker without its trailing colon.
    pub fn label(self) -> &'static str {
        self.marker().trim_end_matches(':')
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ProblemCategory => "problem_category",
            Self::InternalCause => "internal_cause",
            Self::ExternalCause => "external_cause",
            Self::Solution => "solution",
            Self::Severity => "severity",
            Self::DiscoveryPhase => "discovery_phase",
            Self::RootCause => "root_cause",
        }
    }

    /// Accepts the snake_case name, a few short aliases, or the Chinese label.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let lower = trimmed.to_lowercase().replace('-', "_");
        let by_name = match lower.as_str() {
            "problem_category" | "category" => Some(Self::ProblemCategory),
            "internal_cause" | "internal" => Some(Self::InternalCause),
            "external_cause" | "external" => Some(Self::ExternalCause),
            "solution" => Some(Self::Solution),
            "severity" => Some(Self::Severity),
            "discovery_phase" | "phase" => Some(Self::DiscoveryPhase),
            "root_cause" | "root" => Some(Self::RootCause),
            _ => None,
        };
        by_name.or_else(|| {
            Self::ALL
                .into_iter()
                .find(|kind| kind.label() == trimmed.trim_end_matches(':'))
        })
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Accumulated lines joined by [`LINE_BREAK`].
    pub content: String,
}

impl Section {
    pub fn new(kind: SectionKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split(LINE_BREAK)
    }
}

/// Sections in the order their markers appear in the source text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedReport {
    sections: Vec<Section>,
}

impl ParsedReport {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// An empty report means no marker was recognized and the caller should
    /// show the raw text verbatim.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }
}

impl IntoIterator for ParsedReport {
    type Item = Section;
    type IntoIter = std::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParsedReport {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Marker { kind: SectionKind, rest: &'a str },
    ListItem(&'a str),
    Continuation(&'a str),
}

/// Strips whitespace and U+FEFF byte-order marks from both ends.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn find_marker(line: &str) -> Option<(SectionKind, &str)> {
    MARKERS.iter().find_map(|(marker, kind)| {
        line.find(marker)
            .map(|idx| (*kind, trim_line(&line[idx + marker.len()..])))
    })
}

fn is_list_item(line: &str) -> bool {
    if line.starts_with("- ") || line.starts_with("   -") {
        return true;
    }
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('1'..='5'), Some('.'))
    )
}

fn classify_line(line: &str) -> Line<'_> {
    if let Some((kind, rest)) = find_marker(line) {
        return Line::Marker { kind, rest };
    }
    if is_list_item(line) {
        return Line::ListItem(line);
    }
    Line::Continuation(line)
}

struct OpenSection {
    kind: SectionKind,
    content: String,
}

impl OpenSection {
    fn flush_into(self, out: &mut Vec<Section>) {
        if self.content.is_empty() {
            debug!("dropping empty section {}", self.kind.name());
            return;
        }
        debug!(
            "section {} ({} bytes)",
            self.kind.name(),
            self.content.len()
        );
        out.push(Section::new(self.kind, self.content));
    }
}

/// Parse a raw report into ordered sections.
///
/// Never fails. A marker whose section collects no content is dropped, so a
/// lone `问题严重程度:` line produces an empty report.
pub fn parse(raw: &str) -> ParsedReport {
    let mut sections = Vec::new();
    let mut current: Option<OpenSection> = None;

    for line in raw.lines() {
        let line = trim_line(line);
        if line.is_empty() {
            continue;
        }

        match classify_line(line) {
            Line::Marker { kind, rest } => {
                if let Some(open) = current.take() {
                    open.flush_into(&mut sections);
                }
                current = Some(OpenSection {
                    kind,
                    content: rest.to_string(),
                });
            }
            Line::ListItem(item) => {
                if let Some(open) = current.as_mut() {
                    open.content.push_str(LINE_BREAK);
                    open.content.push_str(item);
                }
            }
            Line::Continuation(text) => {
                if let Some(open) = current.as_mut() {
                    if !open.content.is_empty() {
                        open.content.push_str(LINE_BREAK);
                    }
                    open.content.push_str(text);
                }
            }
        }
    }

    if let Some(open) = current.take() {
        open.flush_into(&mut sections);
    }

    ParsedReport { sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_sections() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n").is_empty());
    }

    #[test]
    fn text_without_markers_yields_no_sections() {
        let report = parse("设备运行正常\n- 无需处理\n1. 继续观察");
        assert!(report.is_empty());
    }

    #[test]
    fn marker_opens_section_and_collects_following_lines() {
        let report = parse("问题分类:设备故障\n系统内部原因分析:未及时维护\n- 缺乏保养计划");
        assert_eq!(
            report.sections(),
            &[
                Section::new(SectionKind::ProblemCategory, "设备故障"),
                Section::new(SectionKind::InternalCause, "未及时维护<br>- 缺乏保养计划"),
            ]
        );
    }

    #[test]
    fn lone_marker_without_content_is_dropped() {
        assert!(parse("问题严重程度:\n").is_empty());
    }

    #[test]
    fn empty_marker_is_dropped_when_next_marker_arrives() {
        let report = parse("问题严重程度:\n解决方案: 更换轴承");
        assert_eq!(
            report.sections(),
            &[Section::new(SectionKind::Solution, "更换轴承")]
        );
    }

    #[test]
    fn continuation_after_empty_marker_becomes_content() {
        let report = parse("解决方案:\n更换轴承\n重新校准");
        assert_eq!(
            report.sections(),
            &[Section::new(SectionKind::Solution, "更换轴承<br>重新校准")]
        );
    }

    #[test]
    fn list_item_after_empty_marker_keeps_leading_break() {
        let report = parse("解决方案:\n- 更换轴承");
        assert_eq!(report.sections()[0].content, "<br>- 更换轴承");
    }

    #[test]
    fn numbered_items_are_list_items() {
        let report = parse("解决方案: 分步处理\n1. 停机\n2. 检查\n5. 复测");
        assert_eq!(
            report.sections()[0].content,
            "分步处理<br>1. 停机<br>2. 检查<br>5. 复测"
        );
    }

    #[test]
    fn lines_before_first_marker_are_dropped() {
        let report = parse("AI分析结果:\n- 预处理\n问题分类: 设计缺陷");
        assert_eq!(
            report.sections(),
            &[Section::new(SectionKind::ProblemCategory, "设计缺陷")]
        );
    }

    #[test]
    fn repeated_marker_produces_separate_sections_in_order() {
        let report = parse("解决方案: 方案A\n问题严重程度: 高\n解决方案: 方案B");
        let kinds: Vec<_> = report.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Solution,
                SectionKind::Severity,
                SectionKind::Solution
            ]
        );
        assert_eq!(report.sections()[2].content, "方案B");
    }

    #[test]
    fn marker_priority_follows_fixed_order() {
        // Both markers appear; the earlier entry in the priority list wins.
        let report = parse("解决方案: 见问题分类: 设计缺陷");
        assert_eq!(report.sections()[0].kind, SectionKind::ProblemCategory);
        assert_eq!(report.sections()[0].content, "设计缺陷");
    }

    #[test]
    fn marker_may_appear_mid_line() {
        let report = parse("3. 问题严重程度: 中");
        assert_eq!(
            report.sections(),
            &[Section::new(SectionKind::Severity, "中")]
        );
    }

    #[test]
    fn blank_lines_do_not_split_sections() {
        let report = parse("根本原因分析: 润滑不足\n\n   \n油路堵塞\r\n");
        assert_eq!(
            report.sections(),
            &[Section::new(SectionKind::RootCause, "润滑不足<br>油路堵塞")]
        );
    }

    #[test]
    fn byte_order_marks_are_trimmed_like_whitespace() {
        let report = parse("\u{feff}问题分类: 设计缺陷\n\u{feff}\n\u{feff}- 风道偏小 \u{feff}");
        assert_eq!(
            report.sections(),
            &[Section::new(
                SectionKind::ProblemCategory,
                "设计缺陷<br>- 风道偏小"
            )]
        );
        assert!(parse("\u{feff}\n \u{feff} \n").is_empty());
    }

    #[test]
    fn six_dot_is_continuation_not_list_item() {
        assert_eq!(classify_line("6. 其他"), Line::Continuation("6. 其他"));
        assert_eq!(classify_line("3.检查"), Line::ListItem("3.检查"));
        assert_eq!(classify_line("-无空格"), Line::Continuation("-无空格"));
    }

    #[test]
    fn kind_parse_accepts_names_and_labels() {
        assert_eq!(SectionKind::parse("severity"), Some(SectionKind::Severity));
        assert_eq!(
            SectionKind::parse("root-cause"),
            Some(SectionKind::RootCause)
        );
        assert_eq!(
            SectionKind::parse("发现阶段"),
            Some(SectionKind::DiscoveryPhase)
        );
        assert_eq!(SectionKind::parse("unknown"), None);
    }

    #[test]
    fn every_kind_has_a_marker() {
        for kind in SectionKind::ALL {
            assert!(kind.marker().ends_with(':'));
            assert!(!kind.label().ends_with(':'));
        }
    }
}
