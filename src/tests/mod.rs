use crate::parser::{parse, Section, SectionKind, LINE_BREAK};
use crate::render::{render, render_report, ReportView, StyleToken};

const FULL_REPORT: &str = "AI分析结果:
问题分类: 设计缺陷
系统内部原因分析: 散热结构设计余量不足
- 风道截面偏小
系统外部原因分析: 车间环境温度偏高
解决方案: 重新设计风道
1. 增大进风口
2. 增加温度监控
问题严重程度: 高
发现阶段: 使用
根本原因分析: 设计阶段未做满负荷热仿真
";

#[test]
fn full_report_yields_seven_sections_in_source_order() {
    let report = parse(FULL_REPORT);
    let kinds: Vec<_> = report.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, SectionKind::ALL.to_vec());
    assert_eq!(
        report.sections()[3],
        Section::new(
            SectionKind::Solution,
            "重新设计风道<br>1. 增大进风口<br>2. 增加温度监控"
        )
    );
}

#[test]
fn full_report_loses_only_whitespace() {
    let report = parse(FULL_REPORT);
    let rebuilt: String = report
        .iter()
        .map(|s| format!("{}{}", s.kind.marker(), s.content.replace(LINE_BREAK, "")))
        .collect();
    let expected: String = FULL_REPORT
        .lines()
        .skip(1)
        .flat_map(|line| line.chars().filter(|c| !c.is_whitespace()))
        .collect();
    let rebuilt: String = rebuilt.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(rebuilt, expected);
}

#[test]
fn parse_is_total_over_odd_inputs() {
    let inputs = [
        "",
        "\n",
        ":::",
        "- ",
        "1.",
        "问题分类",
        "问题分类:",
        "问题分类:问题分类:",
        "\u{0}\u{feff}解决方案:\t",
        "😀 发现阶段: 维护 😀",
    ];
    for input in inputs {
        let report = parse(input);
        for section in report.iter() {
            assert!(!section.content.is_empty(), "{input:?}");
        }
    }
}

#[test]
fn marker_repeated_on_one_line_keeps_remainder() {
    let report = parse("问题分类:问题分类: 设计缺陷");
    assert_eq!(report.sections()[0].content, "问题分类: 设计缺陷");
}

#[test]
fn rendered_fragments_follow_style_table() {
    let view = render_report(FULL_REPORT);
    let styles: Vec<_> = view.fragments().iter().map(|f| f.style_class).collect();
    assert_eq!(
        styles,
        vec![
            StyleToken::Secondary,
            StyleToken::Info,
            StyleToken::WarningDark,
            StyleToken::Success,
            StyleToken::Danger,
            StyleToken::Secondary,
            StyleToken::Secondary,
        ]
    );
}

#[test]
fn simulated_backend_analysis_keeps_recognized_sections() {
    // Shape produced by the backend when no AI provider is configured.
    let raw = "AI分析结果:\n    \n问题分类: 设计缺陷\n原因分析: 设计阶段考虑不周\n解决方案: 建议重新评估设计方案\n严重程度: 中等\n发现阶段: 设计    \n\n原始问题: 散热不良 - 温度过高\n    ";
    let report = parse(raw);
    let kinds: Vec<_> = report.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::ProblemCategory,
            SectionKind::Solution,
            SectionKind::DiscoveryPhase
        ]
    );
    assert_eq!(report.sections()[0].content, "设计缺陷<br>原因分析: 设计阶段考虑不周");
    assert_eq!(
        report.sections()[1].content,
        "建议重新评估设计方案<br>严重程度: 中等"
    );
    assert_eq!(report.sections()[2].content, "设计<br>原始问题: 散热不良 - 温度过高");
}

#[test]
fn severity_render_examples() {
    let style = |content: &str| render(&Section::new(SectionKind::Severity, content)).style_class;
    assert_eq!(style("高风险"), StyleToken::Danger);
    assert_eq!(style("中等"), StyleToken::Primary);
    assert_eq!(style("无风险"), StyleToken::Secondary);
}

#[test]
fn verbatim_view_serializes_with_tag() {
    let view = render_report("no markers here");
    assert!(matches!(view, ReportView::Verbatim(_)));
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["view"], "verbatim");
    assert_eq!(json["data"], "no markers here");
}
