use serde::Serialize;

use crate::parser::{self, ParsedReport, Section, SectionKind};

/// Presentation style attached to a rendered section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleToken {
    Info,
    WarningDark,
    Success,
    Danger,
    Primary,
    Secondary,
}

impl StyleToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::WarningDark => "warning-dark",
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }

    /// Bootstrap badge classes used by the admin console.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Info => "bg-info",
            Self::WarningDark => "bg-warning text-dark",
            Self::Success => "bg-success",
            Self::Danger => "bg-danger",
            Self::Primary => "bg-primary",
            Self::Secondary => "bg-secondary",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayFragment {
    pub kind: SectionKind,
    pub title: String,
    pub style_class: StyleToken,
    /// Section content, lines still joined by [`parser::LINE_BREAK`].
    pub body: String,
}

impl DisplayFragment {
    pub fn body_lines(&self) -> impl Iterator<Item = &str> {
        self.body.split(parser::LINE_BREAK)
    }
}

fn severity_style(content: &str) -> StyleToken {
    let lower = content.to_lowercase();
    if lower.contains('高') || lower.contains("严重") {
        StyleToken::Danger
    } else if lower.contains('中') {
        StyleToken::Primary
    } else if lower.contains('低') {
        StyleToken::Success
    } else {
        StyleToken::Secondary
    }
}

pub fn style_for(section: &Section) -> StyleToken {
    match section.kind {
        SectionKind::InternalCause => StyleToken::Info,
        SectionKind::ExternalCause => StyleToken::WarningDark,
        SectionKind::Solution => StyleToken::Success,
        SectionKind::Severity => severity_style(&section.content),
        SectionKind::ProblemCategory | SectionKind::DiscoveryPhase | SectionKind::RootCause => {
            StyleToken::Secondary
        }
    }
}

pub fn render(section: &Section) -> DisplayFragment {
    DisplayFragment {
        kind: section.kind,
        title: section.kind.label().to_string(),
        style_class: style_for(section),
        body: section.content.clone(),
    }
}

/// What the presentation layer should show for one report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum ReportView {
    Sections(Vec<DisplayFragment>),
    /// No marker was recognized; show the raw text in a preformatted block.
    Verbatim(String),
}

impl ReportView {
    pub fn from_parsed(raw: &str, parsed: &ParsedReport) -> Self {
        if parsed.is_empty() {
            return Self::Verbatim(raw.to_string());
        }
        Self::Sections(parsed.iter().map(render).collect())
    }

    pub fn fragments(&self) -> &[DisplayFragment] {
        match self {
            Self::Sections(fragments) => fragments.as_slice(),
            Self::Verbatim(_) => &[],
        }
    }

    pub fn is_verbatim(&self) -> bool {
        matches!(self, Self::Verbatim(_))
    }

    /// Keep only fragments of the given kinds. The verbatim fallback is
    /// untouched, and an empty filter keeps everything.
    pub fn retain_kinds(&mut self, kinds: &[SectionKind]) {
        if kinds.is_empty() {
            return;
        }
        if let Self::Sections(fragments) = self {
            fragments.retain(|f| kinds.contains(&f.kind));
        }
    }
}

pub fn render_report(raw: &str) -> ReportView {
    ReportView::from_parsed(raw, &parser::parse(raw))
}
