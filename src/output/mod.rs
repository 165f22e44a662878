pub mod report;

use std::path::Path;

use colored::{ColoredString, Colorize};
use serde::Serialize;
use thiserror::Error;

use crate::classify::{Classification, Priority};
use crate::render::{DisplayFragment, ReportView, StyleToken};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".xml") {
        return Some(OutputFormat::Xml);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analyzed: Option<bool>,
    pub sections: Vec<DisplayFragment>,
    /// Raw analysis text, set when no section marker was recognized.
    pub verbatim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

impl OutputRecord {
    pub fn new(
        id: Option<i64>,
        title: Option<String>,
        priority: Option<String>,
        view: ReportView,
    ) -> Self {
        let (sections, verbatim) = match view {
            ReportView::Sections(fragments) => (fragments, None),
            ReportView::Verbatim(raw) => (Vec::new(), Some(raw)),
        };
        Self {
            id,
            title,
            priority,
            ai_analyzed: None,
            sections,
            verbatim,
            classification: None,
        }
    }

    fn heading(&self) -> String {
        let id = self
            .id
            .map(|id| format!("#{id}"))
            .unwrap_or_else(|| "report".to_string());
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => format!("{id} {}", title.trim()),
            _ => id,
        }
    }

    /// Record priority with its badge style; unknown values fall back to
    /// secondary.
    pub fn priority_badge(&self) -> Option<(&str, StyleToken)> {
        let raw = self.priority.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let style = Priority::parse(raw)
            .map(Priority::style)
            .unwrap_or(StyleToken::Secondary);
        Some((raw, style))
    }
}

pub fn analyzed_label(analyzed: bool) -> &'static str {
    if analyzed {
        "是"
    } else {
        "否"
    }
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write output: {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    std::fs::write(path, bytes).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn paint(text: &str, style: StyleToken) -> ColoredString {
    match style {
        StyleToken::Info => text.cyan(),
        StyleToken::WarningDark => text.yellow(),
        StyleToken::Success => text.green(),
        StyleToken::Danger => text.red(),
        StyleToken::Primary => text.blue(),
        StyleToken::Secondary => text.white(),
    }
}

/// Plain text. Coloring is governed by `colored`'s global override, so the
/// same bytes come out uncolored when written to a file with `--no-color`.
pub fn render_text(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    for (idx, r) in records.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!(":: {}", r.heading()).bold().to_string());
        out.push('\n');
        if let Some((priority, style)) = r.priority_badge() {
            out.push_str(&format!(
                "   {} {}\n",
                "priority:".dimmed(),
                paint(priority, style)
            ));
        }
        if let Some(analyzed) = r.ai_analyzed {
            out.push_str(&format!(
                "   {} {}\n",
                "AI已分析:".dimmed(),
                analyzed_label(analyzed)
            ));
        }
        if let Some(c) = &r.classification {
            out.push_str(&format!(
                "   {} {} / {} / {} ({:.2})\n",
                "classification:".dimmed(),
                c.problem_category.label(),
                c.solution_category.label(),
                paint(c.priority.as_str(), c.priority.style()),
                c.confidence
            ));
        }
        if let Some(raw) = &r.verbatim {
            for line in raw.lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
            continue;
        }
        for f in &r.sections {
            let badge = format!("[{}]", f.title);
            out.push_str(&format!("  {}\n", paint(&badge, f.style_class).bold()));
            for line in f.body_lines() {
                if line.is_empty() {
                    continue;
                }
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out.into_bytes()
}

pub fn render_json(records: &[OutputRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_xml(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str("<reports>\n");
    for r in records {
        match r.id {
            Some(id) => out.push_str(&format!("  <report id=\"{id}\">\n")),
            None => out.push_str("  <report>\n"),
        }
        if let Some(title) = &r.title {
            out.push_str(&format!("    <title>{}</title>\n", escape_xml(title)));
        }
        if let Some(priority) = &r.priority {
            out.push_str(&format!(
                "    <priority>{}</priority>\n",
                escape_xml(priority)
            ));
        }
        if let Some(analyzed) = r.ai_analyzed {
            out.push_str(&format!("    <ai_analyzed>{analyzed}</ai_analyzed>\n"));
        }
        if let Some(c) = &r.classification {
            out.push_str(&format!(
                "    <classification problem_category=\"{}\" solution_category=\"{}\" priority=\"{}\" confidence=\"{}\"/>\n",
                c.problem_category_id,
                c.solution_category_id,
                c.priority.as_str(),
                c.confidence
            ));
        }
        if let Some(raw) = &r.verbatim {
            out.push_str(&format!("    <verbatim>{}</verbatim>\n", escape_xml(raw)));
        }
        for f in &r.sections {
            out.push_str(&format!(
                "    <section kind=\"{}\" style=\"{}\">\n",
                f.kind.name(),
                f.style_class.as_str()
            ));
            out.push_str(&format!("      <title>{}</title>\n", escape_xml(&f.title)));
            for line in f.body_lines() {
                out.push_str(&format!("      <line>{}</line>\n", escape_xml(line)));
            }
            out.push_str("    </section>\n");
        }
        out.push_str("  </report>\n");
    }
    out.push_str("</reports>\n");
    out.into_bytes()
}

pub fn render_html(records: &[OutputRecord]) -> Vec<u8> {
    report::render_html(records)
}

pub fn render(format: OutputFormat, records: &[OutputRecord]) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(records),
        OutputFormat::Json => render_json(records),
        OutputFormat::Xml => render_xml(records),
        OutputFormat::Html => render_html(records),
    }
}
