use crate::classify::Classification;
use crate::render::DisplayFragment;

use super::{analyzed_label, OutputRecord};

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Each body line is escaped on its own and the lines are rejoined with a
/// real `<br>`, so markup in the analysis text is never interpreted.
fn body_html(fragment: &DisplayFragment) -> String {
    fragment
        .body_lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>")
}

pub fn render_section(fragment: &DisplayFragment) -> String {
    format!(
        r#"        <div class="mb-3">
          <h6><span class="badge {badge}">{title}</span></h6>
          <div class="border-start border-primary ps-2 py-1">{body}</div>
        </div>
"#,
        badge = fragment.style_class.badge_class(),
        title = escape_html(&fragment.title),
        body = body_html(fragment),
    )
}

pub fn render_verbatim(raw: &str) -> String {
    format!(
        "        <pre class=\"bg-light p-3 rounded\">{}</pre>\n",
        escape_html(raw)
    )
}

fn render_classification(c: &Classification) -> String {
    format!(
        r#"        <p class="small text-muted mb-2">{problem} / {solution} / <span class="badge {badge}">{priority}</span> <span class="ms-1">{confidence:.2}</span></p>
"#,
        problem = escape_html(c.problem_category.label()),
        solution = escape_html(c.solution_category.label()),
        badge = c.priority.style().badge_class(),
        priority = c.priority.as_str(),
        confidence = c.confidence,
    )
}

fn render_card(record: &OutputRecord) -> String {
    let mut heading = match record.id {
        Some(id) => format!("#{id}"),
        None => "AI分析结果".to_string(),
    };
    if let Some(title) = record.title.as_deref().filter(|t| !t.trim().is_empty()) {
        heading.push(' ');
        heading.push_str(&escape_html(title.trim()));
    }

    let mut body = String::new();
    if let Some((priority, style)) = record.priority_badge() {
        body.push_str(&format!(
            "        <p class=\"mb-1\"><strong>优先级:</strong> <span class=\"badge {}\">{}</span></p>\n",
            style.badge_class(),
            escape_html(priority)
        ));
    }
    if let Some(analyzed) = record.ai_analyzed {
        body.push_str(&format!(
            "        <p class=\"mb-2\"><strong>AI已分析:</strong> {}</p>\n",
            analyzed_label(analyzed)
        ));
    }
    if let Some(c) = &record.classification {
        body.push_str(&render_classification(c));
    }
    match &record.verbatim {
        Some(raw) => body.push_str(&render_verbatim(raw)),
        None => {
            for fragment in &record.sections {
                body.push_str(&render_section(fragment));
            }
        }
    }

    format!(
        r#"    <div class="card mb-4">
      <div class="card-header"><strong>{heading}</strong></div>
      <div class="card-body ai-analysis-content">
{body}      </div>
    </div>
"#
    )
}

pub fn render_html(records: &[OutputRecord]) -> Vec<u8> {
    let cards: String = records.iter().map(render_card).collect();
    let html = format!(
        r####"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>AI Analysis Report</title>
  <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css" rel="stylesheet"/>
</head>
<body class="bg-light">
  <main class="container py-4">
    <h1 class="h4 mb-4">AI分析结果 <span class="badge bg-secondary">{count}</span></h1>
{cards}  </main>
</body>
</html>
"####,
        count = records.len(),
    );
    html.into_bytes()
}
