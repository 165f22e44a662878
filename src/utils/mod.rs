use std::collections::HashSet;

use crate::parser::SectionKind;

/// Parse a comma-separated list of section kinds, keeping first-seen order.
pub fn parse_kinds_csv(value: &str) -> Result<Vec<SectionKind>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("sections list is empty".to_string());
    }

    let mut out: Vec<SectionKind> = Vec::new();
    let mut seen: HashSet<SectionKind> = HashSet::new();
    for part in raw.split([',', '，']) {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let kind = SectionKind::parse(item).ok_or_else(|| format!("unknown section '{item}'"))?;
        if seen.insert(kind) {
            out.push(kind);
        }
    }

    if out.is_empty() {
        return Err("sections list is empty".to_string());
    }
    Ok(out)
}

pub fn format_kinds(kinds: &[SectionKind]) -> String {
    if kinds.is_empty() {
        return "all".to_string();
    }
    kinds
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(",")
}
