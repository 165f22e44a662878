use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Auto,
    Text,
    Record,
    Records,
}

impl InputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "text" | "txt" | "raw" => Some(Self::Text),
            "record" | "json" => Some(Self::Record),
            "records" | "list" => Some(Self::Records),
            _ => None,
        }
    }
}

/// Subset of a problem record as returned by the backend API.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ProblemRecord {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub ai_analysis: Option<String>,
    pub ai_analyzed: Option<bool>,
    pub priority: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsPayload {
    List(Vec<ProblemRecord>),
    Page { problems: Vec<ProblemRecord> },
    Single(ProblemRecord),
}

/// One analysis text to parse, with whatever record context came with it.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportInput {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub priority: Option<String>,
    pub ai_analyzed: Option<bool>,
    pub raw: String,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode problem record JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

pub fn read_source(path: Option<&Path>) -> Result<String, InputError> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).map_err(|source| InputError::Read {
                path: p.display().to_string(),
                source,
            })
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| InputError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

fn detect_format(contents: &str) -> InputFormat {
    match contents.trim_start().chars().next() {
        Some('[') => InputFormat::Records,
        Some('{') => InputFormat::Records,
        _ => InputFormat::Text,
    }
}

fn into_reports(records: Vec<ProblemRecord>) -> Vec<ReportInput> {
    records
        .into_iter()
        .filter_map(|record| {
            let raw = record.ai_analysis.unwrap_or_default();
            if raw.trim().is_empty() {
                info!(
                    "skipping record {} without ai_analysis",
                    record
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                return None;
            }
            Some(ReportInput {
                id: record.id,
                title: record.title,
                priority: record.priority,
                ai_analyzed: record.ai_analyzed,
                raw,
            })
        })
        .collect()
}

/// Turn input contents into the reports to display.
///
/// `Records` accepts a bare array, a list-endpoint page with a `problems`
/// array, or a single record object.
pub fn load_reports(contents: &str, format: InputFormat) -> Result<Vec<ReportInput>, InputError> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let format = match format {
        InputFormat::Auto => detect_format(contents),
        other => other,
    };

    match format {
        InputFormat::Text | InputFormat::Auto => Ok(vec![ReportInput {
            id: None,
            title: None,
            priority: None,
            ai_analyzed: None,
            raw: contents.to_string(),
        }]),
        InputFormat::Record => {
            let record: ProblemRecord =
                serde_json::from_str(contents).map_err(|source| InputError::Json { source })?;
            Ok(into_reports(vec![record]))
        }
        InputFormat::Records => {
            let payload: RecordsPayload =
                serde_json::from_str(contents).map_err(|source| InputError::Json { source })?;
            let records = match payload {
                RecordsPayload::List(records) => records,
                RecordsPayload::Page { problems } => problems,
                RecordsPayload::Single(record) => vec![record],
            };
            Ok(into_reports(records))
        }
    }
}
