//! Keyword classification of an AI analysis response.
//!
//! Every table is checked in order against the lowercased response and the
//! first category with a matching keyword wins.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::render::StyleToken;

pub const DEFAULT_CONFIDENCE: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemCategory {
    DesignDefect,
    ManufacturingDefect,
    MaterialIssue,
    ProcessIssue,
    Misuse,
    InsufficientMaintenance,
    Environmental,
    Compatibility,
}

const PROBLEM_KEYWORDS: [(ProblemCategory, &[&str]); 8] = [
    (ProblemCategory::DesignDefect, &["设计", "design", "设计缺陷"]),
    (
        ProblemCategory::ManufacturingDefect,
        &["制造", "production", "制造缺陷"],
    ),
    (ProblemCategory::MaterialIssue, &["材料", "material", "材料问题"]),
    (ProblemCategory::ProcessIssue, &["工艺", "process", "工艺问题"]),
    (ProblemCategory::Misuse, &["使用", "use", "使用不当"]),
    (
        ProblemCategory::InsufficientMaintenance,
        &["维护", "maintenance", "维护不足"],
    ),
    (
        ProblemCategory::Environmental,
        &["环境", "environment", "环境因素"],
    ),
    (
        ProblemCategory::Compatibility,
        &["兼容", "compatibility", "兼容性"],
    ),
];

impl ProblemCategory {
    /// Identifier of the category row in the problem tracking backend.
    pub fn id(self) -> u32 {
        match self {
            Self::DesignDefect => 1,
            Self::ManufacturingDefect => 2,
            Self::MaterialIssue => 3,
            Self::ProcessIssue => 4,
            Self::Misuse => 5,
            Self::InsufficientMaintenance => 6,
            Self::Environmental => 7,
            Self::Compatibility => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DesignDefect => "设计缺陷",
            Self::ManufacturingDefect => "制造缺陷",
            Self::MaterialIssue => "材料问题",
            Self::ProcessIssue => "工艺问题",
            Self::Misuse => "使用不当",
            Self::InsufficientMaintenance => "维护不足",
            Self::Environmental => "环境因素",
            Self::Compatibility => "兼容性问题",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionCategory {
    DesignOptimization,
    ProcessImprovement,
    MaterialReplacement,
    Training,
    MaintenanceStandard,
    Protection,
    SoftwareUpdate,
    HardwareUpgrade,
}

const SOLUTION_KEYWORDS: [(SolutionCategory, &[&str]); 8] = [
    (
        SolutionCategory::DesignOptimization,
        &["设计优化", "design optimization", "重新设计"],
    ),
    (
        SolutionCategory::ProcessImprovement,
        &["工艺改进", "process improvement"],
    ),
    (
        SolutionCategory::MaterialReplacement,
        &["材料更换", "material replacement"],
    ),
    (SolutionCategory::Training, &["培训", "training", "使用培训"]),
    (
        SolutionCategory::MaintenanceStandard,
        &["维护规范", "maintenance standard"],
    ),
    (SolutionCategory::Protection, &["防护", "protection", "防护措施"]),
    (SolutionCategory::SoftwareUpdate, &["软件", "software", "更新"]),
    (SolutionCategory::HardwareUpgrade, &["硬件", "hardware", "升级"]),
];

impl SolutionCategory {
    pub fn id(self) -> u32 {
        match self {
            Self::DesignOptimization => 1,
            Self::ProcessImprovement => 2,
            Self::MaterialReplacement => 3,
            Self::Training => 4,
            Self::MaintenanceStandard => 5,
            Self::Protection => 6,
            Self::SoftwareUpdate => 7,
            Self::HardwareUpgrade => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DesignOptimization => "设计优化",
            Self::ProcessImprovement => "工艺改进",
            Self::MaterialReplacement => "材料更换",
            Self::Training => "使用培训",
            Self::MaintenanceStandard => "维护规范",
            Self::Protection => "防护措施",
            Self::SoftwareUpdate => "软件更新",
            Self::HardwareUpgrade => "硬件升级",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

const PRIORITY_KEYWORDS: [(Priority, &[&str]); 3] = [
    (Priority::Critical, &["严重", "critical", "危急"]),
    (Priority::High, &["高", "high", "重要"]),
    (Priority::Low, &["低", "low", "轻微"]),
];

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn style(self) -> StyleToken {
        match self {
            Self::Critical => StyleToken::Danger,
            Self::High => StyleToken::WarningDark,
            Self::Medium => StyleToken::Primary,
            Self::Low => StyleToken::Success,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub problem_category: ProblemCategory,
    pub problem_category_id: u32,
    pub solution_category: SolutionCategory,
    pub solution_category_id: u32,
    pub priority: Priority,
    pub confidence: f64,
}

fn first_match<T: Copy>(text: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(value, _)| *value)
}

fn confidence_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"置信度[:：]\s*([\d.]+)").ok())
        .as_ref()
}

/// First `置信度:` value in the response, if it parses as a number.
pub fn extract_confidence(response: &str) -> Option<f64> {
    let caps = confidence_regex()?.captures(response)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

pub fn classify(response: &str) -> Classification {
    let lower = response.to_lowercase();
    let problem_category =
        first_match(&lower, &PROBLEM_KEYWORDS).unwrap_or(ProblemCategory::DesignDefect);
    let solution_category =
        first_match(&lower, &SOLUTION_KEYWORDS).unwrap_or(SolutionCategory::DesignOptimization);
    let priority = first_match(&lower, &PRIORITY_KEYWORDS).unwrap_or(Priority::Medium);
    let confidence = extract_confidence(response).unwrap_or(DEFAULT_CONFIDENCE);

    Classification {
        problem_category,
        problem_category_id: problem_category.id(),
        solution_category,
        solution_category_id: solution_category.id(),
        priority,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_matches() {
        let c = classify("xyz");
        assert_eq!(c.problem_category, ProblemCategory::DesignDefect);
        assert_eq!(c.solution_category, SolutionCategory::DesignOptimization);
        assert_eq!(c.priority, Priority::Medium);
        assert_eq!(c.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn categories_follow_table_order() {
        let c = classify("问题分类: 材料问题\n解决方案: 材料更换, 加强防护");
        assert_eq!(c.problem_category, ProblemCategory::MaterialIssue);
        assert_eq!(c.problem_category_id, 3);
        assert_eq!(c.solution_category, SolutionCategory::MaterialReplacement);
        assert_eq!(c.solution_category_id, 3);
    }

    #[test]
    fn english_keywords_are_case_insensitive() {
        let c = classify("Root cause: poor MAINTENANCE. Severity: HIGH");
        assert_eq!(c.problem_category, ProblemCategory::InsufficientMaintenance);
        assert_eq!(c.priority, Priority::High);
    }

    #[test]
    fn critical_beats_high() {
        assert_eq!(classify("高温导致严重损坏").priority, Priority::Critical);
        assert_eq!(classify("轻微").priority, Priority::Low);
    }

    #[test]
    fn confidence_accepts_both_colons() {
        assert_eq!(extract_confidence("置信度: 0.92"), Some(0.92));
        assert_eq!(extract_confidence("置信度：0.5"), Some(0.5));
        assert_eq!(extract_confidence("置信度: 1.2.3"), None);
        assert_eq!(classify("置信度: 1.2.3").confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn priority_styles_match_console_badges() {
        assert_eq!(Priority::Critical.style(), StyleToken::Danger);
        assert_eq!(Priority::High.style(), StyleToken::WarningDark);
        assert_eq!(Priority::Medium.style(), StyleToken::Primary);
        assert_eq!(Priority::Low.style(), StyleToken::Success);
        assert_eq!(Priority::parse(" HIGH "), Some(Priority::High));
    }
}
