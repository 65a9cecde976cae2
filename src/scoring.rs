//! Severity classification, category scoring, and grading.
//!
//! Severity is decided exactly once, here, when a finding is constructed.
//! Downstream consumers (the report assembler, any presentation layer) render
//! already-classified data and never re-derive severity themselves.

use serde::Serialize;
use strum_macros::EnumIter;

use crate::config::{
    CategoryWeights, CRITICAL_KEYWORDS, CRITICAL_PENALTY, MINOR_PENALTY,
};

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Minor,
}

impl Severity {
    /// Classifies a finding's text.
    ///
    /// A finding is critical if its text contains any of the fixed keyword
    /// set (`Missing`, `Invalid`, `High`). Matching is case-sensitive:
    /// analyzers capitalize the keyword when an issue warrants the heavier
    /// penalty.
    pub fn classify(text: &str) -> Severity {
        if CRITICAL_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            Severity::Critical
        } else {
            Severity::Minor
        }
    }
}

/// A single issue discovered by an analyzer.
#[derive(Debug, Clone)]
pub struct Finding {
    pub text: String,
    pub severity: Severity,
}

impl Finding {
    /// Builds a finding, classifying its severity from the text.
    pub fn new(text: impl Into<String>) -> Finding {
        let text = text.into();
        let severity = Severity::classify(&text);
        Finding { text, severity }
    }
}

/// One category's outcome: a normalized score plus its ordered findings.
#[derive(Debug, Clone)]
pub struct CategoryResult {
    /// Score in [0, 100], a pure function of the finding set.
    pub score: u8,
    pub findings: Vec<Finding>,
}

impl CategoryResult {
    /// Scores a finding set.
    pub fn from_findings(findings: Vec<Finding>) -> CategoryResult {
        let score = category_score(&findings);
        CategoryResult { score, findings }
    }

    /// The degraded result for an analyzer that failed internally: score 0
    /// and a single synthetic finding explaining the failure. The report
    /// keeps its full shape either way.
    pub fn failed(text: impl Into<String>) -> CategoryResult {
        CategoryResult {
            score: 0,
            findings: vec![Finding::new(text)],
        }
    }

    /// Finding texts in discovery order, for the report's `issues` arrays.
    pub fn issue_texts(&self) -> Vec<String> {
        self.findings.iter().map(|f| f.text.clone()).collect()
    }

    /// (critical, minor) counts for this category.
    pub fn severity_counts(&self) -> (usize, usize) {
        let critical = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count();
        (critical, self.findings.len() - critical)
    }
}

/// Audit categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Category {
    Security,
    Performance,
    Seo,
    Accessibility,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Performance => "performance",
            Category::Seo => "seo",
            Category::Accessibility => "accessibility",
        }
    }
}

/// Computes a category score from its findings.
///
/// Starts at 100, deducts per finding by severity, floors at 0. Order of
/// findings does not matter.
pub fn category_score(findings: &[Finding]) -> u8 {
    let penalty: u32 = findings
        .iter()
        .map(|f| match f.severity {
            Severity::Critical => CRITICAL_PENALTY,
            Severity::Minor => MINOR_PENALTY,
        })
        .sum();
    100u32.saturating_sub(penalty) as u8
}

/// Weighted mean of the four category scores, rounded to nearest integer.
pub fn overall_score(
    security: u8,
    performance: u8,
    seo: u8,
    accessibility: u8,
    weights: &CategoryWeights,
) -> u8 {
    let weighted = f64::from(security) * weights.security
        + f64::from(performance) * weights.performance
        + f64::from(seo) * weights.seo
        + f64::from(accessibility) * weights.accessibility;
    weighted.round() as u8
}

/// Letter grade for an overall score.
///
/// Cutoffs are fixed, not configurable: the presentation layer depends on
/// these exact boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Grade {
        match score {
            90..=u8::MAX => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{s}")
    }
}
