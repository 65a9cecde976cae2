//! Canonical report assembly and serialization.
//!
//! The serialized field names and the grade cutoffs are load-bearing for
//! conforming presentation clients and must not change independently of a
//! version bump.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::CategoryWeights;
use crate::models::PerfMetrics;
use crate::performance::PerformanceAnalysis;
use crate::scoring::{overall_score, CategoryResult, Grade};
use crate::security::SecurityAnalysis;

/// The immutable, fully-populated output of one audit.
///
/// Every category key is always present: a category whose analyzer failed is
/// represented by score 0 and a synthetic finding, never by an absent field,
/// so consumers never need defensive optional-chaining.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub overall: OverallSection,
    pub security: SecuritySection,
    pub performance: PerformanceSection,
    pub seo: CategorySection,
    pub accessibility: CategorySection,
    pub issues_count: IssueCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallSection {
    pub score: u8,
    pub grade: Grade,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecuritySection {
    pub ssl_valid: bool,
    pub score: u8,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSection {
    pub score: u8,
    pub metrics: PerfMetrics,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySection {
    pub score: u8,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueCounts {
    pub critical: usize,
    pub minor: usize,
}

/// Merges the analyzer outputs into the canonical report.
///
/// The overall score is always recomputed here from the four category scores,
/// never trusted from a partial or cached value, and the timestamp is stamped
/// at completion.
pub fn assemble_report(
    url: String,
    security: SecurityAnalysis,
    performance: PerformanceAnalysis,
    seo: CategoryResult,
    accessibility: CategoryResult,
    weights: &CategoryWeights,
) -> Report {
    let mut critical = 0usize;
    let mut minor = 0usize;
    for result in [
        &security.result,
        &performance.result,
        &seo,
        &accessibility,
    ] {
        let (c, m) = result.severity_counts();
        critical += c;
        minor += m;
    }

    let score = overall_score(
        security.result.score,
        performance.result.score,
        seo.score,
        accessibility.score,
        weights,
    );

    Report {
        url,
        timestamp: Utc::now(),
        overall: OverallSection {
            score,
            grade: Grade::from_score(score),
        },
        security: SecuritySection {
            ssl_valid: security.ssl_valid,
            score: security.result.score,
            issues: security.result.issue_texts(),
        },
        performance: PerformanceSection {
            score: performance.result.score,
            metrics: performance.metrics,
            issues: performance.result.issue_texts(),
        },
        seo: CategorySection {
            score: seo.score,
            issues: seo.issue_texts(),
        },
        accessibility: CategorySection {
            score: accessibility.score,
            issues: accessibility.issue_texts(),
        },
        issues_count: IssueCounts { critical, minor },
    }
}
