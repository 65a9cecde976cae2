//! Performance analysis from fetch timing and size metadata.
//!
//! The vitals here are heuristic estimates derived from transport-level
//! signals, not render-timeline measurements. The fetched document stands in
//! for the largest content element since sub-resource fetching is out of
//! scope.

use crate::config::{
    CLS_THRESHOLD, FCP_THRESHOLD_MS, K1_FCP_DESKTOP, K1_FCP_MOBILE, K2_LCP, K_CLS,
    LCP_THRESHOLD_MS,
};
use crate::models::{FetchedPage, Mode, PerfMetrics};
use crate::scoring::{CategoryResult, Finding};

/// Performance category outcome plus the vitals estimates the report
/// surfaces under `metrics`.
#[derive(Debug, Clone)]
pub struct PerformanceAnalysis {
    pub metrics: PerfMetrics,
    pub result: CategoryResult,
}

/// Derives heuristic vitals and threshold findings from the fetch metadata.
///
/// Deterministic: the same page metadata and mode always produce the same
/// metrics and findings. The score comes from the shared deduction rule, so
/// this category shares the penalty scale with the others.
pub fn analyze_performance(page: &FetchedPage, mode: Mode) -> PerformanceAnalysis {
    let metrics = estimate_metrics(
        page.latency_ms,
        page.size_bytes,
        page.redirect_count,
        mode,
    );

    let mut findings = Vec::new();
    if metrics.fcp > FCP_THRESHOLD_MS {
        findings.push(Finding::new("Slow First Contentful Paint"));
    }
    if metrics.lcp > LCP_THRESHOLD_MS {
        findings.push(Finding::new("Slow Largest Contentful Paint"));
    }
    if metrics.cls > CLS_THRESHOLD {
        findings.push(Finding::new("High Cumulative Layout Shift"));
    }

    PerformanceAnalysis {
        metrics,
        result: CategoryResult::from_findings(findings),
    }
}

fn estimate_metrics(latency_ms: u64, size_bytes: u64, redirect_count: usize, mode: Mode) -> PerfMetrics {
    let size_kb = size_bytes as f64 / 1024.0;
    let k1_fcp = match mode {
        Mode::Desktop => K1_FCP_DESKTOP,
        Mode::Mobile => K1_FCP_MOBILE,
    };
    let fcp = latency_ms as f64 + size_kb * k1_fcp;
    let lcp = fcp + size_kb * K2_LCP;
    let cls = (redirect_count as f64 * K_CLS).min(1.0);
    PerfMetrics { fcp, lcp, cls }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Severity;
    use std::collections::HashMap;

    fn page(latency_ms: u64, size_bytes: u64, redirect_count: usize) -> FetchedPage {
        FetchedPage {
            final_url: url::Url::parse("https://example.com/").unwrap(),
            status_code: 200,
            headers: HashMap::new(),
            set_cookie: Vec::new(),
            body: Vec::new(),
            tls_info: None,
            latency_ms,
            size_bytes,
            redirect_count,
        }
    }

    #[test]
    fn test_fast_small_page_is_clean() {
        let analysis = analyze_performance(&page(200, 50 * 1024, 0), Mode::Desktop);
        // fcp = 200 + 50*2 = 300, lcp = 300 + 50*1.5 = 375, cls = 0
        assert_eq!(analysis.metrics.fcp, 300.0);
        assert_eq!(analysis.metrics.lcp, 375.0);
        assert_eq!(analysis.metrics.cls, 0.0);
        assert!(analysis.result.findings.is_empty());
        assert_eq!(analysis.result.score, 100);
    }

    #[test]
    fn test_mobile_mode_inflates_fcp() {
        let desktop = analyze_performance(&page(200, 100 * 1024, 0), Mode::Desktop);
        let mobile = analyze_performance(&page(200, 100 * 1024, 0), Mode::Mobile);
        assert!(mobile.metrics.fcp > desktop.metrics.fcp);
        assert!(mobile.metrics.lcp > desktop.metrics.lcp);
    }

    #[test]
    fn test_slow_fcp_finding() {
        // latency alone pushes fcp over 1800ms
        let analysis = analyze_performance(&page(2000, 0, 0), Mode::Desktop);
        let texts: Vec<&str> = analysis
            .result
            .findings
            .iter()
            .map(|f| f.text.as_str())
            .collect();
        assert!(texts.contains(&"Slow First Contentful Paint"));
        // lcp = fcp here (no payload) and 2000 < 2500, so no LCP finding
        assert!(!texts.contains(&"Slow Largest Contentful Paint"));
    }

    #[test]
    fn test_redirects_drive_layout_shift() {
        let analysis = analyze_performance(&page(100, 1024, 3), Mode::Desktop);
        // cls = 3 * 0.05 = 0.15 > 0.1
        assert!(analysis.metrics.cls > CLS_THRESHOLD);
        let finding = analysis
            .result
            .findings
            .iter()
            .find(|f| f.text == "High Cumulative Layout Shift")
            .expect("expected CLS finding");
        assert_eq!(finding.severity, Severity::Critical);
    }

    #[test]
    fn test_cls_saturates_at_one() {
        let metrics = estimate_metrics(0, 0, 100, Mode::Desktop);
        assert_eq!(metrics.cls, 1.0);
    }

    #[test]
    fn test_slow_paint_findings_are_minor() {
        let analysis = analyze_performance(&page(5000, 2048 * 1024, 0), Mode::Mobile);
        let slow: Vec<_> = analysis
            .result
            .findings
            .iter()
            .filter(|f| f.text.starts_with("Slow"))
            .collect();
        assert_eq!(slow.len(), 2);
        assert!(slow.iter().all(|f| f.severity == Severity::Minor));
    }

    #[test]
    fn test_deterministic_for_fixed_inputs() {
        let a = analyze_performance(&page(321, 7 * 1024, 2), Mode::Mobile);
        let b = analyze_performance(&page(321, 7 * 1024, 2), Mode::Mobile);
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.result.score, b.result.score);
    }
}
