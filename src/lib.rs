//! site_audit library: website audit orchestration and scoring
//!
//! This library fetches a target page plus two well-known auxiliary resources
//! (`robots.txt`, `sitemap.xml`), runs four independent analyzers over the
//! fetched content (security, performance, SEO, accessibility), converts the
//! findings into normalized scores with a letter grade, and assembles one
//! canonical report. Individual analyzer failures degrade their category;
//! only a failed primary fetch fails the audit.
//!
//! # Example
//!
//! ```no_run
//! use site_audit::{run_audit, AuditRequest, FetchSettings, Mode};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = AuditRequest {
//!     url: "example.com".to_string(),
//!     mode: Mode::Desktop,
//! };
//! let report = run_audit(&request, &FetchSettings::default()).await?;
//! println!("{} scored {} ({})", report.url, report.overall.score, report.overall.grade);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod accessibility;
pub mod config;
mod error_handling;
mod fetch;
mod html;
pub mod initialization;
mod models;
mod performance;
mod report;
mod scoring;
mod security;
mod seo;
mod tls;

// Re-export public API
pub use config::{FetchSettings, LogFormat, LogLevel, Opt};
pub use error_handling::AuditError;
pub use models::{AuditRequest, Mode, PerfMetrics};
pub use report::{
    CategorySection, IssueCounts, OverallSection, PerformanceSection, Report, SecuritySection,
};
pub use run::run_audit;
pub use scoring::{Grade, Severity};

// Internal run module (contains the audit orchestration)
mod run {
    use log::{debug, info};
    use tokio::time::timeout;

    use crate::config::{self, FetchSettings};
    use crate::error_handling::AuditError;
    use crate::models::AuditRequest;
    use crate::report::{assemble_report, Report};
    use crate::scoring::Category;
    use crate::{accessibility, fetch, initialization, performance, security, seo};

    /// Runs one audit end to end.
    ///
    /// Normalizes the URL, fetches the page and the auxiliary resources
    /// concurrently, runs the four analyzers over the shared immutable page,
    /// and assembles the canonical report. Each audit is fully isolated: the
    /// client is built per call and nothing is cached across requests.
    ///
    /// # Errors
    ///
    /// Fails only for primary-fetch-class errors: a malformed URL, an
    /// unreachable host, a timeout (including the umbrella audit deadline),
    /// or a redirect chain past the hop cap. Everything else is absorbed
    /// into the report as findings.
    pub async fn run_audit(
        request: &AuditRequest,
        settings: &FetchSettings,
    ) -> Result<Report, AuditError> {
        match timeout(config::AUDIT_DEADLINE, audit_inner(request, settings)).await {
            Ok(result) => result,
            Err(_) => Err(AuditError::Timeout),
        }
    }

    async fn audit_inner(
        request: &AuditRequest,
        settings: &FetchSettings,
    ) -> Result<Report, AuditError> {
        let url = fetch::normalize_url(&request.url)?;
        info!("Starting audit for {url} ({:?} mode)", request.mode);

        let client = initialization::init_client(settings)
            .map_err(|e| AuditError::Initialization(e.to_string()))?;

        // Auxiliary probes are independent of the primary document, so they
        // run alongside the primary fetch. Their failures never abort the
        // audit; a lost primary fetch aborts it unconditionally.
        let origin = fetch::origin_of(&url);
        let (page, robots, sitemap) = futures::join!(
            fetch::fetch_page(&client, &url),
            fetch::fetch_auxiliary(&client, &origin, "robots.txt"),
            fetch::fetch_auxiliary(&client, &origin, "sitemap.xml"),
        );
        let page = page?;

        // The page is immutable from here on; the analyzers are pure readers
        // joined as futures. The document analyzers each parse their own Html
        // (which is not Send) inside the future.
        let (security, performance, seo, accessibility) = futures::join!(
            async { security::analyze_security(&page) },
            async { performance::analyze_performance(&page, request.mode) },
            async { seo::analyze_seo(&page, &robots, &sitemap) },
            async { accessibility::analyze_accessibility(&page) },
        );

        for (category, score) in [
            (Category::Security, security.result.score),
            (Category::Performance, performance.result.score),
            (Category::Seo, seo.score),
            (Category::Accessibility, accessibility.score),
        ] {
            debug!("{} score: {score}", category.as_str());
        }

        let report = assemble_report(
            url.to_string(),
            security,
            performance,
            seo,
            accessibility,
            &config::DEFAULT_WEIGHTS,
        );
        info!(
            "Audit complete for {}: overall {} ({}), {} critical / {} minor issues",
            report.url,
            report.overall.score,
            report.overall.grade,
            report.issues_count.critical,
            report.issues_count.minor
        );
        Ok(report)
    }
}
