//! SEO analysis over the parsed document and the auxiliary probes.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::config::{META_DESCRIPTION_LENGTH_RANGE, TITLE_LENGTH_RANGE};
use crate::html::parse_document;
use crate::models::{AuxiliaryResource, FetchedPage};
use crate::scoring::{CategoryResult, Finding};

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("Failed to parse title selector - this is a bug")
});

static META_DESCRIPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[name='description']")
        .expect("Failed to parse meta description selector - this is a bug")
});

static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1").expect("Failed to parse h1 selector - this is a bug")
});

/// Open Graph tags a shareable page is expected to carry, with their
/// selectors. Each absent tag emits one finding.
static OG_SELECTORS: LazyLock<[(&'static str, Selector); 3]> = LazyLock::new(|| {
    let parse = |s: &str| Selector::parse(s).expect("Failed to parse og selector - this is a bug");
    [
        ("og:title", parse("meta[property='og:title']")),
        ("og:description", parse("meta[property='og:description']")),
        ("og:image", parse("meta[property='og:image']")),
    ]
});

/// Runs the SEO checklist.
///
/// An unparseable body degrades the whole category to score 0 with one
/// explanatory finding; auxiliary-resource absences each emit one finding.
pub fn analyze_seo(
    page: &FetchedPage,
    robots: &AuxiliaryResource,
    sitemap: &AuxiliaryResource,
) -> CategoryResult {
    let Some(document) = parse_document(&page.body) else {
        return CategoryResult::failed("SEO analysis failed: unparseable document");
    };

    let mut findings = Vec::new();

    match extract_title(&document) {
        None => findings.push(Finding::new("Missing <title> tag")),
        Some(title) if !TITLE_LENGTH_RANGE.contains(&title.chars().count()) => {
            findings.push(Finding::new(format!(
                "Title length not optimal ({}-{} characters recommended)",
                TITLE_LENGTH_RANGE.start(),
                TITLE_LENGTH_RANGE.end()
            )));
        }
        Some(_) => {}
    }

    match extract_meta_description(&document) {
        None => findings.push(Finding::new("Missing meta description")),
        Some(desc) if !META_DESCRIPTION_LENGTH_RANGE.contains(&desc.chars().count()) => {
            findings.push(Finding::new(format!(
                "Meta description length not optimal ({}-{} characters recommended)",
                META_DESCRIPTION_LENGTH_RANGE.start(),
                META_DESCRIPTION_LENGTH_RANGE.end()
            )));
        }
        Some(_) => {}
    }

    if document.select(&H1_SELECTOR).next().is_none() {
        findings.push(Finding::new("Missing <h1> heading"));
    }

    for (name, selector) in OG_SELECTORS.iter() {
        if document.select(selector).next().is_none() {
            findings.push(Finding::new(format!("Missing Open Graph {name} tag")));
        }
    }

    if !robots.present {
        findings.push(Finding::new("robots.txt not found"));
    }
    if !sitemap.present {
        findings.push(Finding::new("sitemap.xml not found"));
    }

    CategoryResult::from_findings(findings)
}

fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn extract_meta_description(document: &Html) -> Option<String> {
    document
        .select(&META_DESCRIPTION_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn page(body: &str) -> FetchedPage {
        FetchedPage {
            final_url: url::Url::parse("https://example.com/").unwrap(),
            status_code: 200,
            headers: HashMap::new(),
            set_cookie: Vec::new(),
            body: body.as_bytes().to_vec(),
            tls_info: None,
            latency_ms: 100,
            size_bytes: body.len() as u64,
            redirect_count: 0,
        }
    }

    fn present() -> AuxiliaryResource {
        AuxiliaryResource::answered(200)
    }

    fn absent() -> AuxiliaryResource {
        AuxiliaryResource::answered(404)
    }

    const WELL_FORMED: &str = r#"<html><head>
        <title>A descriptive page title for testing</title>
        <meta name="description" content="A meta description that is comfortably inside the recommended length band for search snippets.">
        <meta property="og:title" content="Title">
        <meta property="og:description" content="Description">
        <meta property="og:image" content="https://example.com/img.png">
        </head><body><h1>Heading</h1></body></html>"#;

    #[test]
    fn test_well_formed_page_is_clean() {
        let result = analyze_seo(&page(WELL_FORMED), &present(), &present());
        assert!(result.findings.is_empty(), "{:?}", result.findings);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_bare_page_emits_full_checklist() {
        let result = analyze_seo(&page("<html><body><p>hi</p></body></html>"), &absent(), &absent());
        let texts: Vec<&str> = result.findings.iter().map(|f| f.text.as_str()).collect();
        assert!(texts.contains(&"Missing <title> tag"));
        assert!(texts.contains(&"Missing meta description"));
        assert!(texts.contains(&"Missing <h1> heading"));
        assert!(texts.contains(&"Missing Open Graph og:title tag"));
        assert!(texts.contains(&"Missing Open Graph og:description tag"));
        assert!(texts.contains(&"Missing Open Graph og:image tag"));
        assert!(texts.contains(&"robots.txt not found"));
        assert!(texts.contains(&"sitemap.xml not found"));
        assert_eq!(result.findings.len(), 8);
        // 6 criticals + 2 minors = -100, floored at 0
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_short_title_flagged_as_length_issue_not_missing() {
        let html = WELL_FORMED.replace(
            "A descriptive page title for testing",
            "Short",
        );
        let result = analyze_seo(&page(&html), &present(), &present());
        assert_eq!(result.findings.len(), 1);
        assert!(result.findings[0].text.starts_with("Title length not optimal"));
    }

    #[test]
    fn test_overlong_description_flagged() {
        let html = WELL_FORMED.replace(
            "A meta description that is comfortably inside the recommended length band for search snippets.",
            &"x".repeat(200),
        );
        let result = analyze_seo(&page(&html), &present(), &present());
        assert_eq!(result.findings.len(), 1);
        assert!(result.findings[0]
            .text
            .starts_with("Meta description length not optimal"));
    }

    #[test]
    fn test_whitespace_only_title_counts_as_missing() {
        let html = WELL_FORMED.replace("A descriptive page title for testing", "   ");
        let result = analyze_seo(&page(&html), &present(), &present());
        assert!(result
            .findings
            .iter()
            .any(|f| f.text == "Missing <title> tag"));
    }

    #[test]
    fn test_missing_robots_only_adds_one_minor() {
        let clean = analyze_seo(&page(WELL_FORMED), &present(), &present());
        let degraded = analyze_seo(&page(WELL_FORMED), &absent(), &present());
        assert_eq!(degraded.findings.len(), clean.findings.len() + 1);
        assert_eq!(degraded.score, clean.score - 5);
    }

    #[test]
    fn test_unreachable_auxiliary_treated_as_absent() {
        let robots = AuxiliaryResource::unreachable("connection refused");
        let result = analyze_seo(&page(WELL_FORMED), &robots, &present());
        assert!(result
            .findings
            .iter()
            .any(|f| f.text == "robots.txt not found"));
    }

    #[test]
    fn test_unparseable_body_degrades_category() {
        let mut p = page("");
        p.body = vec![0xff, 0xfe, 0x00];
        let result = analyze_seo(&p, &present(), &present());
        assert_eq!(result.score, 0);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(
            result.findings[0].text,
            "SEO analysis failed: unparseable document"
        );
    }
}
