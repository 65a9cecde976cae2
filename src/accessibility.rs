//! Accessibility analysis over the parsed document.
//!
//! Image and link issues are aggregated into one finding each rather than
//! one per element, so a gallery page cannot flood the report.

use std::sync::LazyLock;

use scraper::Selector;

use crate::html::parse_document;
use crate::models::FetchedPage;
use crate::scoring::{CategoryResult, Finding};

static HTML_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("html").expect("Failed to parse html selector - this is a bug")
});

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img").expect("Failed to parse img selector - this is a bug")
});

static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1").expect("Failed to parse h1 selector - this is a bug")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").expect("Failed to parse anchor selector - this is a bug")
});

/// Runs the accessibility checklist.
///
/// A body that cannot be interpreted as a document degrades this category to
/// score 0 with one explanatory finding instead of propagating an error, so
/// the report keeps its full shape.
pub fn analyze_accessibility(page: &FetchedPage) -> CategoryResult {
    let Some(document) = parse_document(&page.body) else {
        return CategoryResult::failed("Accessibility analysis failed: unparseable document");
    };

    let mut findings = Vec::new();

    let images: Vec<_> = document.select(&IMG_SELECTOR).collect();
    let missing_alt = images
        .iter()
        .filter(|img| {
            img.value()
                .attr("alt")
                .is_none_or(|alt| alt.trim().is_empty())
        })
        .count();
    if missing_alt > 0 {
        findings.push(Finding::new(format!(
            "Missing alt attribute on {missing_alt} of {} images",
            images.len()
        )));
    }

    let has_lang = document
        .select(&HTML_SELECTOR)
        .next()
        .and_then(|root| root.value().attr("lang"))
        .is_some_and(|lang| !lang.trim().is_empty());
    if !has_lang {
        findings.push(Finding::new("Missing lang attribute on <html> element"));
    }

    let h1_count = document.select(&H1_SELECTOR).count();
    if h1_count == 0 {
        findings.push(Finding::new("Missing <h1> heading"));
    } else if h1_count > 1 {
        findings.push(Finding::new(format!(
            "Multiple <h1> headings found ({h1_count})"
        )));
    }

    let mut link_count = 0usize;
    let mut silent_links = 0usize;
    for anchor in document.select(&ANCHOR_SELECTOR) {
        link_count += 1;
        let text: String = anchor.text().collect();
        let aria_label = anchor.value().attr("aria-label").unwrap_or_default();
        if text.trim().is_empty() && aria_label.trim().is_empty() {
            silent_links += 1;
        }
    }
    if silent_links > 0 {
        findings.push(Finding::new(format!(
            "{silent_links} of {link_count} links have no accessible text"
        )));
    }

    CategoryResult::from_findings(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Severity;
    use std::collections::HashMap;

    fn page(body: &[u8]) -> FetchedPage {
        FetchedPage {
            final_url: url::Url::parse("https://example.com/").unwrap(),
            status_code: 200,
            headers: HashMap::new(),
            set_cookie: Vec::new(),
            body: body.to_vec(),
            tls_info: None,
            latency_ms: 100,
            size_bytes: body.len() as u64,
            redirect_count: 0,
        }
    }

    const ACCESSIBLE: &str = r#"<html lang="en"><body>
        <h1>Welcome</h1>
        <img src="a.png" alt="A picture">
        <a href="/about">About us</a>
        <a href="/icon" aria-label="Open settings"><svg></svg></a>
        </body></html>"#;

    #[test]
    fn test_accessible_page_is_clean() {
        let result = analyze_accessibility(&page(ACCESSIBLE.as_bytes()));
        assert!(result.findings.is_empty(), "{:?}", result.findings);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_missing_alt_aggregates_into_one_finding() {
        let html = r#"<html lang="en"><body><h1>t</h1>
            <img src="a.png"><img src="b.png" alt=""><img src="c.png" alt="ok">
            </body></html>"#;
        let result = analyze_accessibility(&page(html.as_bytes()));
        assert_eq!(result.findings.len(), 1);
        assert_eq!(
            result.findings[0].text,
            "Missing alt attribute on 2 of 3 images"
        );
        assert_eq!(result.findings[0].severity, Severity::Critical);
    }

    #[test]
    fn test_missing_lang_and_h1() {
        let html = r#"<html><body><p>no structure</p></body></html>"#;
        let result = analyze_accessibility(&page(html.as_bytes()));
        let texts: Vec<&str> = result.findings.iter().map(|f| f.text.as_str()).collect();
        assert!(texts.contains(&"Missing lang attribute on <html> element"));
        assert!(texts.contains(&"Missing <h1> heading"));
        // both classify as critical: 100 - 2*15
        assert_eq!(result.score, 70);
    }

    #[test]
    fn test_multiple_h1_is_minor() {
        let html = r#"<html lang="en"><body><h1>a</h1><h1>b</h1></body></html>"#;
        let result = analyze_accessibility(&page(html.as_bytes()));
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].text, "Multiple <h1> headings found (2)");
        assert_eq!(result.findings[0].severity, Severity::Minor);
    }

    #[test]
    fn test_links_without_accessible_text() {
        let html = r#"<html lang="en"><body><h1>t</h1>
            <a href="/a"></a>
            <a href="/b">labelled</a>
            <a href="/c" aria-label="labelled too"></a>
            </body></html>"#;
        let result = analyze_accessibility(&page(html.as_bytes()));
        assert_eq!(result.findings.len(), 1);
        assert_eq!(
            result.findings[0].text,
            "1 of 3 links have no accessible text"
        );
    }

    #[test]
    fn test_unparseable_body_degrades_not_propagates() {
        let result = analyze_accessibility(&page(&[0xff, 0xfe, 0x00, 0x01]));
        assert_eq!(result.score, 0);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(
            result.findings[0].text,
            "Accessibility analysis failed: unparseable document"
        );
    }

    #[test]
    fn test_empty_body_degrades() {
        let result = analyze_accessibility(&page(b""));
        assert_eq!(result.score, 0);
        assert_eq!(result.findings.len(), 1);
    }

    #[test]
    fn test_two_criticals_score_seventy() {
        // a document with no h1 and an img missing alt: two criticals -> 70
        let html = r#"<html lang="en"><body><img src="x.png"><a href="/">home</a></body></html>"#;
        let result = analyze_accessibility(&page(html.as_bytes()));
        assert_eq!(result.findings.len(), 2);
        assert_eq!(result.score, 70);
    }
}
