//! HTML parsing helpers shared by the document-based analyzers.

use scraper::Html;

/// Interprets a response body as an HTML document.
///
/// Returns `None` when the body cannot stand in for a document at all
/// (non-UTF-8 bytes or nothing but whitespace). The HTML parser itself is
/// lenient, so anything that is at least text parses; callers degrade their
/// category rather than propagate when this returns `None`.
pub fn parse_document(body: &[u8]) -> Option<Html> {
    let text = std::str::from_utf8(body).ok()?;
    if text.trim().is_empty() {
        return None;
    }
    Some(Html::parse_document(text))
}
