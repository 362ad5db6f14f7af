// src/extract/links.rs
// =============================================================================
// Pulls anchor links out of an HTML page.
//
// We use the `scraper` crate (html5ever underneath) to find every <a href>
// element, and the `url` crate to resolve each href against the page URL.
//
// Only http(s) results are kept: mailto:, tel:, javascript: and friends can
// never be fetched as pages.
//
// Normalization (dropping ?query and #fragment) is the crawler's job, not
// this module's, so the loader and other callers see the links as written.
// =============================================================================

use std::sync::OnceLock;

use scraper::{Html, Selector};
use url::Url;

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("static selector is valid"))
}

/// Extracts all absolute http(s) URLs referenced by anchors in `html`.
///
/// Example:
///   html = "<a href='/docs'>Docs</a>"
///   base = "https://example.com/page"
///   result = ["https://example.com/docs"]
pub fn extract_anchor_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(anchor_selector())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(base, href))
        .collect()
}

// Resolves a (possibly relative) href against the page URL.
//
//   base = "https://example.com/page/"
//   "/docs"              -> Some("https://example.com/docs")
//   "../other"           -> Some("https://example.com/other")
//   "https://other.com"  -> Some("https://other.com/")
//   "javascript:void(0)" -> None
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.into()),
        _ => None,
    }
}
