// src/extract/text.rs
// =============================================================================
// Turns an HTML page into plain text for the document loader.
//
// - <script>, <style>, <noscript>, <template> and <head> content is dropped
// - block-level elements start a new line, inline elements do not
// - whitespace inside a line is collapsed, blank lines are removed
// - the <title> is reported separately
// =============================================================================

use std::sync::OnceLock;

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head", "svg"];

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

fn title_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("title").expect("static selector is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub title: Option<String>,
    pub text: String,
}

pub fn extract_text(html: &str) -> PageText {
    let document = Html::parse_document(html);

    let title = document
        .select(title_selector())
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    let text = raw
        .lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    PageText { title, text }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                let block = BLOCKS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_body() {
        let page = extract_text(
            "<html><head><title> Toll  Rates </title></head>\
             <body><h1>Rates</h1><p>Cash and   E-ZPass rates.</p></body></html>",
        );
        assert_eq!(page.title.as_deref(), Some("Toll Rates"));
        assert_eq!(page.text, "Rates\nCash and E-ZPass rates.");
    }

    #[test]
    fn test_scripts_and_styles_dropped() {
        let page = extract_text(
            "<body><script>var x = 1;</script><style>p{color:red}</style>\
             <p>Visible</p><noscript>enable js</noscript></body>",
        );
        assert_eq!(page.text, "Visible");
    }

    #[test]
    fn test_inline_elements_stay_on_one_line() {
        let page = extract_text("<p>Open <b>daily</b> from <a href='/hours'>9am</a>.</p>");
        assert_eq!(page.text, "Open daily from 9am.");
    }

    #[test]
    fn test_list_items_on_separate_lines() {
        let page = extract_text("<ul><li>One</li><li>Two</li></ul>");
        assert_eq!(page.text, "One\nTwo");
    }

    #[test]
    fn test_missing_title() {
        let page = extract_text("<p>No head here</p>");
        assert_eq!(page.title, None);
        assert_eq!(page.text, "No head here");
    }
}
