//! Helpers for serving a small website from a local mockito server.

use mockito::{Mock, ServerGuard};

/// An HTML page whose body is just the given anchors.
pub fn page_with_links(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">{href}</a></li>"#))
        .collect();
    format!("<!DOCTYPE html><html><head><title>Test</title></head><body><ul>{anchors}</ul></body></html>")
}

/// Serves `html` at `path` with an HTML content type.
pub async fn html_mock(server: &mut ServerGuard, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Answers `path` with the given status code.
#[allow(dead_code)]
pub async fn status_mock(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_header("content-type", "text/html")
        .with_body("error")
        .create_async()
        .await
}
