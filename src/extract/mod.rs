// src/extract/mod.rs
// =============================================================================
// HTML extraction helpers.
//
// Submodules:
// - links: anchor hrefs resolved to absolute URLs (used by the crawler)
// - text:  visible text and title (used by the document loader)
// =============================================================================

mod links;
mod text;

pub use links::extract_anchor_links;
pub use text::{extract_text, PageText};
