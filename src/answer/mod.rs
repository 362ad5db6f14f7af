// src/answer/mod.rs
// =============================================================================
// Answers returned by the question-answering side of the pipeline.
//
// Retrieval and generation happen in external services; what comes back is
// mapped into an Answer: the generated text plus the ordered list of source
// passages it was grounded on. This module decides how an Answer is shown to
// the user:
// - thin answers get a customer-care disclaimer appended
// - source URLs are listed underneath, deduplicated and capped
// =============================================================================

use serde::{Deserialize, Serialize};

/// Appended when an answer looks unreliable.
pub const FALLBACK_NOTE: &str = "Note: I am just an AI agent and I do not have full information \
about this, please try to contact the customer care for more information.";

/// Default number of source links shown under an answer.
pub const DEFAULT_MAX_SOURCES: usize = 5;

/// Answers shorter than this (in characters, after trimming) count as thin.
const MIN_CONFIDENT_LEN: usize = 120;

const LOW_INFO_PHRASES: &[&str] = &[
    "i don't know",
    "i do not know",
    "i am not sure",
    "can't find",
    "cannot find",
    "no information",
    "not enough information",
    "unable to",
    "insufficient information",
    "sorry,",
];

/// A retrieved passage the answer was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub url: String,
    /// Similarity score reported by the index, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl SourceRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            score: None,
        }
    }
}

/// A generated answer and the sources it was grounded on.
///
/// The QA service's result is mapped into an `Answer`, and [`Answer::render`]
/// gives the reply to show:
///
/// ```
/// use scopecrawl::answer::{Answer, SourceRecord, DEFAULT_MAX_SOURCES, FALLBACK_NOTE};
///
/// let answer = Answer::new("Yes.", vec![SourceRecord::new("https://example.com/faq")]);
/// let reply = answer.render(DEFAULT_MAX_SOURCES);
///
/// // Too short to trust, so the note is appended before the sources.
/// assert!(reply.contains(FALLBACK_NOTE));
/// assert!(reply.ends_with("Sources:\n- https://example.com/faq"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

impl Answer {
    pub fn new(text: impl Into<String>, sources: Vec<SourceRecord>) -> Self {
        Self {
            text: text.into(),
            sources,
        }
    }

    /// True when the answer admits ignorance, cites nothing, or is too short
    /// to be useful.
    pub fn is_low_confidence(&self) -> bool {
        let text = self.text.trim();
        let lower = text.to_lowercase();

        LOW_INFO_PHRASES.iter().any(|p| lower.contains(p))
            || self.sources.is_empty()
            || text.chars().count() < MIN_CONFIDENT_LEN
    }

    /// The answer text, with [`FALLBACK_NOTE`] appended when it looks thin.
    pub fn render_with_fallback(&self) -> String {
        let text = self.text.trim();
        if !self.is_low_confidence() {
            return text.to_string();
        }
        if text.is_empty() {
            FALLBACK_NOTE.to_string()
        } else {
            format!("{text}\n\n{FALLBACK_NOTE}")
        }
    }

    /// Distinct http(s) source URLs in retrieval order, at most `max`.
    pub fn source_urls(&self, max: usize) -> Vec<&str> {
        let mut urls: Vec<&str> = Vec::new();
        for source in &self.sources {
            let url = source.url.as_str();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                continue;
            }
            if urls.contains(&url) {
                continue;
            }
            if urls.len() == max {
                break;
            }
            urls.push(url);
        }
        urls
    }

    /// Full reply: text (with fallback note if needed) and a source list.
    pub fn render(&self, max_sources: usize) -> String {
        let mut reply = self.render_with_fallback();
        let sources = self.source_urls(max_sources);
        if !sources.is_empty() {
            reply.push_str("\n\nSources:");
            for url in sources {
                reply.push_str("\n- ");
                reply.push_str(url);
            }
        }
        reply
    }
}

/// Reply shown when answering a question failed outright.
pub fn error_reply(error: &dyn std::fmt::Display) -> String {
    format!("Sorry, I ran into an issue: {error}\n\n{FALLBACK_NOTE}")
}
