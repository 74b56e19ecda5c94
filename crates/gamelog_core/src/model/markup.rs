//! Plain-text projection of rich-markup review bodies.
//!
//! # Responsibility
//! - Strip markup tags so frontends can render readable text.
//! - Derive bounded summaries for list/table rows.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Strips markup tags and collapses whitespace.
pub fn plain_text(contents: &str) -> String {
    let without_tags = TAG_RE.replace_all(contents, " ");
    WHITESPACE_RE.replace_all(&without_tags, " ").trim().to_string()
}

/// Returns the first `max_chars` characters of the plain-text projection,
/// with an ellipsis when truncated.
pub fn summary(contents: &str, max_chars: usize) -> String {
    let text = plain_text(contents);
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}
