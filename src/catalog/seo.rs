//! SEO Metadata Generator
//!
//! Derives a search-engine title, description and keyword list from a
//! product's title and HTML description. Purely local, no external service.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Longest generated title, in characters.
pub const MAX_TITLE_CHARS: usize = 60;

/// Longest generated description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 157;

const MAX_KEYWORDS: usize = 10;
const TITLE_KEYWORDS: usize = 5;
const DESCRIPTION_KEYWORDS: usize = 5;
const ELLIPSIS: &str = "...";

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "your", "are", "was", "but", "have",
    "has", "who", "what", "which", "when", "where", "how", "a", "an", "in", "on", "of", "to", "is",
    "it",
];

/// Body of `POST /api/products/generate-seo`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoRequest {
    #[serde(default)]
    pub title: Option<String>,
    /// May contain HTML markup
    #[serde(default)]
    pub description: Option<String>,
}

/// Generated metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: Vec<String>,
}

/// Builds SEO metadata from a title and an HTML description.
///
/// The title falls back to the start of the description when blank. Keywords
/// are the first title words followed by the most frequent description
/// words, deduplicated.
pub fn generate_seo(request: &SeoRequest) -> SeoMetadata {
    let description = strip_html(request.description.as_deref().unwrap_or_default());

    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| take_chars(&description, MAX_TITLE_CHARS));
    let seo_title = truncate(&title, MAX_TITLE_CHARS, false);

    let seo_description = truncate(
        &take_chars(&description, MAX_DESCRIPTION_CHARS),
        MAX_DESCRIPTION_CHARS,
        true,
    );

    let title_words = words(&seo_title, 2).into_iter().take(TITLE_KEYWORDS);
    let description_words = most_frequent(words(&description, 3), DESCRIPTION_KEYWORDS);

    let mut seen = HashSet::new();
    let seo_keywords = title_words
        .chain(description_words)
        .filter(|word| seen.insert(word.clone()))
        .take(MAX_KEYWORDS)
        .collect();

    SeoMetadata {
        seo_title,
        seo_description,
        seo_keywords,
    }
}

/// Replaces every tag with a space and collapses whitespace.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('>') {
            // A tag needs at least one character between the brackets
            Some(end) if end > 0 => {
                text.push(' ');
                rest = &after[end + 1..];
            }
            _ => {
                text.push('<');
                rest = after;
            }
        }
    }
    text.push_str(rest);

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn take_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

/// Cuts `text` to `limit` characters ending in an ellipsis.
///
/// With `at_limit` the ellipsis is applied as soon as the text reaches the
/// limit, otherwise only once it exceeds it.
fn truncate(text: &str, limit: usize, at_limit: bool) -> String {
    let len = text.chars().count();
    let needs_cut = if at_limit { len >= limit } else { len > limit };
    if !needs_cut {
        return text.to_string();
    }

    let mut cut = take_chars(text, limit - ELLIPSIS.len());
    cut.push_str(ELLIPSIS);
    cut
}

/// Lowercased `[a-z0-9]` runs longer than `min_len`, minus stop words.
fn words(text: &str, min_len: usize) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|w| w.len() > min_len && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// The `count` most frequent words, ties broken by first appearance.
fn most_frequent(words: Vec<String>, count: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut frequency: HashMap<String, usize> = HashMap::new();

    for word in words {
        let seen = frequency.entry(word.clone()).or_insert(0);
        if *seen == 0 {
            order.push(word);
        }
        *seen += 1;
    }

    // Stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| frequency[b].cmp(&frequency[a]));
    order.truncate(count);
    order
}
