//! Tag aggregation
//!
//! Tags come from two sources, unioned in order: badge/label elements on
//! the page (alt-text for dietary icons, element text otherwise), then a
//! configured keyword vocabulary scanned case-insensitively over the full
//! page text. Duplicates across both sources are suppressed; first
//! detection order is preserved for output stability.

use crate::normalize::{clean_text, title_case};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Minimum length for a badge-derived tag; shorter fragments are noise
const MIN_BADGE_LEN: usize = 3;

static BADGE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"img[alt*="dietary"]"#,
        r#"[class*="badge"]"#,
        r#"[class*="tag"]"#,
        r#"[class*="label"]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("hardcoded selector is valid"))
    .collect()
});

/// Collects tags from badge elements and the keyword vocabulary.
///
/// `full_text` is the page's cleaned text; `vocabulary` comes from the site
/// configuration. Vocabulary hits are emitted Title Cased.
pub fn extract_tags(document: &Html, full_text: &str, vocabulary: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    let mut push = |tag: String| {
        if seen.insert(tag.to_lowercase()) {
            tags.push(tag);
        }
    };

    for selector in BADGE_SELECTORS.iter() {
        for element in document.select(selector) {
            let raw = if element.value().name() == "img" {
                element.value().attr("alt").unwrap_or("").to_string()
            } else {
                element.text().collect::<String>()
            };
            let tag = clean_text(&raw);
            if tag.chars().count() >= MIN_BADGE_LEN {
                push(tag);
            }
        }
    }

    let lower_text = full_text.to_lowercase();
    for keyword in vocabulary {
        if lower_text.contains(&keyword.to_lowercase()) {
            push(title_case(keyword));
        }
    }

    tags
}
