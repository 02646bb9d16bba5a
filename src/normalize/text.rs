//! Free-text cleanup shared by the extraction and normalization stages

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("hardcoded regex pattern is valid"));

// Conservative whitelist: word characters, spaces, and the punctuation that
// survives into catalog fields. Everything else (stray markup, control
// characters, decorative symbols) is dropped.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,;:()\-₹%/\[\]]+").expect("hardcoded regex pattern is valid"));

/// Cleans a raw extracted text value for use in a catalog field.
///
/// Collapses all whitespace runs to single spaces, strips characters outside
/// the whitelist, and trims the result.
///
/// # Example
///
/// ```
/// use larder::normalize::clean_text;
///
/// assert_eq!(clean_text("  Walnut\n\tBrownie  "), "Walnut Brownie");
/// ```
pub fn clean_text(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw, " ");
    let filtered = DISALLOWED.replace_all(&collapsed, "");
    filtered.trim().to_string()
}

/// Title-cases a keyword for tag output ("premium" -> "Premium").
pub fn title_case(word: &str) -> String {
    word.split_whitespace()
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Returns a slice of `text` around the byte offset `at`, extended `before`
/// bytes back and `after` bytes forward, snapped to char boundaries.
///
/// Used to inspect the neighborhood of a product label inside listing-page
/// text without slicing through a multi-byte character.
pub fn window_around(text: &str, at: usize, before: usize, after: usize) -> &str {
    let mut start = at.saturating_sub(before);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = usize::min(at.saturating_add(after), text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

/// Truncates a string to at most `max_chars` characters, respecting char
/// boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(clean_text("a  b\n\nc\td"), "a b c d");
    }

    #[test]
    fn test_strip_disallowed_characters() {
        assert_eq!(clean_text("Brownie<br>* @deal!"), "Browniebr deal");
    }

    #[test]
    fn test_keeps_currency_and_punctuation() {
        assert_eq!(clean_text("₹1,299.00 (80 gm/pc)"), "₹1,299.00 (80 gm/pc)");
    }

    #[test]
    fn test_strips_quotes() {
        assert_eq!(clean_text(r#"the "best" brownie"#), "the best brownie");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("premium"), "Premium");
        assert_eq!(title_case("hand crafted"), "Hand Crafted");
        assert_eq!(title_case("FROZEN"), "Frozen");
    }

    #[test]
    fn test_window_around_ascii() {
        let text = "0123456789";
        assert_eq!(window_around(text, 5, 2, 3), "34567");
    }

    #[test]
    fn test_window_around_clamps_to_bounds() {
        let text = "abc";
        assert_eq!(window_around(text, 1, 10, 10), "abc");
    }

    #[test]
    fn test_window_around_multibyte() {
        // The rupee sign is three bytes; the window must not split it.
        let text = "pay ₹199 now";
        let at = text.find("now").unwrap();
        let window = window_around(text, at, 8, 3);
        assert!(window.contains("₹199"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 4), "abcd");
        assert_eq!(truncate_chars("ab", 4), "ab");
        assert_eq!(truncate_chars("₹₹₹₹", 2), "₹₹");
    }
}
