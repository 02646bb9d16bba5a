//! Unit-size normalization
//!
//! Finds the pack/measure declaration of a product ("80 gm", "1 ltr / pc",
//! "Pack of 9") through an ordered list of measurement-unit patterns. The
//! product name is scanned before the full page text because names carry
//! the canonical pack size far more reliably than marketing copy.

use crate::normalize::text::clean_text;
use regex::Regex;
use std::sync::LazyLock;

/// Measurement patterns in priority order: abbreviated units, spelled-out
/// units, parenthesized declarations, then bare single-letter units.
static UNIT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    // Longer alternatives come first so "grams" is not cut to "gram".
    [
        r"(?i)(\d+(?:\.\d+)?\s*(?:gm|kg|ml|litre|ltr|pieces|piece|pcs|pc|packs|pack)(?:\s*/\s*\w+)?)",
        r"(?i)(\d+(?:\.\d+)?\s*(?:grams|gram|kilograms|kilogram|milliliters|milliliter|litres|liters|liter)(?:\s*/\s*\w+)?)",
        r"(?i)\((\d+(?:\.\d+)?\s*(?:gm|kg|ml|ltr)[^)]*)\)",
        r"(?i)(\d+(?:\.\d+)?\s*(?:kg|ml|g|l)\b)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hardcoded regex pattern is valid"))
    .collect()
});

/// Normalizes the unit size from the product name, falling back to full
/// page text. First match in pattern priority order wins.
///
/// # Example
///
/// ```
/// use larder::normalize::normalize_unit_size;
///
/// let unit = normalize_unit_size("Walnut Brownie 80 gm Pack of 9", "");
/// assert_eq!(unit.as_deref(), Some("80 gm"));
/// ```
pub fn normalize_unit_size(name: &str, full_text: &str) -> Option<String> {
    for haystack in [name, full_text] {
        if haystack.is_empty() {
            continue;
        }
        for pattern in UNIT_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(haystack) {
                if let Some(value) = caps.get(1) {
                    let cleaned = clean_text(value.as_str());
                    if !cleaned.is_empty() {
                        return Some(cleaned);
                    }
                }
            }
        }
    }
    None
}
