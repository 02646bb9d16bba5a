//! Price normalization
//!
//! Scans free text for currency-amount tokens and derives the
//! current/original/discount triple. The token heuristic is positional:
//! the first amount in document order is the current price, and a second
//! amount is accepted as the original price only when it numerically
//! exceeds the current one. A second amount at or below the current price
//! is discarded rather than producing a negative discount. This is a
//! best-effort heuristic and can misfire on pages listing unrelated
//! prices; the markup-aware variant narrows it by preferring an amount
//! inside struck-through markup.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Currency token spellings, in the order they are scanned. All variants
/// normalize to the glyph-prefixed display form.
static CURRENCY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"₹\s*(\d+(?:,\d+)*(?:\.\d+)?)",
        r"(\d+(?:,\d+)*(?:\.\d+)?)\s*₹",
        r"(?i)Rs\.?\s*(\d+(?:,\d+)*(?:\.\d+)?)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hardcoded regex pattern is valid"))
    .collect()
});

/// Normalized price fields in display form ("₹1,299")
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBreakdown {
    pub current: Option<String>,
    pub original: Option<String>,
    pub discount: Option<String>,
}

impl PriceBreakdown {
    /// True when no currency token was found at all
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

/// One currency token located in the text
struct PriceToken {
    position: usize,
    value: f64,
    display: String,
}

/// Extracts all currency tokens from `text` in document order, deduplicated
/// by amount string. Unparseable amounts are skipped silently.
fn scan_tokens(text: &str) -> Vec<PriceToken> {
    let mut tokens: Vec<PriceToken> = Vec::new();
    for pattern in CURRENCY_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            if let (Some(whole), Some(amount)) = (caps.get(0), caps.get(1)) {
                if let Some(value) = parse_amount(amount.as_str()) {
                    tokens.push(PriceToken {
                        position: whole.start(),
                        value,
                        display: format!("₹{}", amount.as_str()),
                    });
                }
            }
        }
    }
    tokens.sort_by_key(|t| t.position);

    let mut seen = std::collections::HashSet::new();
    tokens.retain(|t| seen.insert(t.display.clone()));
    tokens
}

/// Parses a numeric amount string, tolerating thousands separators
pub fn parse_amount(amount: &str) -> Option<f64> {
    amount.replace(',', "").parse::<f64>().ok()
}

/// Normalizes the price fields from free text.
///
/// The first token in document order becomes the current price. A second
/// distinct token becomes the original price only if it exceeds the current
/// price, in which case the discount percentage is derived from the pair.
///
/// # Example
///
/// ```
/// use larder::normalize::normalize_price;
///
/// let price = normalize_price("Special offer ₹199 (MRP ₹249)");
/// assert_eq!(price.current.as_deref(), Some("₹199"));
/// assert_eq!(price.original.as_deref(), Some("₹249"));
/// assert_eq!(price.discount.as_deref(), Some("20.1%"));
/// ```
pub fn normalize_price(text: &str) -> PriceBreakdown {
    let tokens = scan_tokens(text);
    let mut breakdown = PriceBreakdown::default();

    let first = match tokens.first() {
        Some(first) => first,
        None => return breakdown,
    };
    breakdown.current = Some(first.display.clone());

    if let Some(second) = tokens.get(1) {
        apply_original_candidate(&mut breakdown, first.value, second.value, &second.display);
    }

    breakdown
}

/// Markup-aware variant: prefers an amount inside struck-through markup as
/// the original-price candidate over the generic second-token heuristic.
/// The exceeds-current acceptance rule applies to both paths.
pub fn normalize_price_with_markup(document: &Html, text: &str) -> PriceBreakdown {
    let mut breakdown = normalize_price(text);

    let current = match breakdown.current.as_deref().and_then(parse_display) {
        Some(value) => value,
        None => return breakdown,
    };

    if let Some((strike_value, strike_display)) = struck_through_amount(document) {
        breakdown.original = None;
        breakdown.discount = None;
        apply_original_candidate(&mut breakdown, current, strike_value, &strike_display);
    }

    breakdown
}

/// Accepts `candidate` as the original price only when it exceeds `current`,
/// then derives the discount. Degenerate arithmetic leaves both fields unset.
fn apply_original_candidate(
    breakdown: &mut PriceBreakdown,
    current: f64,
    candidate: f64,
    candidate_display: &str,
) {
    if candidate <= current || candidate <= 0.0 {
        return;
    }
    breakdown.original = Some(candidate_display.to_string());
    let pct = (candidate - current) / candidate * 100.0;
    if pct.is_finite() {
        breakdown.discount = Some(format!("{:.1}%", pct));
    }
}

/// Finds the first struck-through element containing a currency token
fn struck_through_amount(document: &Html) -> Option<(f64, String)> {
    static STRIKE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        ["s", "del", "strike", r#"[style*="line-through"]"#]
            .iter()
            .map(|s| Selector::parse(s).expect("hardcoded selector is valid"))
            .collect()
    });

    for selector in STRIKE_SELECTORS.iter() {
        for element in document.select(selector) {
            let text: String = element.text().collect();
            if let Some(token) = scan_tokens(&text).into_iter().next() {
                return Some((token.value, token.display));
            }
        }
    }
    None
}

/// Parses the numeric value out of a display form like "₹1,299"
fn parse_display(display: &str) -> Option<f64> {
    parse_amount(display.trim_start_matches('₹').trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tokens_ascending() {
        let price = normalize_price("₹199 ... ₹249");
        assert_eq!(price.current.as_deref(), Some("₹199"));
        assert_eq!(price.original.as_deref(), Some("₹249"));
        assert_eq!(price.discount.as_deref(), Some("20.1%"));
    }

    #[test]
    fn test_two_tokens_descending_rejects_original() {
        let price = normalize_price("₹249 ... ₹199");
        assert_eq!(price.current.as_deref(), Some("₹249"));
        assert_eq!(price.original, None);
        assert_eq!(price.discount, None);
    }

    #[test]
    fn test_equal_tokens_dedupe_to_current_only() {
        let price = normalize_price("₹199 per pack, ₹199 at checkout");
        assert_eq!(price.current.as_deref(), Some("₹199"));
        assert_eq!(price.original, None);
        assert_eq!(price.discount, None);
    }

    #[test]
    fn test_single_token() {
        let price = normalize_price("now only ₹85");
        assert_eq!(price.current.as_deref(), Some("₹85"));
        assert!(price.original.is_none());
    }

    #[test]
    fn test_no_token() {
        let price = normalize_price("no prices here");
        assert!(price.is_empty());
    }

    #[test]
    fn test_thousands_separator() {
        let price = normalize_price("₹1,299 down from ₹1,499");
        assert_eq!(price.current.as_deref(), Some("₹1,299"));
        assert_eq!(price.original.as_deref(), Some("₹1,499"));
        assert_eq!(price.discount.as_deref(), Some("13.3%"));
    }

    #[test]
    fn test_rs_spelling_normalizes_to_glyph() {
        let price = normalize_price("Rs. 199 (was Rs 249)");
        assert_eq!(price.current.as_deref(), Some("₹199"));
        assert_eq!(price.original.as_deref(), Some("₹249"));
    }

    #[test]
    fn test_glyph_after_amount() {
        let price = normalize_price("pay 450 ₹ only");
        assert_eq!(price.current.as_deref(), Some("₹450"));
    }

    #[test]
    fn test_document_order_across_spellings() {
        // The Rs token comes first in the document even though the glyph
        // pattern is scanned first.
        let price = normalize_price("MRP Rs. 249, offer price ₹199");
        assert_eq!(price.current.as_deref(), Some("₹249"));
        assert_eq!(price.original, None);
        assert_eq!(price.discount, None);
    }

    #[test]
    fn test_third_token_ignored() {
        let price = normalize_price("₹100 ₹300 ₹200");
        assert_eq!(price.current.as_deref(), Some("₹100"));
        assert_eq!(price.original.as_deref(), Some("₹300"));
        assert_eq!(price.discount.as_deref(), Some("66.7%"));
    }

    #[test]
    fn test_markup_variant_prefers_strikethrough() {
        let html = Html::parse_document(
            r#"<div><span class="price">₹199</span> <del>₹299</del> <span>₹249</span></div>"#,
        );
        let price = normalize_price_with_markup(&html, "₹199 ₹299 ₹249");
        assert_eq!(price.current.as_deref(), Some("₹199"));
        assert_eq!(price.original.as_deref(), Some("₹299"));
        assert_eq!(price.discount.as_deref(), Some("33.4%"));
    }

    #[test]
    fn test_markup_variant_strike_not_exceeding_unsets_original() {
        let html = Html::parse_document(r#"<div>₹249 <s>₹199</s></div>"#);
        let price = normalize_price_with_markup(&html, "₹249 ₹199");
        assert_eq!(price.current.as_deref(), Some("₹249"));
        assert_eq!(price.original, None);
        assert_eq!(price.discount, None);
    }

    #[test]
    fn test_markup_variant_falls_back_to_second_token() {
        let html = Html::parse_document(r#"<div>₹199 <b>₹249</b></div>"#);
        let price = normalize_price_with_markup(&html, "₹199 ₹249");
        assert_eq!(price.original.as_deref(), Some("₹249"));
        assert_eq!(price.discount.as_deref(), Some("20.1%"));
    }

    #[test]
    fn test_markup_variant_style_attribute() {
        let html = Html::parse_document(
            r#"<div><span>₹180</span><span style="text-decoration: line-through">₹240</span></div>"#,
        );
        let price = normalize_price_with_markup(&html, "₹180 ₹240");
        assert_eq!(price.original.as_deref(), Some("₹240"));
        assert_eq!(price.discount.as_deref(), Some("25.0%"));
    }
}
