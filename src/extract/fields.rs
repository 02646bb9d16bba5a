//! Per-field extraction chains over a detail page
//!
//! Each function evaluates one field's strategy chain against the parsed
//! document or its cleaned text: structural selectors first, free-text
//! patterns behind them. First valid candidate wins, except description,
//! which takes the longest valid cue-phrase match.

use crate::extract::chain::PatternChain;
use crate::extract::FieldChains;
use crate::normalize::{clean_text, truncate_chars};
use crate::record::Availability;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 200;
const DESCRIPTION_MIN_LEN: usize = 30;
const DESCRIPTION_MAX_LEN: usize = 500;

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("hardcoded selector is valid"));
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("hardcoded selector is valid"));

/// Product-asset image references, in priority order. The src must carry a
/// product-asset path marker and a recognized image extension.
static IMG_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["img[src]", "img[data-src]"]
        .iter()
        .map(|s| Selector::parse(s).expect("hardcoded selector is valid"))
        .collect()
});

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];
const PRODUCT_ASSET_MARKERS: &[&str] = &["products", "assets."];

/// Bounded "Product details" window, up to the next recognized section
/// heading. Runs against the cleaned page text.
static DESCRIPTION_WINDOW: LazyLock<PatternChain> = LazyLock::new(|| {
    PatternChain::new(
        &[r"Product details\s*(.+?)(?:Product Highlights|Key Features|Similar)"],
        DESCRIPTION_MIN_LEN,
        usize::MAX,
    )
});

/// Marketing-language cue phrases, the free-text fallback when no labeled
/// details section exists. Longest hit wins.
static DESCRIPTION_CUES: LazyLock<PatternChain> = LazyLock::new(|| {
    PatternChain::new(
        &[
            r"([A-Z][^.]*(?:premium|quality|ingredients|flavor|taste|rich|delicious|fresh|organic|natural)[^.]*[.!])",
            r"([A-Z][^.]*(?:made with|crafted|indulge|experience|enjoy)[^.]*[.!])",
        ],
        DESCRIPTION_MIN_LEN,
        DESCRIPTION_MAX_LEN,
    )
});

/// Phrases marking a product as unavailable
const OUT_OF_STOCK_INDICATORS: &[&str] = &["out of stock", "unavailable", "sold out", "notify me"];

fn valid_name(candidate: &str) -> bool {
    let len = candidate.chars().count();
    len >= NAME_MIN_LEN && len <= NAME_MAX_LEN
}

/// Extracts the product name: `h1` heading first, then the page title with
/// its boilerplate suffix stripped. The listing label is the final fallback
/// and lives in the draft, so absence here is fine.
pub fn extract_name(document: &Html, chains: &FieldChains) -> Option<String> {
    if let Some(heading) = document.select(&H1_SELECTOR).next() {
        let name = clean_text(&heading.text().collect::<String>());
        if valid_name(&name) {
            return Some(name);
        }
    }

    if let Some(title) = document.select(&TITLE_SELECTOR).next() {
        let raw = title.text().collect::<String>();
        let stripped = chains.title_suffix.replace(&raw, "");
        let name = clean_text(&stripped);
        if valid_name(&name) {
            return Some(name);
        }
    }

    None
}

/// Extracts the bounded product description from cleaned page text.
///
/// The "Product details" window is the priority strategy; the cue-phrase
/// chain is the fallback and, unlike every other field, prefers its longest
/// match. Either way the result is capped at 500 characters.
pub fn extract_description(text: &str) -> Option<String> {
    if let Some(window) = DESCRIPTION_WINDOW.first_match(text) {
        return Some(truncate_chars(&window, DESCRIPTION_MAX_LEN));
    }
    DESCRIPTION_CUES.longest_match(text)
}

/// Extracts the first product-asset image URL, resolved against the base.
///
/// Non-product imagery (logos, icons, payment badges) is ignored by
/// requiring both an asset path marker and an image file extension.
pub fn extract_image_url(document: &Html, base_url: &Url) -> Option<String> {
    for selector in IMG_SELECTORS.iter() {
        for element in document.select(selector) {
            let src = element
                .value()
                .attr("src")
                .or_else(|| element.value().attr("data-src"))
                .unwrap_or("");
            if is_product_asset(src) {
                if let Ok(resolved) = base_url.join(src) {
                    return Some(resolved.to_string());
                }
            }
        }
    }
    None
}

fn is_product_asset(src: &str) -> bool {
    let lower = src.to_lowercase();
    PRODUCT_ASSET_MARKERS.iter().any(|m| lower.contains(m))
        && IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

/// Extracts the site-assigned code: the last path segment of the detail URL
pub fn extract_sku(page_url: &Url) -> Option<String> {
    page_url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}

/// Scans lowercased text for out-of-stock indicator phrases
pub fn detect_out_of_stock(text: &str) -> bool {
    let lower = text.to_lowercase();
    OUT_OF_STOCK_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
}

/// Availability as asserted by the detail page: `Some(OutOfStock)` when an
/// indicator phrase is present, `None` otherwise so the listing-stage value
/// survives the merge.
pub fn extract_availability(text: &str) -> Option<Availability> {
    if detect_out_of_stock(text) {
        Some(Availability::OutOfStock)
    } else {
        None
    }
}
