//! Field extraction: noisy page content to raw field values
//!
//! Every output field is derived through an ordered strategy chain
//! (structural selector, then free-text patterns, then loose fallbacks);
//! the first candidate passing the field's validity predicate wins and the
//! rest of the chain is never consulted. [`chain::PatternChain`] is the one
//! evaluator behind all of the per-field tables.

pub mod chain;
pub mod fields;
pub mod specs;
pub mod tags;

pub use chain::PatternChain;
pub use fields::{
    detect_out_of_stock, extract_availability, extract_description, extract_image_url,
    extract_name, extract_sku,
};
pub use specs::extract_specs;
pub use tags::extract_tags;

use crate::config::SiteConfig;
use crate::normalize::{
    classify_packaging, clean_text, normalize_price_with_markup, normalize_unit_size,
};
use crate::record::Enrichment;
use crate::ConfigError;
use regex::Regex;
use scraper::Html;
use url::Url;

/// Site-configured patterns, compiled once at startup
///
/// A pattern that does not compile is a configuration error surfaced before
/// the first fetch, never a per-page failure.
#[derive(Debug)]
pub struct FieldChains {
    /// Strips boilerplate tails from page titles before they are used as
    /// product names
    pub title_suffix: Regex,

    /// Keywords scanned over full page text for tag aggregation
    pub vocabulary: Vec<String>,
}

impl FieldChains {
    /// Compiles the configured patterns for this run
    pub fn compile(site: &SiteConfig) -> Result<Self, ConfigError> {
        let title_suffix = Regex::new(&site.title_suffix_pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("title_suffix_pattern does not compile: {}", e))
        })?;

        Ok(Self {
            title_suffix,
            vocabulary: site.tag_vocabulary.clone(),
        })
    }
}

/// Runs every field chain over a fetched detail page and collects the raw
/// results into an [`Enrichment`].
///
/// Absent fields stay `None`; no chain failure aborts a sibling field.
pub fn extract_enrichment(html: &str, page_url: &Url, chains: &FieldChains) -> Enrichment {
    let document = Html::parse_document(html);
    let full_text = document.root_element().text().collect::<Vec<_>>().join(" ");
    let text = clean_text(&full_text);

    let name = extract_name(&document, chains);
    let packaging = classify_packaging(&text);

    let mut tags = extract_tags(&document, &text, &chains.vocabulary);
    // The packaging class doubles as a content tag when known
    if let Some(class) = packaging {
        let tag = class.as_str().to_string();
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }

    Enrichment {
        description: extract_description(&text),
        image_url: extract_image_url(&document, page_url),
        price: normalize_price_with_markup(&document, &text),
        unit_size: normalize_unit_size(name.as_deref().unwrap_or(""), &text),
        packaging,
        availability: extract_availability(&text),
        specs: extract_specs(&text),
        sku_code: extract_sku(page_url),
        tags,
        name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Packaging;

    fn test_chains() -> FieldChains {
        FieldChains {
            title_suffix: Regex::new(r"\s+Wholesalers.*$").unwrap(),
            vocabulary: vec!["premium".to_string(), "imported".to_string()],
        }
    }

    const DETAIL_PAGE: &str = r#"<html>
<head><title>Walnut Brownie Wholesalers in India</title></head>
<body>
<h1>Walnut Brownie 80 gm Pack of 9</h1>
<span class="price">₹199</span> <del>₹249</del>
<img src="https://assets.example.com/products/brownie.jpg" class="hero">
<div>
Product details Rich, fudgy frozen brownie squares loaded with premium
roasted walnuts and dark Belgian chocolate, baked in small batches.
Key Features: soft centre; generous walnut chunks in every piece.
Shelf Life: 9 months.
Storage: Keep frozen at -18C until ready to use.
</div>
</body></html>"#;

    #[test]
    fn test_enrichment_from_detail_page() {
        let url = Url::parse("https://shop.example.com/in/walnut-brownie-80gm").unwrap();
        let enrichment = extract_enrichment(DETAIL_PAGE, &url, &test_chains());

        assert_eq!(
            enrichment.name.as_deref(),
            Some("Walnut Brownie 80 gm Pack of 9")
        );
        assert_eq!(enrichment.price.current.as_deref(), Some("₹199"));
        assert_eq!(enrichment.price.original.as_deref(), Some("₹249"));
        assert_eq!(enrichment.price.discount.as_deref(), Some("20.1%"));
        assert_eq!(enrichment.unit_size.as_deref(), Some("80 gm"));
        assert_eq!(enrichment.packaging, Some(Packaging::Frozen));
        assert_eq!(
            enrichment.image_url.as_deref(),
            Some("https://assets.example.com/products/brownie.jpg")
        );
        assert_eq!(enrichment.sku_code.as_deref(), Some("walnut-brownie-80gm"));
        assert_eq!(enrichment.specs.no_of_pieces.as_deref(), Some("9"));
        assert_eq!(enrichment.specs.shelf_life.as_deref(), Some("9 months"));
        assert!(enrichment
            .description
            .as_deref()
            .unwrap()
            .starts_with("Rich, fudgy"));
        assert!(enrichment.tags.contains(&"Premium".to_string()));
        assert!(enrichment.tags.contains(&"Frozen".to_string()));
        assert_eq!(enrichment.availability, None);
    }

    #[test]
    fn test_enrichment_from_sparse_page() {
        let url = Url::parse("https://shop.example.com/in/mystery").unwrap();
        let enrichment =
            extract_enrichment("<html><body><p>nothing here</p></body></html>", &url, &test_chains());

        assert_eq!(enrichment.name, None);
        assert!(enrichment.price.is_empty());
        assert_eq!(enrichment.description, None);
        assert_eq!(enrichment.specs.populated_count(), 0);
        assert!(enrichment.tags.is_empty());
        // The SKU still derives from the URL alone
        assert_eq!(enrichment.sku_code.as_deref(), Some("mystery"));
    }
}
