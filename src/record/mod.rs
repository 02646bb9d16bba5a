//! Catalog record types and the listing/detail merge
//!
//! A record starts life as a [`Draft`] when its link is discovered on a
//! listing page, is optionally enriched by a detail-page [`Enrichment`],
//! and is sealed into an immutable [`CatalogEntry`] by [`assemble`].

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::normalize::{Packaging, PriceBreakdown};

/// Stock availability as displayed on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    /// No out-of-stock indicator was found (the default assumption)
    #[default]
    InStock,

    /// An out-of-stock indicator phrase was found on the page
    OutOfStock,
}

impl Availability {
    /// Returns the display string used in output rows
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Names the labeled specification slots a detail page can populate
///
/// Each field is backed by its own pattern chain in the extractor; the
/// variants here fix the output column each detected value lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecField {
    NoOfPieces,
    FilletSize,
    MeatContent,
    WeightVariation,
    ShelfLife,
    StorageInstructions,
    ThawingInstructions,
    CookingInstructions,
    ServingSuggestions,
    KeyFeatures,
    ProductHighlights,
    PremiumIngredients,
    HealthConsciousInfo,
}

impl SpecField {
    /// Every specification field, in output column order
    pub const ALL: [SpecField; 13] = [
        Self::NoOfPieces,
        Self::FilletSize,
        Self::MeatContent,
        Self::WeightVariation,
        Self::ShelfLife,
        Self::StorageInstructions,
        Self::ThawingInstructions,
        Self::CookingInstructions,
        Self::ServingSuggestions,
        Self::KeyFeatures,
        Self::ProductHighlights,
        Self::PremiumIngredients,
        Self::HealthConsciousInfo,
    ];

    /// Returns the output column name for this field
    pub fn column(&self) -> &'static str {
        match self {
            Self::NoOfPieces => "no_of_pieces",
            Self::FilletSize => "fillet_size",
            Self::MeatContent => "meat_content",
            Self::WeightVariation => "weight_variation",
            Self::ShelfLife => "shelf_life",
            Self::StorageInstructions => "storage_instructions",
            Self::ThawingInstructions => "thawing_instructions",
            Self::CookingInstructions => "cooking_instructions",
            Self::ServingSuggestions => "serving_suggestions",
            Self::KeyFeatures => "key_features",
            Self::ProductHighlights => "product_highlights",
            Self::PremiumIngredients => "premium_ingredients",
            Self::HealthConsciousInfo => "health_conscious_info",
        }
    }
}

impl fmt::Display for SpecField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Labeled specification values extracted from detail-page text
///
/// Every slot is optional: a field whose pattern chain produced nothing
/// stays unset rather than holding an empty-string sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecSheet {
    pub no_of_pieces: Option<String>,
    pub fillet_size: Option<String>,
    pub meat_content: Option<String>,
    pub weight_variation: Option<String>,
    pub shelf_life: Option<String>,
    pub storage_instructions: Option<String>,
    pub thawing_instructions: Option<String>,
    pub cooking_instructions: Option<String>,
    pub serving_suggestions: Option<String>,
    pub key_features: Option<String>,
    pub product_highlights: Option<String>,
    pub premium_ingredients: Option<String>,
    pub health_conscious_info: Option<String>,
}

impl SpecSheet {
    /// Returns the value of one field, if detected
    pub fn get(&self, field: SpecField) -> Option<&str> {
        let slot = match field {
            SpecField::NoOfPieces => &self.no_of_pieces,
            SpecField::FilletSize => &self.fillet_size,
            SpecField::MeatContent => &self.meat_content,
            SpecField::WeightVariation => &self.weight_variation,
            SpecField::ShelfLife => &self.shelf_life,
            SpecField::StorageInstructions => &self.storage_instructions,
            SpecField::ThawingInstructions => &self.thawing_instructions,
            SpecField::CookingInstructions => &self.cooking_instructions,
            SpecField::ServingSuggestions => &self.serving_suggestions,
            SpecField::KeyFeatures => &self.key_features,
            SpecField::ProductHighlights => &self.product_highlights,
            SpecField::PremiumIngredients => &self.premium_ingredients,
            SpecField::HealthConsciousInfo => &self.health_conscious_info,
        };
        slot.as_deref()
    }

    /// Sets the value of one field
    pub fn set(&mut self, field: SpecField, value: String) {
        let slot = match field {
            SpecField::NoOfPieces => &mut self.no_of_pieces,
            SpecField::FilletSize => &mut self.fillet_size,
            SpecField::MeatContent => &mut self.meat_content,
            SpecField::WeightVariation => &mut self.weight_variation,
            SpecField::ShelfLife => &mut self.shelf_life,
            SpecField::StorageInstructions => &mut self.storage_instructions,
            SpecField::ThawingInstructions => &mut self.thawing_instructions,
            SpecField::CookingInstructions => &mut self.cooking_instructions,
            SpecField::ServingSuggestions => &mut self.serving_suggestions,
            SpecField::KeyFeatures => &mut self.key_features,
            SpecField::ProductHighlights => &mut self.product_highlights,
            SpecField::PremiumIngredients => &mut self.premium_ingredients,
            SpecField::HealthConsciousInfo => &mut self.health_conscious_info,
        };
        *slot = Some(value);
    }

    /// Returns how many fields carry a value
    pub fn populated_count(&self) -> usize {
        SpecField::ALL
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }
}

/// Partial record created when a product link is discovered on a listing page
///
/// Identity fields (name, URLs, category) come from the link itself; the
/// remaining fields are best-effort sniffs from the listing text near the
/// link and may be refined by the detail pass.
#[derive(Debug, Clone)]
pub struct Draft {
    /// Link label from the listing page, cleaned
    pub name: String,

    /// Absolute URL of the product page
    pub page_url: String,

    /// Canonical form of `page_url`, the run-wide dedup key
    pub dedup_key: String,

    /// Display name of the category the link was found under
    pub category: String,

    /// Category-level packaging fallback, applied only when no in-text
    /// keyword matched at either stage
    pub default_packaging: Option<Packaging>,

    /// Price tokens found in listing text near the link
    pub price: PriceBreakdown,

    /// Unit size parsed out of the link label
    pub unit_size: Option<String>,

    /// Packaging keyword found in listing text near the link
    pub packaging: Option<Packaging>,

    /// Out-of-stock marker found near the link
    pub availability: Availability,
}

impl Draft {
    /// Creates a draft carrying only identity fields
    pub fn new(name: String, page_url: String, dedup_key: String, category: String) -> Self {
        Self {
            name,
            page_url,
            dedup_key,
            category,
            default_packaging: None,
            price: PriceBreakdown::default(),
            unit_size: None,
            packaging: None,
            availability: Availability::InStock,
        }
    }
}

/// Fields extracted from a product detail page
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: PriceBreakdown,
    pub unit_size: Option<String>,
    pub packaging: Option<Packaging>,
    pub availability: Option<Availability>,
    pub specs: SpecSheet,
    pub sku_code: Option<String>,
    pub tags: Vec<String>,
}

/// One finished catalog record, immutable once handed to the sink
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub category: String,
    pub price: PriceBreakdown,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub page_url: String,
    pub availability: Availability,
    pub unit_size: Option<String>,
    pub packaging: Packaging,
    pub specs: SpecSheet,
    pub sku_code: Option<String>,
    pub tags: Vec<String>,
    pub captured_at: DateTime<Utc>,
}

/// Merges a listing-stage draft with an optional detail-stage enrichment
/// into a finished entry.
///
/// A populated detail value overwrites the listing value; an absent detail
/// extraction never erases listing data. The name is the exception: the
/// longer candidate wins even when both are populated, since detail-page
/// headings carry the full product name where listing labels truncate it.
///
/// Prices move as a triple: the detail-stage breakdown, when it carries a
/// current price, replaces the listing breakdown wholesale so current,
/// original, and discount always describe one observation.
///
/// Packaging is set at most once. A packaging class found at the listing
/// stage survives the detail pass; the category default applies only when
/// neither stage found an in-text keyword.
///
/// Returns `None` when neither stage produced a name: nameless drafts are
/// dropped, never persisted.
pub fn assemble(
    draft: Draft,
    enrichment: Option<Enrichment>,
    captured_at: DateTime<Utc>,
) -> Option<CatalogEntry> {
    let enrichment = enrichment.unwrap_or_default();

    let name = merge_name(&draft.name, enrichment.name.as_deref());
    if name.is_empty() {
        return None;
    }

    let packaging = draft
        .packaging
        .or(enrichment.packaging)
        .or(draft.default_packaging)
        .unwrap_or_default();

    Some(CatalogEntry {
        name,
        category: draft.category,
        price: merge_price(draft.price, enrichment.price),
        description: enrichment.description,
        image_url: enrichment.image_url,
        page_url: draft.page_url,
        availability: enrichment.availability.unwrap_or(draft.availability),
        unit_size: enrichment.unit_size.or(draft.unit_size),
        packaging,
        specs: enrichment.specs,
        sku_code: enrichment.sku_code,
        tags: dedup_tags(enrichment.tags),
        captured_at,
    })
}

/// Picks the longer of the two name candidates, preferring the listing
/// name on ties
fn merge_name(listing: &str, detail: Option<&str>) -> String {
    match detail {
        Some(detail) if detail.chars().count() > listing.chars().count() => detail.to_string(),
        _ => listing.to_string(),
    }
}

/// Resolves the price triple as a unit, detail stage over listing
///
/// The three tokens travel together: pairing a detail-stage current with a
/// listing-stage original would carry a discount that neither pair
/// produced. A detail pass that found any current price replaces the whole
/// listing triple; one that found none leaves it untouched.
fn merge_price(listing: PriceBreakdown, detail: PriceBreakdown) -> PriceBreakdown {
    if detail.current.is_some() {
        detail
    } else {
        listing
    }
}

/// Drops repeated tag strings, keeping first-detection order
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter().filter(|tag| seen.insert(tag.clone())).collect()
}
