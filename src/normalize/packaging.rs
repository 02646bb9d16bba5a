//! Packaging classification
//!
//! Infers the coarse storage-condition class of a product (Frozen, Fresh,
//! Chilled, Ambient, Dry) from page text. Classification is keyword based
//! and deliberately order-sensitive: the table below is checked top to
//! bottom and the first keyword present in the text wins, so "fresh frozen
//! peas" classifies as Frozen.

use serde::Deserialize;

/// Coarse storage-condition category for a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    Frozen,
    Fresh,
    Chilled,
    Ambient,
    Dry,
    Unknown,
}

impl Packaging {
    /// Display name used in output rows and tag lists
    pub fn as_str(&self) -> &'static str {
        match self {
            Packaging::Frozen => "Frozen",
            Packaging::Fresh => "Fresh",
            Packaging::Chilled => "Chilled",
            Packaging::Ambient => "Ambient",
            Packaging::Dry => "Dry",
            Packaging::Unknown => "Unknown",
        }
    }

    /// Serialized cell value; Unknown serializes as an empty cell
    pub fn csv_cell(&self) -> &'static str {
        match self {
            Packaging::Unknown => "",
            other => other.as_str(),
        }
    }
}

impl Default for Packaging {
    fn default() -> Self {
        Packaging::Unknown
    }
}

/// Keyword table in priority order. First keyword found in the text sets
/// the class; later keywords are not consulted.
const PACKAGING_KEYWORDS: &[(&str, Packaging)] = &[
    ("frozen", Packaging::Frozen),
    ("fresh", Packaging::Fresh),
    ("chilled", Packaging::Chilled),
    ("ambient", Packaging::Ambient),
    ("dry", Packaging::Dry),
];

/// Classifies packaging from page text by keyword membership.
///
/// Returns `None` when no keyword is present; the caller keeps the entry at
/// `Packaging::Unknown` and may then apply a category-level default.
pub fn classify_packaging(text: &str) -> Option<Packaging> {
    let lower = text.to_lowercase();
    PACKAGING_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, class)| *class)
}
