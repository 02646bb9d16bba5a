//! Labeled-specification extraction
//!
//! Each specification slot owns an ordered pattern chain anchored on its
//! labeled-section phrase ("Storage:", "Shelf Life:", ...) with looser
//! free-text fallbacks behind it. Chains run over cleaned page text; a slot
//! with no valid match stays unset.

use crate::extract::chain::PatternChain;
use crate::record::{SpecField, SpecSheet};
use std::sync::LazyLock;

/// Per-field chains in output column order. Minimum lengths keep trivial
/// fragments out of the instruction-style fields.
static SPEC_CHAINS: LazyLock<Vec<(SpecField, PatternChain)>> = LazyLock::new(|| {
    vec![
        (
            SpecField::NoOfPieces,
            PatternChain::new(
                &[
                    r"(\d+-\d+)\s*(?:pcs?|pieces?)/pack",
                    r"(\d+)\s*(?:pc|pcs|pieces?)\s*per pack",
                    r"Pack of (\d+)",
                    r"No\.?\s*of\s*Pcs?:\s*(\d+(?:-\d+)?)",
                    r"(\d+-\d+)\s*(?:pcs?|pieces?)",
                    r"(\d+)\s*(?:pc|pcs)(?:[\s,]|$)",
                ],
                1,
                40,
            ),
        ),
        (
            SpecField::FilletSize,
            PatternChain::new(
                &[
                    r"Fillet Size:\s*([^.;]+)",
                    r"(\d+-\d+\s*g)\s*each",
                    r"(\d+\s*gm?/pc)",
                    r"(\d+\s*gm?)\s*per piece",
                    r"(\d+\s*gm?/piece)",
                    r"Size:\s*(\d+[-\d]*\s*g)\b",
                ],
                1,
                80,
            ),
        ),
        (
            SpecField::MeatContent,
            PatternChain::new(
                &[
                    r"Meat Content:\s*([^.;]+)",
                    r"Contains (\d+%\s*(?:chicken|meat|fish|mutton|beef)[^.;]*)",
                    r"(\d+%\s*(?:chicken|meat|fish|mutton|beef))",
                ],
                1,
                120,
            ),
        ),
        (
            SpecField::WeightVariation,
            PatternChain::new(
                &[
                    r"Weight Variation[^:]*:\s*([^.;]+)",
                    r"(±\s*\d+\s*g)",
                    r"Weight.{0,40}?(\+/-\s*\d+\s*g)",
                ],
                1,
                60,
            ),
        ),
        (
            SpecField::ShelfLife,
            PatternChain::new(
                &[
                    r"Shelf Life:\s*([^.;]+)",
                    r"Lasts up to (\d+\s*(?:days?|months?)[^.;]*)",
                    r"(\d+\s*(?:days?|months?) from manufacturing)",
                    r"(\d+\s*(?:days?|months?) when stored[^.;]*)",
                    r"Best before (\d+\s*(?:days?|months?))",
                ],
                1,
                100,
            ),
        ),
        (
            SpecField::StorageInstructions,
            PatternChain::new(
                &[
                    r"Storage(?: Instructions?| and Handling)?:\s*(.+?)(?:Thawing|Cooking|Shelf Life|Serving|$)",
                    r"(Store at [^.]+\.)",
                    r"(Keep frozen at [^.]+\.)",
                ],
                10,
                400,
            ),
        ),
        (
            SpecField::ThawingInstructions,
            PatternChain::new(
                &[
                    r"Thawing Instructions?:\s*(.+?)(?:Important:|Cooking|Storage|Shelf Life|$)",
                    r"(Thaw in [^.]+\.)",
                    r"Refrigerator Method[^:]*:\s*(.+?)(?:Cold Water|Important|$)",
                ],
                20,
                400,
            ),
        ),
        (
            SpecField::CookingInstructions,
            PatternChain::new(
                &[
                    r"Cooking Instructions?:\s*(.+?)(?:Shelf Life|Storage|Serving|Thawing|$)",
                    r"From Freezer to Fryer:\s*(.+?)(?:Safety|Shelf Life|$)",
                    r"(Deep fry at [^.]+\.)",
                    r"(Heat for \d+[^.]+\.)",
                    r"Microwave[^:]*:\s*([^.]+\.)",
                ],
                10,
                400,
            ),
        ),
        (
            SpecField::ServingSuggestions,
            PatternChain::new(
                &[
                    r"Serving Suggestions?:\s*(.+?)(?:Pack Size|Similar|More from|Key Features|$)",
                    r"(Perfect (?:as|for) [^.]+\.)",
                    r"(Enjoy \w[^.]+\.)",
                ],
                15,
                400,
            ),
        ),
        (
            SpecField::KeyFeatures,
            PatternChain::new(
                &[
                    r"Key Features?:\s*(.+?)(?:Serving|Cooking|Product Highlights|Storage|$)",
                    r"Features?:\s*(.+?)(?:Serving|Cooking|$)",
                ],
                20,
                400,
            ),
        ),
        (
            SpecField::ProductHighlights,
            PatternChain::new(
                &[
                    r"Product Highlights?:\s*(.+?)(?:Key Features|Cooking|Storage|Serving|$)",
                    r"Highlights?:\s*(.+?)(?:Key Features|$)",
                ],
                20,
                400,
            ),
        ),
        (
            SpecField::PremiumIngredients,
            PatternChain::new(
                &[
                    r"Premium Ingredients?:\s*([^.;]+)",
                    r"Made with ([^.]*high-quality[^.]*)",
                    r"Crafted with ([^.]+)",
                ],
                10,
                200,
            ),
        ),
        (
            SpecField::HealthConsciousInfo,
            PatternChain::new(
                &[
                    r"Health-?Conscious:\s*([^.;]+)",
                    r"Contains no ([^.;]+)",
                    r"Free from ([^.;]+)",
                    r"No ([^.]*palm oil[^.]*)",
                ],
                5,
                200,
            ),
        ),
    ]
});

/// Runs every specification chain over the cleaned page text. Fields whose
/// chain produced nothing stay unset.
pub fn extract_specs(text: &str) -> SpecSheet {
    let mut sheet = SpecSheet::default();
    for (field, chain) in SPEC_CHAINS.iter() {
        if let Some(value) = chain.first_match(text) {
            sheet.set(*field, value);
        }
    }
    sheet
}
