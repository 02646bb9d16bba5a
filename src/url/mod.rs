//! URL handling module
//!
//! Provides the canonical URL normalization used for frontier deduplication
//! keys: one product page reached through different relative paths, query
//! decorations, or host spellings collapses to a single visit.

mod normalize;

pub use normalize::normalize_url;
