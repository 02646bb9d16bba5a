//! Normalization stage: raw extracted tokens to canonical field values

pub mod packaging;
pub mod price;
pub mod text;
pub mod unit;

pub use packaging::{classify_packaging, Packaging};
pub use price::{normalize_price, normalize_price_with_markup, PriceBreakdown};
pub use text::{clean_text, title_case, truncate_chars, window_around};
pub use unit::normalize_unit_size;
