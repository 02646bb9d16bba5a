//! CSV sink: assembled entries to a fixed-column file
//!
//! The sink buffers finished [`CatalogEntry`] records in memory, deduplicates
//! them by product page URL at append time, and writes the whole batch in one
//! pass at the end of the run. An interrupted run flushes the partial batch
//! to a timestamped sibling file instead of the configured path.

use crate::record::{CatalogEntry, SpecField};
use crate::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Output columns, in the order consumers of the file depend on
pub const HEADER: [&str; 27] = [
    "product_name",
    "category",
    "price_current",
    "price_original",
    "discount_percentage",
    "product_description",
    "product_image_url",
    "product_page_url",
    "availability_status",
    "unit_size",
    "packaging_type",
    "no_of_pieces",
    "fillet_size",
    "meat_content",
    "weight_variation",
    "shelf_life",
    "storage_instructions",
    "thawing_instructions",
    "cooking_instructions",
    "serving_suggestions",
    "key_features",
    "product_highlights",
    "premium_ingredients",
    "health_conscious_info",
    "sku_code",
    "tags",
    "scraped_timestamp",
];

/// Buffering CSV writer for catalog entries
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    entries: Vec<CatalogEntry>,
    seen_urls: HashSet<String>,
}

impl CsvSink {
    /// Creates a sink targeting the given output path. Nothing touches the
    /// filesystem until a flush.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            seen_urls: HashSet::new(),
        }
    }

    /// Buffers an entry. Returns `false` when an entry with the same page
    /// URL was already accepted; the duplicate is dropped.
    pub fn append(&mut self, entry: CatalogEntry) -> bool {
        if !self.seen_urls.insert(entry.page_url.clone()) {
            tracing::debug!("Duplicate entry dropped for {}", entry.page_url);
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Number of buffered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buffered entries, for end-of-run reporting
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The configured output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes all buffered entries to the configured path, replacing any
    /// existing file. With nothing buffered this writes no file at all and
    /// returns zero.
    pub fn flush(&self) -> Result<usize> {
        if self.entries.is_empty() {
            tracing::warn!("No entries collected, nothing to save");
            return Ok(0);
        }
        self.write_to(&self.path)?;
        tracing::info!("Wrote {} entries to {}", self.entries.len(), self.path.display());
        Ok(self.entries.len())
    }

    /// Writes the buffered entries to a timestamped sibling of the
    /// configured path, preserving whatever an earlier complete run wrote
    /// there. Used when the run was interrupted.
    pub fn flush_partial(&self) -> Result<(usize, PathBuf)> {
        let path = self.partial_path();
        if self.entries.is_empty() {
            tracing::warn!("No entries collected, nothing to save");
            return Ok((0, path));
        }
        self.write_to(&path)?;
        tracing::info!(
            "Wrote {} entries from interrupted run to {}",
            self.entries.len(),
            path.display()
        );
        Ok((self.entries.len(), path))
    }

    fn partial_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("catalog");
        self.path
            .with_file_name(format!("{}_partial_{}.csv", stem, stamp))
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        for entry in &self.entries {
            writer.write_record(row(entry))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Renders one entry as its output row; unset optional fields become empty
/// cells, never a literal "None"
fn row(entry: &CatalogEntry) -> Vec<String> {
    let mut cells = Vec::with_capacity(HEADER.len());
    cells.push(entry.name.clone());
    cells.push(entry.category.clone());
    cells.push(entry.price.current.clone().unwrap_or_default());
    cells.push(entry.price.original.clone().unwrap_or_default());
    cells.push(entry.price.discount.clone().unwrap_or_default());
    cells.push(entry.description.clone().unwrap_or_default());
    cells.push(entry.image_url.clone().unwrap_or_default());
    cells.push(entry.page_url.clone());
    cells.push(entry.availability.as_str().to_string());
    cells.push(entry.unit_size.clone().unwrap_or_default());
    cells.push(entry.packaging.csv_cell().to_string());
    for field in SpecField::ALL {
        cells.push(entry.specs.get(field).unwrap_or_default().to_string());
    }
    cells.push(entry.sku_code.clone().unwrap_or_default());
    cells.push(entry.tags.join(";"));
    cells.push(entry.captured_at.to_rfc3339());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Packaging, PriceBreakdown};
    use crate::record::{assemble, Availability, Draft, Enrichment};
    use chrono::Utc;

    fn entry(name: &str, url: &str) -> CatalogEntry {
        let draft = Draft::new(
            name.to_string(),
            url.to_string(),
            url.to_string(),
            "Desserts".to_string(),
        );
        assemble(draft, None, Utc::now()).unwrap()
    }

    fn rich_entry() -> CatalogEntry {
        let mut draft = Draft::new(
            "Walnut Brownie".to_string(),
            "https://shop.example.com/in/walnut-brownie".to_string(),
            "https://shop.example.com/in/walnut-brownie".to_string(),
            "Desserts".to_string(),
        );
        draft.price = PriceBreakdown {
            current: Some("₹199".to_string()),
            original: Some("₹249".to_string()),
            discount: Some("20.1%".to_string()),
        };
        let enrichment = Enrichment {
            description: Some("Rich, fudgy squares with \"premium\" walnuts".to_string()),
            packaging: Some(Packaging::Frozen),
            availability: Some(Availability::OutOfStock),
            tags: vec!["Premium".to_string(), "Frozen".to_string()],
            sku_code: Some("walnut-brownie".to_string()),
            ..Enrichment::default()
        };
        assemble(draft, Some(enrichment), Utc::now()).unwrap()
    }

    #[test]
    fn test_header_has_expected_shape() {
        assert_eq!(HEADER.len(), 27);
        assert_eq!(HEADER[0], "product_name");
        assert_eq!(HEADER[26], "scraped_timestamp");
        // Spec columns sit between packaging_type and sku_code in order
        assert_eq!(HEADER[11], "no_of_pieces");
        assert_eq!(HEADER[23], "health_conscious_info");
    }

    #[test]
    fn test_row_width_matches_header() {
        assert_eq!(row(&rich_entry()).len(), HEADER.len());
        assert_eq!(row(&entry("Brownie", "https://x.example/in/b")).len(), HEADER.len());
    }

    #[test]
    fn test_append_dedups_by_page_url() {
        let mut sink = CsvSink::new("out.csv");
        assert!(sink.append(entry("Brownie", "https://shop.example.com/in/brownie")));
        assert!(!sink.append(entry("Brownie again", "https://shop.example.com/in/brownie")));
        assert!(sink.append(entry("Paneer", "https://shop.example.com/in/paneer")));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_flush_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let sink = CsvSink::new(&path);
        assert_eq!(sink.flush().unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_flush_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        let mut sink = CsvSink::new(&path);
        sink.append(rich_entry());
        sink.append(entry("Malai Paneer", "https://shop.example.com/in/malai-paneer"));
        assert_eq!(sink.flush().unwrap(), 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 27);
        assert_eq!(&headers[0], "product_name");

        let rows: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(&first[0], "Walnut Brownie");
        assert_eq!(&first[2], "₹199");
        assert_eq!(&first[4], "20.1%");
        // Quotes inside the description survive the round trip
        assert_eq!(&first[5], "Rich, fudgy squares with \"premium\" walnuts");
        assert_eq!(&first[8], "Out of Stock");
        assert_eq!(&first[10], "Frozen");
        assert_eq!(&first[25], "Premium;Frozen");

        let second = &rows[1];
        assert_eq!(&second[0], "Malai Paneer");
        // Unset optionals are empty cells
        assert_eq!(&second[2], "");
        assert_eq!(&second[5], "");
        assert_eq!(&second[8], "In Stock");
        assert_eq!(&second[10], "");
    }

    #[test]
    fn test_flush_partial_names_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        let mut sink = CsvSink::new(&path);
        sink.append(entry("Brownie", "https://shop.example.com/in/brownie"));

        let (written, partial) = sink.flush_partial().unwrap();
        assert_eq!(written, 1);
        assert!(partial.exists());
        assert!(!path.exists());

        let name = partial.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("catalog_partial_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_timestamp_cell_is_rfc3339() {
        let e = entry("Brownie", "https://shop.example.com/in/brownie");
        let cells = row(&e);
        assert!(chrono::DateTime::parse_from_rfc3339(&cells[26]).is_ok());
    }
}
