//! Larder: a polite catalog harvester
//!
//! This crate crawls a catalog storefront from a configured list of category
//! pages, extracts product fields from listing and detail pages through
//! ordered strategy chains, normalizes them (prices, unit sizes, packaging
//! classes, tags), and writes the assembled records to a fixed-column CSV.

pub mod config;
pub mod extract;
pub mod harvest;
pub mod normalize;
pub mod record;
pub mod sink;
pub mod url;

use thiserror::Error;

/// Main error type for Larder operations
#[derive(Debug, Error)]
pub enum LarderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("First seed page unreachable: {url}")]
    SeedUnreachable { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Larder operations
pub type Result<T> = std::result::Result<T, LarderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{run_harvest, FailureKind, FetchOutcome, Frontier, HarvestOptions, RunSummary};
pub use normalize::Packaging;
pub use record::{Availability, CatalogEntry, SpecSheet};
pub use sink::CsvSink;
pub use url::normalize_url;
