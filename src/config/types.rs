use serde::Deserialize;

use crate::normalize::Packaging;

/// Main configuration structure for Larder
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub harvester: HarvesterConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub category: Vec<CategoryEntry>,
    pub output: OutputConfig,
}

/// A randomized delay window in milliseconds
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DelayRange {
    /// Lower bound of the window (inclusive)
    pub min: u64,

    /// Upper bound of the window (inclusive)
    pub max: u64,
}

/// Harvester behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvesterConfig {
    /// Maximum fetch attempts per URL before giving up
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Per-attempt request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Politeness delay slept before every fetch attempt
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: DelayRange,

    /// Backoff window slept between retries, on top of the politeness delay
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: DelayRange,

    /// Maximum listing pages fetched per category (pagination bound)
    #[serde(rename = "max-listing-pages")]
    pub max_listing_pages: u32,

    /// Maximum detail pages fetched per category; remaining drafts are
    /// finalized from listing data alone
    #[serde(rename = "max-details-per-category")]
    pub max_details_per_category: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "harvester-name")]
    pub harvester_name: String,

    /// Version of the harvester
    #[serde(rename = "harvester-version")]
    pub harvester_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Target-site shape: where content lives and what links to ignore
///
/// These are data, not logic. Swapping this section re-targets the
/// harvester without touching the extraction pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root of the catalog site; category paths and relative links resolve
    /// against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path prefix that marks a content (product) page, e.g. "/in/"
    #[serde(rename = "content-path-prefix")]
    pub content_path_prefix: String,

    /// Minimum number of path segments for a candidate URL
    #[serde(rename = "min-path-segments")]
    pub min_path_segments: usize,

    /// Path segments that disqualify a link (navigation, cart, login, ...)
    #[serde(rename = "exclude-path-segments", default)]
    pub exclude_path_segments: Vec<String>,

    /// Link labels that disqualify a candidate regardless of its URL
    #[serde(rename = "exclude-link-labels", default)]
    pub exclude_link_labels: Vec<String>,

    /// Minimum length of a candidate's display text
    #[serde(rename = "min-label-len")]
    pub min_label_len: usize,

    /// Query parameter used for listing pagination; the only parameter that
    /// survives URL normalization
    #[serde(rename = "pagination-param")]
    pub pagination_param: String,

    /// Keywords scanned over full page text to derive content tags
    #[serde(rename = "tag-vocabulary", default)]
    pub tag_vocabulary: Vec<String>,

    /// Regex matching the boilerplate tail of page titles, stripped before
    /// a title is used as a product name
    #[serde(rename = "title-suffix-pattern")]
    pub title_suffix_pattern: String,
}

/// One category seed: a listing page to harvest
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Path of the category listing page, relative to the base URL
    pub path: String,

    /// Display name used in output rows
    pub name: String,

    /// Packaging class assumed for this category when no in-text keyword
    /// matched at either stage
    #[serde(rename = "default-packaging", default)]
    pub default_packaging: Option<Packaging>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV output file
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}
