//! Candidate discovery and the visited frontier
//!
//! Listing pages are scanned for anchor links that look like product detail
//! pages under the configured content prefix. The frontier keys every page
//! by its canonical URL form, so one product reached through different
//! relative paths, query decorations, or host spellings is visited once.

use crate::config::SiteConfig;
use crate::normalize::clean_text;
use crate::url::normalize_url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("hardcoded selector is valid"));

/// A product link discovered on a listing page
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Cleaned anchor text; seeds the draft's name
    pub label: String,

    /// Absolute URL of the detail page
    pub url: Url,
}

/// Site-configured filters separating product links from navigation chrome
#[derive(Debug, Clone)]
pub struct DiscoveryRules {
    content_path_prefix: String,
    min_path_segments: usize,
    exclude_path_segments: Vec<String>,
    exclude_link_labels: Vec<String>,
    min_label_len: usize,
    pagination_param: String,
}

impl DiscoveryRules {
    /// Builds the rules from the site configuration section. Label and
    /// segment exclusions are matched case-insensitively.
    pub fn from_site(site: &SiteConfig) -> Self {
        Self {
            content_path_prefix: site.content_path_prefix.clone(),
            min_path_segments: site.min_path_segments,
            exclude_path_segments: site
                .exclude_path_segments
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            exclude_link_labels: site
                .exclude_link_labels
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            min_label_len: site.min_label_len,
            pagination_param: site.pagination_param.clone(),
        }
    }

    /// The query parameter that distinguishes listing pages of one category
    pub fn pagination_param(&self) -> &str {
        &self.pagination_param
    }

    fn accepts(&self, url: &Url, base_host: &str, label: &str) -> bool {
        let host = url.host_str().unwrap_or("");
        if host.trim_start_matches("www.") != base_host {
            return false;
        }

        let path = url.path();
        if !path.starts_with(&self.content_path_prefix) {
            return false;
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < self.min_path_segments {
            return false;
        }
        if segments
            .iter()
            .any(|s| self.exclude_path_segments.contains(&s.to_lowercase()))
        {
            return false;
        }

        if label.chars().count() < self.min_label_len {
            return false;
        }
        // Purely numeric/symbolic anchor text is chrome, not a product
        if !label.chars().any(|c| c.is_alphabetic()) {
            return false;
        }
        if self.exclude_link_labels.contains(&label.to_lowercase()) {
            return false;
        }

        true
    }
}

/// Scans a listing page for product links.
///
/// Relative hrefs are resolved against `base_url`; off-site links,
/// navigation chrome (short or excluded labels), and paths outside the
/// content prefix are dropped. Duplicates within the page collapse to the
/// first occurrence, in document order.
pub fn discover_candidates(html: &str, base_url: &Url, rules: &DiscoveryRules) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let base_host = base_url.host_str().unwrap_or("").trim_start_matches("www.");

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let href = match anchor.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let url = match base_url.join(href) {
            Ok(url) => url,
            Err(_) => continue,
        };

        let label = clean_text(&anchor.text().collect::<String>());
        if !rules.accepts(&url, base_host, &label) {
            continue;
        }

        let key = match normalize_url(url.as_str(), &[rules.pagination_param()]) {
            Ok(normalized) => normalized.to_string(),
            Err(_) => continue,
        };
        if seen.insert(key) {
            candidates.push(Candidate { label, url });
        }
    }

    candidates
}

/// Run-wide visited set keyed by canonical URL form
#[derive(Debug)]
pub struct Frontier {
    visited: HashSet<String>,
    pagination_param: String,
}

impl Frontier {
    /// Creates an empty frontier. `pagination_param` is the one query
    /// parameter preserved by the canonical key, so distinct listing pages
    /// of a category stay distinct while tracking decorations collapse.
    pub fn new(pagination_param: impl Into<String>) -> Self {
        Self {
            visited: HashSet::new(),
            pagination_param: pagination_param.into(),
        }
    }

    fn key(&self, url: &str) -> Option<String> {
        normalize_url(url, &[self.pagination_param.as_str()])
            .ok()
            .map(|u| u.to_string())
    }

    /// Marks a URL visited. Returns `true` if it had not been seen before.
    /// A URL whose canonical form cannot be computed is treated as already
    /// visited, so malformed links never enter the work queue.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        match self.key(url) {
            Some(key) => self.visited.insert(key),
            None => false,
        }
    }

    /// Returns whether a URL's canonical form has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        match self.key(url) {
            Some(key) => self.visited.contains(&key),
            None => true,
        }
    }

    /// Number of distinct pages visited
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Returns whether nothing has been visited yet
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
