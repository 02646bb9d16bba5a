//! Run orchestration
//!
//! Drives the two-pass harvest: a listing pass per category that paginates
//! through the category's listing pages and creates drafts from discovered
//! product links, then a detail pass that enriches each draft from its
//! product page. Finished entries stream into the CSV sink; an interrupt
//! finalizes whatever was collected and flushes it to a partial file.

use crate::config::{CategoryEntry, Config};
use crate::extract::{extract_enrichment, FieldChains};
use crate::harvest::fetcher::{build_http_client, fetch, FailureKind, FetchLimits, FetchOutcome};
use crate::harvest::frontier::{discover_candidates, Candidate, DiscoveryRules, Frontier};
use crate::normalize::{
    clean_text, classify_packaging, normalize_price, normalize_unit_size, window_around,
};
use crate::record::{assemble, Availability, CatalogEntry, Draft};
use crate::sink::CsvSink;
use crate::{LarderError, Result};
use scraper::Html;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Bytes of listing text inspected before a product label for price and
/// stock sniffing
const SNIFF_BEFORE: usize = 100;

/// Bytes inspected after the label; prices usually trail the name
const SNIFF_AFTER: usize = 200;

/// Per-run knobs supplied by the caller on top of the configuration
#[derive(Debug, Clone, Default)]
pub struct HarvestOptions {
    /// Caps the number of entries persisted; the run stops early once
    /// reached. `None` harvests everything the configuration allows.
    pub limit: Option<usize>,
}

/// What a finished (or interrupted) run did
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub categories_visited: usize,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub drafts_created: usize,
    pub entries_enriched: usize,
    pub entries_persisted: usize,
    pub interrupted: bool,
    pub elapsed: Duration,
}

/// Runs the full harvest described by the configuration.
///
/// Categories are processed in configured order. Fetch exhaustion on any
/// page after the first is non-fatal: the page is skipped, its draft (if
/// any) is finalized from listing data alone, and the run continues. The
/// very first listing fetch is the exception: if the site cannot be reached
/// at all the run aborts with [`LarderError::SeedUnreachable`].
///
/// Setting `cancel` stops the run at the next attempt boundary; everything
/// collected so far is finalized and flushed to a timestamped partial file.
pub async fn run_harvest(
    config: &Config,
    options: HarvestOptions,
    cancel: Arc<AtomicBool>,
) -> Result<RunSummary> {
    let started = Instant::now();

    let chains = FieldChains::compile(&config.site)?;
    let rules = DiscoveryRules::from_site(&config.site);
    let limits = FetchLimits::from_config(&config.harvester);
    let client = build_http_client(&config.user_agent, config.harvester.request_timeout_secs)?;
    let base_url = Url::parse(&config.site.base_url)?;

    let mut frontier = Frontier::new(config.site.pagination_param.clone());
    let mut sink = CsvSink::new(&config.output.csv_path);
    let mut summary = RunSummary::default();
    let mut first_fetch = true;

    tracing::info!(
        "Starting harvest of {} ({} categories)",
        config.site.base_url,
        config.category.len()
    );

    'categories: for category in &config.category {
        if cancel.load(Ordering::Relaxed) {
            summary.interrupted = true;
            break;
        }
        if limit_reached(&options, &sink) {
            break;
        }

        summary.categories_visited += 1;
        tracing::info!("Category: {} ({})", category.name, category.path);

        let drafts = listing_pass(
            category,
            config,
            &client,
            &limits,
            &rules,
            &base_url,
            &mut frontier,
            &mut first_fetch,
            &mut summary,
            &cancel,
        )
        .await?;
        summary.drafts_created += drafts.len();
        tracing::info!("  {} products discovered in {}", drafts.len(), category.name);

        let detail_budget = config.harvester.max_details_per_category as usize;
        for (index, draft) in drafts.into_iter().enumerate() {
            if limit_reached(&options, &sink) {
                break 'categories;
            }

            let interrupted = cancel.load(Ordering::Relaxed);
            let enrichment = if interrupted || index >= detail_budget {
                // Over-budget and post-interrupt drafts keep listing data only
                None
            } else {
                match fetch(&client, draft.page_url.as_str(), &limits, &cancel).await {
                    FetchOutcome::Content { body, .. } => {
                        summary.pages_fetched += 1;
                        let page_url = Url::parse(&draft.page_url)?;
                        summary.entries_enriched += 1;
                        Some(extract_enrichment(&body, &page_url, &chains))
                    }
                    FetchOutcome::Failure { kind: FailureKind::Interrupted, .. } => None,
                    FetchOutcome::Failure { .. } => {
                        summary.fetch_failures += 1;
                        tracing::warn!("  Skipping detail page {}", draft.page_url);
                        None
                    }
                }
            };

            let page_url = draft.page_url.clone();
            match assemble(draft, enrichment, chrono::Utc::now()) {
                Some(entry) => {
                    if sink.append(entry) {
                        summary.entries_persisted += 1;
                    }
                }
                None => tracing::warn!("  No name found for {}, entry dropped", page_url),
            }

            if (index + 1) % 10 == 0 {
                tracing::info!("  Progress: {} detail pages in {}", index + 1, category.name);
            }
        }
    }

    if cancel.load(Ordering::Relaxed) {
        summary.interrupted = true;
    }

    if summary.interrupted {
        tracing::warn!("Harvest interrupted, saving partial results");
        sink.flush_partial()?;
    } else {
        sink.flush()?;
    }

    log_fill_rates(sink.entries());
    summary.elapsed = started.elapsed();
    tracing::info!(
        "Harvest done: {} entries from {} pages in {:.1}s ({} fetch failures)",
        summary.entries_persisted,
        summary.pages_fetched,
        summary.elapsed.as_secs_f64(),
        summary.fetch_failures
    );

    Ok(summary)
}

fn limit_reached(options: &HarvestOptions, sink: &CsvSink) -> bool {
    options.limit.is_some_and(|limit| sink.len() >= limit)
}

/// Paginates through one category's listing pages, drafting every new
/// product link. Pagination stops at the configured page cap or on the
/// first page contributing no new drafts.
#[allow(clippy::too_many_arguments)]
async fn listing_pass(
    category: &CategoryEntry,
    config: &Config,
    client: &reqwest::Client,
    limits: &FetchLimits,
    rules: &DiscoveryRules,
    base_url: &Url,
    frontier: &mut Frontier,
    first_fetch: &mut bool,
    summary: &mut RunSummary,
    cancel: &AtomicBool,
) -> Result<Vec<Draft>> {
    let mut drafts = Vec::new();

    for page in 1..=config.harvester.max_listing_pages {
        if cancel.load(Ordering::Relaxed) {
            break;
        }

        let page_url = listing_page_url(base_url, &category.path, &config.site.pagination_param, page)?;
        if !frontier.mark_visited(page_url.as_str()) {
            break;
        }

        let body = match fetch(client, page_url.as_str(), limits, cancel).await {
            FetchOutcome::Content { body, .. } => {
                summary.pages_fetched += 1;
                *first_fetch = false;
                body
            }
            FetchOutcome::Failure { kind: FailureKind::Exhausted, .. } if *first_fetch => {
                return Err(LarderError::SeedUnreachable {
                    url: page_url.to_string(),
                });
            }
            FetchOutcome::Failure { kind, .. } => {
                if kind == FailureKind::Exhausted {
                    summary.fetch_failures += 1;
                    tracing::warn!("  Skipping listing page {}", page_url);
                }
                break;
            }
        };

        let candidates = discover_candidates(&body, base_url, rules);
        let listing_text = clean_text(
            &Html::parse_document(&body)
                .root_element()
                .text()
                .collect::<Vec<_>>()
                .join(" "),
        );

        let mut new_on_page = 0;
        for candidate in candidates {
            if !frontier.mark_visited(candidate.url.as_str()) {
                continue;
            }
            drafts.push(draft_from_candidate(candidate, &listing_text, category));
            new_on_page += 1;
        }

        tracing::debug!("  Page {}: {} new product links", page, new_on_page);
        if new_on_page == 0 {
            break;
        }
    }

    Ok(drafts)
}

/// Builds the URL of one listing page; page 1 is the bare category path
fn listing_page_url(
    base_url: &Url,
    category_path: &str,
    pagination_param: &str,
    page: u32,
) -> Result<Url> {
    let mut url = base_url.join(category_path)?;
    if page > 1 {
        url.query_pairs_mut()
            .append_pair(pagination_param, &page.to_string());
    }
    Ok(url)
}

/// Seeds a draft from a discovered link and the listing text around it.
///
/// Identity comes from the link; price, stock, and packaging are sniffed
/// from a window of listing text around the first occurrence of the label.
fn draft_from_candidate(candidate: Candidate, listing_text: &str, category: &CategoryEntry) -> Draft {
    let Candidate { label, url } = candidate;
    let mut draft = Draft::new(
        label,
        url.to_string(),
        url.to_string(),
        category.name.clone(),
    );
    draft.default_packaging = category.default_packaging;
    draft.unit_size = normalize_unit_size(&draft.name, "");

    if let Some(at) = listing_text.find(&draft.name) {
        let window = window_around(listing_text, at, SNIFF_BEFORE, SNIFF_AFTER);
        draft.price = normalize_price(window);
        draft.packaging = classify_packaging(window);
        if crate::extract::detect_out_of_stock(window) {
            draft.availability = Availability::OutOfStock;
        }
    }

    draft
}

/// Logs per-column fill rates over the persisted entries, the run's
/// data-quality report
fn log_fill_rates(entries: &[CatalogEntry]) {
    if entries.is_empty() {
        return;
    }
    let total = entries.len();
    let rate = |count: usize| 100.0 * count as f64 / total as f64;

    let counted = [
        ("price_current", entries.iter().filter(|e| e.price.current.is_some()).count()),
        ("price_original", entries.iter().filter(|e| e.price.original.is_some()).count()),
        ("description", entries.iter().filter(|e| e.description.is_some()).count()),
        ("image_url", entries.iter().filter(|e| e.image_url.is_some()).count()),
        ("unit_size", entries.iter().filter(|e| e.unit_size.is_some()).count()),
        (
            "packaging",
            entries
                .iter()
                .filter(|e| !e.packaging.csv_cell().is_empty())
                .count(),
        ),
        ("tags", entries.iter().filter(|e| !e.tags.is_empty()).count()),
        (
            "any_spec",
            entries
                .iter()
                .filter(|e| e.specs.populated_count() > 0)
                .count(),
        ),
    ];

    tracing::info!("Data quality over {} entries:", total);
    for (column, count) in counted {
        tracing::info!("  {:<16} {:>5.1}%", column, rate(count));
    }
}
