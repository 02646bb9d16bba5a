//! Harvest stage: polite fetching, link discovery, and run orchestration
//!
//! [`fetcher`] retrieves single pages with politeness delays and retry,
//! [`frontier`] turns listing pages into deduplicated product candidates,
//! and [`driver`] runs the two-pass harvest over the configured categories.

pub mod driver;
pub mod fetcher;
pub mod frontier;

pub use driver::{run_harvest, HarvestOptions, RunSummary};
pub use fetcher::{build_http_client, fetch, FailureKind, FetchLimits, FetchOutcome};
pub use frontier::{discover_candidates, Candidate, DiscoveryRules, Frontier};
