//! Rate-limited HTTP fetcher
//!
//! One logical operation: retrieve a URL politely. Every attempt is
//! preceded by a randomized politeness delay; failed attempts are retried
//! after a longer randomized backoff window. All transport errors and
//! non-2xx statuses are classified transient and retried identically, so
//! callers cannot assume a 4xx is terminal. Exhausting the attempt budget
//! is non-fatal: the caller skips the URL and moves on.

use crate::config::{DelayRange, HarvesterConfig, UserAgentConfig};
use rand::Rng;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Why a fetch produced no content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A single attempt failed (network error, timeout, or non-2xx status);
    /// internal to the retry loop, retried identically regardless of cause
    Transient,

    /// All attempts failed; the URL is skipped, the run continues
    Exhausted,

    /// Cancellation was observed between attempts
    Interrupted,
}

/// Result of one fetch operation; scoped to the call, never persisted
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page body and the URL it was ultimately served from
    Content { body: String, final_url: String },

    /// No content; `attempts` counts the attempts actually made
    Failure { kind: FailureKind, attempts: u32 },
}

impl FetchOutcome {
    /// Returns the body when the fetch produced content
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Content { body, .. } => Some(body),
            FetchOutcome::Failure { .. } => None,
        }
    }
}

/// Attempt budget and delay windows for the fetch loop
#[derive(Debug, Clone)]
pub struct FetchLimits {
    pub max_attempts: u32,
    pub politeness_delay: DelayRange,
    pub retry_backoff: DelayRange,
}

impl FetchLimits {
    /// Builds the limits from the harvester configuration section
    pub fn from_config(config: &HarvesterConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            politeness_delay: config.politeness_delay_ms,
            retry_backoff: config.retry_backoff_ms,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout_secs` - Per-attempt request timeout
///
/// # Example
///
/// ```no_run
/// use larder::config::UserAgentConfig;
/// use larder::harvest::build_http_client;
///
/// let config = UserAgentConfig {
///     harvester_name: "Larder".to_string(),
///     harvester_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "ops@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, 30).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    // Format: HarvesterName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.harvester_name, config.harvester_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sleeps a duration drawn uniformly from the given window
async fn sleep_jittered(range: DelayRange) {
    let millis = rand::thread_rng().gen_range(range.min..=range.max);
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

/// Fetches a URL with politeness delays and retry.
///
/// # Request Flow
///
/// 1. Check the cancellation flag; if set, return `Interrupted` without
///    issuing the attempt
/// 2. Sleep the politeness delay
/// 3. Issue the GET; a 2xx response with a readable body returns `Content`
/// 4. Any other outcome is transient: sleep the backoff window, retry
/// 5. Exhausting `max_attempts` returns `Failure(Exhausted)`
///
/// The function never returns an error; exhaustion is data for the caller,
/// not an exception past the call boundary.
pub async fn fetch(
    client: &Client,
    url: &str,
    limits: &FetchLimits,
    cancel: &AtomicBool,
) -> FetchOutcome {
    for attempt in 1..=limits.max_attempts {
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!("Cancellation observed before attempt {} for {}", attempt, url);
            return FetchOutcome::Failure {
                kind: FailureKind::Interrupted,
                attempts: attempt - 1,
            };
        }

        sleep_jittered(limits.politeness_delay).await;

        match client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                let final_url = response.url().to_string();
                match response.text().await {
                    Ok(body) => {
                        tracing::debug!("Fetched {} (attempt {})", url, attempt);
                        return FetchOutcome::Content { body, final_url };
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Attempt {}/{} failed reading body for {}: {}",
                            attempt,
                            limits.max_attempts,
                            url,
                            e
                        );
                    }
                }
            }
            Ok(response) => {
                tracing::warn!(
                    "Attempt {}/{} got HTTP {} for {}",
                    attempt,
                    limits.max_attempts,
                    response.status(),
                    url
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Attempt {}/{} failed for {}: {}",
                    attempt,
                    limits.max_attempts,
                    url,
                    e
                );
            }
        }

        if attempt < limits.max_attempts {
            sleep_jittered(limits.retry_backoff).await;
        }
    }

    tracing::warn!("All {} attempts failed for {}", limits.max_attempts, url);
    FetchOutcome::Failure {
        kind: FailureKind::Exhausted,
        attempts: limits.max_attempts,
    }
}
