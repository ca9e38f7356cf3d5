//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building one HTTP client per run with a browser-like identity
//! - GET requests with a fixed timeout
//! - Retry with exponential backoff and jitter on transient failures
//! - Collapsing exhausted retries into a definite failure value

use crate::config::FetcherConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Timeout applied to every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGES: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Page body, decoded as UTF-8
        body: String,
    },

    /// Every attempt failed
    Failed {
        /// Number of attempts made
        attempts: u32,
        /// Description of the last failure
        error: String,
    },
}

/// Why a single attempt failed
#[derive(Debug, Error)]
enum AttemptError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// Retry schedule for failed requests
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each later one
    pub backoff_base: Duration,
    /// Upper bound of the uniform random delay added to each backoff
    pub jitter: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            jitter: Duration::from_millis(config.jitter_ms),
        }
    }

    /// Delay after the failed attempt `attempt` (counted from 0)
    ///
    /// `backoff_base * 2^attempt + uniform(0, jitter)`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let jitter_ms = self.jitter.as_millis().min(u64::MAX as u128) as u64;
        self.backoff_base.saturating_mul(factor) + Duration::from_millis(fastrand::u64(0..=jitter_ms))
    }
}

/// Builds the HTTP client shared by every request of a run
///
/// The request identity is fixed: a desktop browser user agent with matching
/// Accept headers. Cookies persist for the life of the client.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGES));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited fetcher: one client session plus its retry policy
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?, RetryPolicy::from_config(config)))
    }

    pub fn with_client(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Fetches a URL, retrying transport errors and non-2xx statuses
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `context` - Label used in log lines (e.g. `mod 42`)
    ///
    /// # Returns
    ///
    /// `FetchResult::Success` with the body, or `FetchResult::Failed` once
    /// every attempt has failed. This never returns an error.
    pub async fn fetch(&self, url: &str, context: &str) -> FetchResult {
        let max_attempts = self.policy.max_attempts;
        let mut last_error = String::new();

        for attempt in 0..max_attempts {
            match self.try_fetch(url).await {
                Ok(success) => return success,
                Err(e) => {
                    let attempt_number = attempt + 1;
                    tracing::warn!(
                        "Request for {} failed (attempt {}/{}): {}",
                        context,
                        attempt_number,
                        max_attempts,
                        e
                    );
                    last_error = e.to_string();

                    if attempt_number < max_attempts {
                        let delay = self.policy.backoff_delay(attempt);
                        tracing::debug!("Backing off {:?} before retrying {}", delay, context);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        FetchResult::Failed {
            attempts: max_attempts,
            error: last_error,
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<FetchResult, AttemptError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        if response.url().as_str() != url {
            tracing::debug!("{} redirected to {}", url, response.url());
        }
        let bytes = response.bytes().await?;

        Ok(FetchResult::Success {
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
