//! Scrape coordinator - main orchestration logic
//!
//! This module contains the scrape loop that ties the other pieces together:
//! - Resolving the id range (explicit bounds or auto-resume to the frontier)
//! - Fetching and extracting one detail page per id
//! - Writing a real or placeholder row for every id, in order
//! - Throttling between requests

use crate::config::{validate, Config};
use crate::crawler::parser::{extract_latest_id, extract_record};
use crate::crawler::{FetchResult, Fetcher};
use crate::output::ScrapeStats;
use crate::state::{RangePlan, RangeRequest};
use crate::storage::{failure_name, CsvStore, ModRecord, RecordStore};
use crate::url::SiteUrls;
use crate::HarvestError;
use std::time::Duration;

/// Main scrape coordinator
///
/// Owns the single fetcher session and the store for the whole run; ids are
/// processed strictly one after another.
pub struct Coordinator<S> {
    config: Config,
    fetcher: Fetcher,
    urls: SiteUrls,
    store: S,
}

impl<S: RecordStore> Coordinator<S> {
    /// Creates a coordinator writing into `store`
    ///
    /// The configuration is validated here as well, since it may have been
    /// built in code rather than loaded from a file.
    pub fn new(config: Config, store: S) -> Result<Self, HarvestError> {
        validate(&config)?;
        let fetcher = Fetcher::new(&config.fetcher)?;
        let urls = SiteUrls::new(&config.site.base_url)?;

        Ok(Self {
            config,
            fetcher,
            urls,
            store,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Looks up the newest mod id on the listing page
    ///
    /// Any failure along the way (page unavailable, block or anchor missing)
    /// is reported as `HarvestError::FrontierUnknown`.
    pub async fn fetch_latest_remote_id(&self) -> Result<u32, HarvestError> {
        let url = self.urls.latest_listing_url();
        let body = match self.fetcher.fetch(&url, "latest mod id").await {
            FetchResult::Success { body } => body,
            FetchResult::Failed { attempts, error } => {
                return Err(HarvestError::FrontierUnknown(format!(
                    "listing page unavailable after {} attempts: {}",
                    attempts, error
                )));
            }
        };

        let latest = extract_latest_id(&body)
            .map_err(|e| HarvestError::FrontierUnknown(e.to_string()))?;
        tracing::info!("Latest mod id online: {}", latest);
        Ok(latest)
    }

    /// Resolves a request into a concrete plan
    ///
    /// Explicit ranges are validated without touching the network. Auto
    /// requests read the store's last id and the remote frontier.
    pub async fn plan(&self, request: RangeRequest) -> Result<RangePlan, HarvestError> {
        match request {
            RangeRequest::Explicit { start, end, append } => RangePlan::explicit(start, end, append),
            RangeRequest::Auto => {
                let last_id = self.store.last_recorded_id()?;
                let latest_id = self.fetch_latest_remote_id().await?;
                Ok(RangePlan::auto(
                    last_id,
                    latest_id,
                    self.config.scraper.auto_range_cap,
                ))
            }
        }
    }

    /// Runs the scrape loop for a plan
    ///
    /// For every id one row is appended before moving on: the extracted
    /// record, or a `Mod{id}(failed)` placeholder when the page could not be
    /// fetched or parsed. Only store errors abort the loop.
    pub async fn run(&mut self, plan: RangePlan) -> Result<ScrapeStats, HarvestError> {
        let range = match plan {
            RangePlan::Scrape(range) => range,
            RangePlan::UpToDate { last_id, latest_id } => {
                tracing::info!(
                    "No new mods to fetch. Local last id {}, latest online {}.",
                    last_id,
                    latest_id
                );
                let mut stats = ScrapeStats::new(0);
                stats.finish();
                return Ok(stats);
            }
        };

        tracing::info!(
            "Scraping mod ids {}-{} ({})",
            range.start,
            range.end,
            if range.append { "append" } else { "fresh" }
        );
        self.store.prepare(range.append)?;

        let total = range.count();
        let mut stats = ScrapeStats::new(total);

        for id in range.ids() {
            tracing::info!("Progress: {}/{}", id - range.start + 1, total);

            let record = match self.scrape_one(id).await {
                Some(mut record) => {
                    stats.succeeded += 1;
                    if record.is_unnamed() {
                        tracing::warn!("No name found for mod {}, marking as failed", id);
                        record.name = failure_name(id);
                    }
                    record
                }
                None => {
                    stats.failed += 1;
                    ModRecord::placeholder(id)
                }
            };

            self.store.append(&record)?;
            tracing::info!("Written to file: {}", record.name);

            if id < range.end {
                let delay = self.politeness_delay();
                tracing::debug!("Waiting {:.2} seconds...", delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }
        }

        stats.finish();
        tracing::info!(
            "Scraping completed! Processed {} items, {} successful, {} failed",
            stats.processed(),
            stats.succeeded,
            stats.failed
        );
        Ok(stats)
    }

    /// Fetches and extracts a single id; `None` means "no data available"
    async fn scrape_one(&self, id: u32) -> Option<ModRecord> {
        tracing::info!("Scraping mod ID: {}", id);

        let url = self.urls.detail_url(id);
        let context = format!("mod {}", id);
        let body = match self.fetcher.fetch(&url, &context).await {
            FetchResult::Success { body } => body,
            FetchResult::Failed { attempts, .. } => {
                tracing::warn!("Failed to request mod {} after {} attempts", id, attempts);
                return None;
            }
        };

        match extract_record(&body, id) {
            Ok(record) => {
                tracing::info!("Successfully retrieved mod {} info: {}", id, record.name);
                Some(record)
            }
            Err(e) => {
                tracing::warn!("Failed to parse mod {} data: {}", id, e);
                None
            }
        }
    }

    /// Uniformly random pause between two ids
    fn politeness_delay(&self) -> Duration {
        let scraper = &self.config.scraper;
        let max = scraper.delay_max_ms.max(scraper.delay_min_ms);
        Duration::from_millis(fastrand::u64(scraper.delay_min_ms..=max))
    }
}

/// Runs a complete scrape against the configured CSV store
///
/// # Arguments
///
/// * `config` - The scraper configuration; `output.csv-path` names the store
/// * `request` - Explicit bounds or auto-range
///
/// # Returns
///
/// * `Ok(ScrapeStats)` - The run finished (a no-op auto-range run included)
/// * `Err(HarvestError)` - Invalid range, unknown frontier, or store failure
///
/// # Example
///
/// ```no_run
/// use mcmod_harvest::config::Config;
/// use mcmod_harvest::crawler::run_scrape;
/// use mcmod_harvest::RangeRequest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_scrape(Config::default(), RangeRequest::Auto).await?;
/// println!("{} new rows", stats.processed());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, request: RangeRequest) -> Result<ScrapeStats, HarvestError> {
    let store = CsvStore::new(&config.output.csv_path);
    let mut coordinator = Coordinator::new(config, store)?;
    let plan = coordinator.plan(request).await?;
    coordinator.run(plan).await
}
