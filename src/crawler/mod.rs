//! Crawler module for mod page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with retry and backoff
//! - HTML extraction of mod records and the newest listed id
//! - Overall scrape coordination and resume planning

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_scrape, Coordinator};
pub use fetcher::{build_http_client, FetchResult, Fetcher, RetryPolicy, REQUEST_TIMEOUT};
pub use parser::{extract_latest_id, extract_record, ExtractError, ListingError};
