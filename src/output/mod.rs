//! Output module for run reporting
//!
//! This module records scrape counters and prints the end-of-run summary.

pub mod stats;

pub use stats::{print_statistics, ScrapeStats};
