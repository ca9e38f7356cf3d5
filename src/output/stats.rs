//! Scrape statistics
//!
//! Counters collected while a run streams records into the store, and a
//! plain-text report printed when the run ends.

use chrono::{DateTime, Utc};

/// Outcome counters for one run
#[derive(Debug, Clone)]
pub struct ScrapeStats {
    /// Ids the run set out to process
    pub requested: u32,
    /// Ids whose page was fetched and parsed
    pub succeeded: u32,
    /// Ids written as placeholder rows
    pub failed: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScrapeStats {
    pub fn new(requested: u32) -> Self {
        Self {
            requested,
            succeeded: 0,
            failed: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Rows written so far
    pub fn processed(&self) -> u32 {
        self.succeeded + self.failed
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints run statistics to stdout
pub fn print_statistics(stats: &ScrapeStats) {
    println!("=== Scrape Statistics ===\n");

    println!("Overview:");
    println!("  Requested: {}", stats.requested);
    println!("  Processed: {}", stats.processed());

    let processed = stats.processed().max(1) as f64;
    println!(
        "  Successful: {} ({:.1}%)",
        stats.succeeded,
        stats.succeeded as f64 * 100.0 / processed
    );
    println!(
        "  Failed: {} ({:.1}%)",
        stats.failed,
        stats.failed as f64 * 100.0 / processed
    );
    println!();

    println!("Timing:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_counts_both_outcomes() {
        let mut stats = ScrapeStats::new(5);
        stats.succeeded = 3;
        stats.failed = 2;
        assert_eq!(stats.processed(), 5);
    }

    #[test]
    fn test_duration_only_after_finish() {
        let mut stats = ScrapeStats::new(0);
        assert_eq!(stats.duration_seconds(), None);
        stats.finish();
        assert!(stats.duration_seconds().unwrap() >= 0);
    }
}
