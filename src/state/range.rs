//! Scrape range planning
//!
//! Turns a caller's request (explicit bounds or auto-resume) into the
//! concrete id range a run will process.

use crate::HarvestError;
use std::ops::RangeInclusive;

/// How the caller asked for ids to be chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// Fixed inclusive bounds, 1-indexed
    Explicit { start: u32, end: u32, append: bool },

    /// Continue from the store's last id up to the newest id online
    Auto,
}

/// A validated, non-empty inclusive id range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeRange {
    pub start: u32,
    pub end: u32,
    /// Keep existing rows instead of truncating the store
    pub append: bool,
}

impl ScrapeRange {
    /// Number of ids in the range
    pub fn count(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn ids(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// What a run is going to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePlan {
    /// Process the given ids
    Scrape(ScrapeRange),

    /// The store already covers everything online
    UpToDate { last_id: u32, latest_id: u32 },
}

impl RangePlan {
    /// Validates explicit bounds
    ///
    /// A range starting after id 1 continues an earlier manual run, so it
    /// appends even without `append`.
    pub fn explicit(start: u32, end: u32, append: bool) -> Result<Self, HarvestError> {
        if start < 1 {
            return Err(HarvestError::InvalidStart { start });
        }
        if start > end {
            return Err(HarvestError::InvalidRange { start, end });
        }

        Ok(Self::Scrape(ScrapeRange {
            start,
            end,
            append: append || start > 1,
        }))
    }

    /// Plans an auto-range run from the local and remote positions
    ///
    /// The span is clamped to `cap` ids by lowering `end`; `start` always
    /// follows the last recorded id.
    pub fn auto(last_id: u32, latest_id: u32, cap: u32) -> Self {
        let start = last_id.saturating_add(1);
        if start > latest_id {
            return Self::UpToDate { last_id, latest_id };
        }

        let cap = cap.max(1);
        let mut end = latest_id;
        if end - start + 1 > cap {
            end = start + (cap - 1);
            tracing::info!(
                "Auto-range limited: {}-{} -> {}-{}",
                start,
                latest_id,
                start,
                end
            );
        }

        Self::Scrape(ScrapeRange {
            start,
            end,
            append: true,
        })
    }
}
