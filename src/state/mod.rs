//! Run state for the scraper
//!
//! This module provides the range planning that decides which ids a run
//! processes and whether the store is appended to or truncated.

mod range;

pub use range::{RangePlan, RangeRequest, ScrapeRange};
