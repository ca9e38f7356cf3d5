//! mcmod-harvest: an incremental, resumable mod metadata scraper
//!
//! This crate pulls mod records (ids, names, marketplace slugs) from mcmod.cn
//! detail pages one id at a time and streams them into an append-only CSV
//! store, plus a small utility that converts the Simplified Chinese locale
//! dictionary into its Traditional Chinese counterpart.

pub mod config;
pub mod crawler;
pub mod locale;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for harvest operations
///
/// Only orchestration-level failures end up here. Per-id fetch and
/// extraction problems are soft failures and become placeholder rows.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Start ID must be greater than 0, got {start}")]
    InvalidStart { start: u32 },

    #[error("Start ID must be less than or equal to End ID, got {start}-{end}")]
    InvalidRange { start: u32, end: u32 },

    #[error("Unable to determine latest mod id online: {0}")]
    FrontierUnknown(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by the CSV record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised by the locale transform
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("The input file '{0}' does not exist")]
    MissingSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for locale operations
pub type LocaleResult<T> = std::result::Result<T, LocaleError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{RangePlan, RangeRequest};
pub use storage::{CsvStore, ModRecord};
