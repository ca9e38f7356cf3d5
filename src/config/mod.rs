//! Configuration module for mcmod-harvest
//!
//! Settings come from an optional TOML file with kebab-case keys. Every key
//! has a default, and the defaults describe the production site, so running
//! without a file is the normal case.
//!
//! # Example
//!
//! ```no_run
//! use mcmod_harvest::config::load_config_with_hash;
//! use std::path::Path;
//!
//! let (config, hash) = load_config_with_hash(Path::new("harvest.toml")).unwrap();
//! println!("Auto-range cap: {} (config {})", config.scraper.auto_range_cap, hash);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::{config_digest, load_config_with_hash, parse_config};
pub use types::{Config, FetcherConfig, LocaleConfig, OutputConfig, ScraperConfig, SiteConfig};
pub use validation::validate;
