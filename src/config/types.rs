use serde::Deserialize;

/// Main configuration structure for mcmod-harvest
///
/// Every section and key has a default, so an empty file (or no file at all)
/// yields the production settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetcher: FetcherConfig,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub locale: LocaleConfig,
}

/// Remote site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the listing site, without a trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.mcmod.cn".to_string(),
        }
    }
}

/// Retry and backoff policy for the fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Total number of attempts per request
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base backoff delay (milliseconds), doubled after every attempt
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Upper bound of the random jitter added to each backoff (milliseconds)
    #[serde(rename = "jitter-ms")]
    pub jitter_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 1000,
            jitter_ms: 500,
        }
    }
}

/// Scrape loop behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Lower bound of the politeness delay between ids (milliseconds)
    #[serde(rename = "delay-min-ms")]
    pub delay_min_ms: u64,

    /// Upper bound of the politeness delay between ids (milliseconds)
    #[serde(rename = "delay-max-ms")]
    pub delay_max_ms: u64,

    /// Maximum number of ids processed by a single auto-range run
    #[serde(rename = "auto-range-cap")]
    pub auto_range_cap: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            delay_min_ms: 1000,
            delay_max_ms: 3000,
            auto_range_cap: 300,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV record store
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "assets/db/mod_data.csv".to_string(),
        }
    }
}

/// Locale transform paths
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Simplified Chinese source dictionary
    #[serde(rename = "source-path")]
    pub source_path: String,

    /// Traditional Chinese dictionary, read as the existing tree and overwritten
    #[serde(rename = "target-path")]
    pub target_path: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            source_path: "src/locales/zh-Hans.json".to_string(),
            target_path: "src/locales/zh-Hant.json".to_string(),
        }
    }
}
