//! URL handling module
//!
//! This module provides:
//! - Construction of detail and listing page URLs for the remote site
//! - Parsing of mod ids out of detail page hrefs
//! - Decoding and classification of encoded marketplace links

mod marketplace;

pub use marketplace::{classify_target, decode_target, encoded_target, LinkDecodeError, MarketplaceLink};

use url::Url;

/// Path marker of a mod detail page (`/class/<id>.html`)
const DETAIL_PATH_PREFIX: &str = "/class/";
const DETAIL_PATH_SUFFIX: &str = ".html";

/// URL builder for the remote listing site
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: String,
}

impl SiteUrls {
    /// Creates a builder from a base URL such as `https://www.mcmod.cn`
    ///
    /// Trailing slashes are dropped so paths can be appended verbatim.
    pub fn new(base_url: &str) -> Result<Self, ::url::ParseError> {
        Url::parse(base_url)?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Detail page of a single mod
    pub fn detail_url(&self, id: u32) -> String {
        format!("{}{}{}{}", self.base, DETAIL_PATH_PREFIX, id, DETAIL_PATH_SUFFIX)
    }

    /// Listing page sorted by creation time, newest first
    pub fn latest_listing_url(&self) -> String {
        format!("{}/modlist.html?sort=createtime", self.base)
    }
}

/// Extracts the numeric id from an href containing `/class/<digits>.html`
///
/// Works on relative and absolute hrefs alike. The first well-formed
/// occurrence wins.
///
/// # Example
///
/// ```
/// use mcmod_harvest::url::parse_detail_id;
///
/// assert_eq!(parse_detail_id("/class/1234.html"), Some(1234));
/// assert_eq!(parse_detail_id("https://www.mcmod.cn/class/7.html"), Some(7));
/// assert_eq!(parse_detail_id("/modpack/7.html"), None);
/// ```
pub fn parse_detail_id(href: &str) -> Option<u32> {
    href.match_indices(DETAIL_PATH_PREFIX).find_map(|(index, marker)| {
        let rest = &href[index + marker.len()..];
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 || !rest[digits_len..].starts_with(DETAIL_PATH_SUFFIX) {
            return None;
        }
        rest[..digits_len].parse().ok()
    })
}
