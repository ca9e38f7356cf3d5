//! HTML parser for mod detail and listing pages
//!
//! This module handles parsing HTML content to extract:
//! - Mod names, abbreviation and marketplace slugs from a detail page
//! - The newest mod id from the listing page

use crate::storage::ModRecord;
use crate::url::{classify_target, decode_target, encoded_target, parse_detail_id, MarketplaceLink};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors that abort extraction of a whole document
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Why the newest mod id could not be read from the listing page
#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Failed to locate .modlist-block on page")]
    MissingBlock,

    #[error("Failed to locate mod anchor inside .modlist-block")]
    MissingAnchor,
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Concatenated text of an element
///
/// Whitespace runs inside a text node collapse to one space and the ends of
/// each node are trimmed, so the result never spans lines.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(|node| node.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Selectors for the parts of a detail page we read
struct DetailSelectors {
    title_block: Selector,
    short_name: Selector,
    primary_heading: Selector,
    secondary_heading: Selector,
    link_block: Selector,
    link: Selector,
}

impl DetailSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            title_block: selector("div.class-title")?,
            short_name: selector("span.short-name")?,
            primary_heading: selector("h3")?,
            secondary_heading: selector("h4")?,
            link_block: selector("div.common-link-frame")?,
            link: selector("a[href]")?,
        })
    }
}

/// Extracts a mod record from a detail page
///
/// # Extraction Rules
///
/// Inside `div.class-title`:
/// - `span.short-name` → `abbr`, with `[` and `]` removed
/// - first `h3` → `name`
/// - first `h4` → `subname` when `name` is already set, otherwise `name`
///
/// Inside `div.common-link-frame`, every `a[href]` carrying a `/target/`
/// segment is base64-decoded; the first CurseForge and the first Modrinth
/// mod page found set `curseforge_slug` and `modrinth_slug`. Links that fail
/// to decode are skipped.
///
/// A page without a title block still yields a record, with an empty `name`.
///
/// # Example
///
/// ```
/// use mcmod_harvest::crawler::extract_record;
///
/// let html = r#"<div class="class-title"><h3>钠</h3><h4>Sodium</h4></div>"#;
/// let record = extract_record(html, 2785).unwrap();
/// assert_eq!(record.name, "钠");
/// assert_eq!(record.subname.as_deref(), Some("Sodium"));
/// ```
pub fn extract_record(html: &str, id: u32) -> Result<ModRecord, ExtractError> {
    let selectors = DetailSelectors::new()?;
    let document = Html::parse_document(html);
    let mut record = ModRecord::new(id);

    if let Some(title) = document.select(&selectors.title_block).next() {
        extract_names(title, &selectors, &mut record);
    } else {
        tracing::debug!("No title block on page of mod {}", id);
    }

    if let Some(frame) = document.select(&selectors.link_block).next() {
        extract_slugs(frame, &selectors, &mut record);
    }

    Ok(record)
}

fn extract_names(title: ElementRef<'_>, selectors: &DetailSelectors, record: &mut ModRecord) {
    if let Some(short_name) = title.select(&selectors.short_name).next() {
        let abbr: String = element_text(short_name)
            .chars()
            .filter(|c| !matches!(c, '[' | ']'))
            .collect();
        record.abbr = non_empty(abbr);
    }

    if let Some(primary) = title.select(&selectors.primary_heading).next() {
        record.name = element_text(primary);
    }

    if let Some(secondary) = title.select(&selectors.secondary_heading).next() {
        let secondary = element_text(secondary);
        if record.name.is_empty() {
            record.name = secondary;
        } else {
            record.subname = non_empty(secondary);
        }
    }
}

fn extract_slugs(frame: ElementRef<'_>, selectors: &DetailSelectors, record: &mut ModRecord) {
    for anchor in frame.select(&selectors.link) {
        let Some(encoded) = anchor.value().attr("href").and_then(encoded_target) else {
            continue;
        };

        let target = match decode_target(encoded) {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!("Failed to decode link for mod {}: {}", record.id, e);
                continue;
            }
        };

        match classify_target(&target) {
            Some(MarketplaceLink::CurseForge(slug)) if record.curseforge_slug.is_none() => {
                record.curseforge_slug = Some(slug);
            }
            Some(MarketplaceLink::Modrinth(slug)) if record.modrinth_slug.is_none() => {
                record.modrinth_slug = Some(slug);
            }
            _ => {}
        }
    }
}

/// Reads the newest mod id from the listing page sorted by creation time
///
/// The first `div.modlist-block` is searched for the first anchor linking to
/// a detail page (`/class/<id>.html`).
pub fn extract_latest_id(html: &str) -> Result<u32, ListingError> {
    let block_selector = selector("div.modlist-block")?;
    let anchor_selector = selector("a[href]")?;
    let document = Html::parse_document(html);

    let block = document
        .select(&block_selector)
        .next()
        .ok_or(ListingError::MissingBlock)?;

    block
        .select(&anchor_selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find_map(parse_detail_id)
        .ok_or(ListingError::MissingAnchor)
}
