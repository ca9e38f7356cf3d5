//! Marketplace link decoding
//!
//! The listing site hides outbound links behind hrefs of the form
//! `.../target/<base64 of the real URL>`. These helpers recover the real
//! URL and recognise CurseForge and Modrinth mod pages.

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use thiserror::Error;

const TARGET_MARKER: &str = "/target/";
const CURSEFORGE_HOST: &str = "curseforge.com";
const CURSEFORGE_SLUG_MARKER: &str = "/minecraft/mc-mods/";
const MODRINTH_HOST: &str = "modrinth.com";
const MODRINTH_SLUG_MARKER: &str = "/mod/";

/// Standard alphabet with padding, tolerating non-zero trailing bits
const TARGET_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Why a single encoded link could not be decoded
#[derive(Debug, Error)]
pub enum LinkDecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded target is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A recognised marketplace project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceLink {
    CurseForge(String),
    Modrinth(String),
}

/// Returns the encoded part of an href, if it carries a `/target/` segment
pub fn encoded_target(href: &str) -> Option<&str> {
    href.rfind(TARGET_MARKER)
        .map(|index| &href[index + TARGET_MARKER.len()..])
}

/// Decodes a base64 target segment into the URL it wraps
///
/// Characters outside the base64 alphabet (whitespace, stray punctuation)
/// are dropped before decoding. Padding is still required.
pub fn decode_target(encoded: &str) -> Result<String, LinkDecodeError> {
    let cleaned: String = encoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    let bytes = TARGET_ENGINE.decode(cleaned)?;
    Ok(String::from_utf8(bytes)?)
}

/// Classifies a decoded target URL
///
/// CurseForge is checked first; a CurseForge URL without a mod slug is not
/// reconsidered as a Modrinth link.
pub fn classify_target(target: &str) -> Option<MarketplaceLink> {
    if target.contains(CURSEFORGE_HOST) {
        slug_after(target, CURSEFORGE_SLUG_MARKER).map(MarketplaceLink::CurseForge)
    } else if target.contains(MODRINTH_HOST) {
        slug_after(target, MODRINTH_SLUG_MARKER).map(MarketplaceLink::Modrinth)
    } else {
        None
    }
}

/// First non-empty run of characters after `marker`, ending at `/` or `?`
fn slug_after(target: &str, marker: &str) -> Option<String> {
    target.match_indices(marker).find_map(|(index, _)| {
        let slug: String = target[index + marker.len()..]
            .chars()
            .take_while(|c| *c != '/' && *c != '?')
            .collect();
        (!slug.is_empty()).then_some(slug)
    })
}
