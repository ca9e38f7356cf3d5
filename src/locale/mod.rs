//! Locale transform utility
//!
//! Generates the Traditional Chinese locale dictionary from the Simplified
//! Chinese one. Hand-edited URLs in the existing Traditional dictionary are
//! kept; everything else is regenerated.

mod transform;
mod transliterator;

pub use transform::{is_preserved, transform_tree, PRESERVED_PREFIXES};
pub use transliterator::{TaiwanTraditional, Transliterator};

use crate::{LocaleError, LocaleResult};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Converts the dictionary at `source_path` and writes it to `target_path`
///
/// An existing file at `target_path` is read first and used as the existing
/// tree. The output is 2-space indented JSON with non-ASCII characters left
/// unescaped.
pub fn convert_locale_file(
    source_path: &Path,
    target_path: &Path,
    transliterator: &dyn Transliterator,
) -> LocaleResult<()> {
    if !source_path.exists() {
        return Err(LocaleError::MissingSource(source_path.display().to_string()));
    }

    let existing: Option<Value> = if target_path.exists() {
        tracing::debug!("Reading existing tree from {}", target_path.display());
        Some(serde_json::from_str(&fs::read_to_string(target_path)?)?)
    } else {
        None
    };

    let source: Value = serde_json::from_str(&fs::read_to_string(source_path)?)?;
    let converted = transform_tree(&source, existing.as_ref(), transliterator);

    fs::write(target_path, serde_json::to_string_pretty(&converted)?)?;
    tracing::info!(
        "Converted {} -> {}",
        source_path.display(),
        target_path.display()
    );
    Ok(())
}
