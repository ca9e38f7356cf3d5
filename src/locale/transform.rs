//! JSON locale tree transform
//!
//! Walks the source tree and the previously generated target tree side by
//! side. Objects keep their key order and arrays their indices; only string
//! leaves change.

use crate::locale::Transliterator;
use serde_json::Value;

/// Prefixes of strings that are never transliterated (URLs and deep links)
pub const PRESERVED_PREFIXES: [&str; 6] = ["http://", "https://", "ftp://", "//", "sjmcl://", "mailto:"];

/// True when `text` is a URL or deep link
pub fn is_preserved(text: &str) -> bool {
    PRESERVED_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
}

/// Builds the target tree for `source`
///
/// String leaves are transliterated, except preserved strings: those take
/// the value at the same path in `existing` when that value is itself a
/// preserved string, and otherwise stay as in the source.
pub fn transform_tree(source: &Value, existing: Option<&Value>, transliterator: &dyn Transliterator) -> Value {
    match source {
        Value::Object(entries) => {
            let existing_entries = existing.and_then(Value::as_object);
            Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| {
                        let previous = existing_entries.and_then(|map| map.get(key));
                        (key.clone(), transform_tree(value, previous, transliterator))
                    })
                    .collect(),
            )
        }
        Value::Array(items) => {
            let existing_items = existing.and_then(Value::as_array);
            Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let previous = existing_items.and_then(|list| list.get(index));
                        transform_tree(item, previous, transliterator)
                    })
                    .collect(),
            )
        }
        Value::String(text) if is_preserved(text) => match existing {
            Some(Value::String(previous)) if is_preserved(previous) => Value::String(previous.clone()),
            _ => source.clone(),
        },
        Value::String(text) => Value::String(transliterator.convert(text)),
        other => other.clone(),
    }
}
