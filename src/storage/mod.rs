//! Storage module for persisting scraped records
//!
//! This module handles:
//! - The `ModRecord` row type
//! - The append-only CSV store and its header
//! - Recovering the last written id by scanning the file backward

mod csv_store;
mod reverse;
mod traits;

pub use csv_store::{CsvStore, CSV_HEADER};
pub use reverse::{ReverseLines, DEFAULT_CHUNK_SIZE};
pub use traits::RecordStore;

use serde::Serialize;

/// One row of the store
///
/// Field order matches the CSV header. `None` fields are written as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModRecord {
    #[serde(rename = "mcmod_id")]
    pub id: u32,
    pub curseforge_slug: Option<String>,
    pub modrinth_slug: Option<String>,
    pub name: String,
    pub subname: Option<String>,
    pub abbr: Option<String>,
}

impl ModRecord {
    /// An empty record for the given id
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Row written for an id whose page could not be fetched or parsed
    pub fn placeholder(id: u32) -> Self {
        Self {
            id,
            name: failure_name(id),
            ..Self::default()
        }
    }

    /// True when extraction found no name at all
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }
}

/// Name marking a row as unsuccessful, e.g. `Mod42(failed)`
pub fn failure_name(id: u32) -> String {
    format!("Mod{}(failed)", id)
}
