//! CSV record store
//!
//! The file starts with a UTF-8 byte-order mark so spreadsheet tools detect
//! the encoding, followed by the header row. Every append opens the file,
//! writes one row, flushes and closes it again, so an interrupted run leaves
//! every processed id on disk.

use crate::storage::reverse::{ReverseLines, DEFAULT_CHUNK_SIZE};
use crate::storage::{ModRecord, RecordStore};
use crate::{StoreError, StoreResult};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Column names, in row order
pub const CSV_HEADER: [&str; 6] = [
    "mcmod_id",
    "curseforge_slug",
    "modrinth_slug",
    "name",
    "subname",
    "abbr",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Append-only CSV file store
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    chunk_size: usize,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Overrides the chunk size used by the backward scan
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Truncates the file and writes the BOM and header row
    fn write_header(&self) -> StoreResult<()> {
        let mut file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        file.write_all(UTF8_BOM).map_err(|e| self.io_error(e))?;

        let mut writer = csv_writer(file);
        writer.write_record(CSV_HEADER)?;
        writer.flush().map_err(|e| self.io_error(e))?;

        tracing::info!("CSV file initialized: {}", self.path.display());
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn prepare(&mut self, append: bool) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        if append && self.path.exists() {
            tracing::debug!("Appending to existing store {}", self.path.display());
            return Ok(());
        }

        self.write_header()
    }

    fn append(&mut self, record: &ModRecord) -> StoreResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let mut writer = csv_writer(file);
        writer.serialize(single_line(record))?;
        writer.flush().map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn last_recorded_id(&self) -> StoreResult<u32> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(self.io_error(e)),
        };

        let lines = ReverseLines::new(file, self.chunk_size).map_err(|e| self.io_error(e))?;
        for line in lines {
            let line = line.map_err(|e| self.io_error(e))?;
            if let Some(id) = parse_row_id(&line) {
                tracing::info!("Last recorded mod id in CSV: {}", id);
                return Ok(id);
            }
        }

        tracing::info!("No valid id found in CSV, defaulting to 0");
        Ok(0)
    }
}

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(inner)
}

/// Copy of `record` with line breaks in text fields replaced by spaces
///
/// Every row must occupy exactly one physical line for the backward scan.
fn single_line(record: &ModRecord) -> ModRecord {
    let optional = |text: &Option<String>| text.as_deref().map(flatten_line_breaks);

    ModRecord {
        id: record.id,
        curseforge_slug: optional(&record.curseforge_slug),
        modrinth_slug: optional(&record.modrinth_slug),
        name: flatten_line_breaks(&record.name),
        subname: optional(&record.subname),
        abbr: optional(&record.abbr),
    }
}

fn flatten_line_breaks(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses the primary key out of one raw line
///
/// Returns `None` for the header, undecodable bytes, and rows whose first
/// cell is not a number.
fn parse_row_id(line: &[u8]) -> Option<u32> {
    let line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
    let text = std::str::from_utf8(line).ok()?.trim();
    if text.is_empty() || text.to_ascii_lowercase().starts_with(CSV_HEADER[0]) {
        return None;
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let record = reader.records().next()?.ok()?;
    record.get(0)?.trim().parse().ok()
}
