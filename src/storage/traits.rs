//! Storage trait
//!
//! The scrape loop only needs three operations from its store, so it is
//! written against this trait rather than the CSV file directly.

use crate::storage::ModRecord;
use crate::StoreResult;

/// Append-only record store
pub trait RecordStore {
    /// Makes the store ready for a run
    ///
    /// With `append` set, an existing store is left untouched. Otherwise (or
    /// when nothing exists yet) the store is truncated and the header written.
    fn prepare(&mut self, append: bool) -> StoreResult<()>;

    /// Persists one record; the row is durable when this returns
    fn append(&mut self, record: &ModRecord) -> StoreResult<()>;

    /// Primary key of the last written row, or 0 when there is none
    fn last_recorded_id(&self) -> StoreResult<u32>;
}
