//! Record store trait definition.

use crate::error::StorageResult;
use crate::row::StoredRow;

/// A partitioned keyed table of [`StoredRow`]s.
///
/// # Invariants
///
/// - At most one row exists per `(app_id, id)`
/// - Rows are never removed
/// - `upsert_if_absent` decides existence and writes under one lock, so two
///   concurrent callers with the same key produce exactly one write
/// - Every call reflects the durable state of the store
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait RecordStore: Send + Sync {
    /// Returns every row of a partition, newest timestamp first.
    ///
    /// An unknown partition yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    fn list_by_partition(&self, app_id: &str) -> StorageResult<Vec<StoredRow>>;

    /// Writes a row, fully replacing any previous row with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn upsert_replace(&self, row: StoredRow) -> StorageResult<()>;

    /// Writes a row only if its key is not present.
    ///
    /// Returns `true` if the row was written, `false` if an existing row was
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn upsert_if_absent(&self, row: StoredRow) -> StorageResult<bool>;

    /// Looks up a single row.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    fn get(&self, app_id: &str, id: &str) -> StorageResult<Option<StoredRow>>;

    /// Returns the total number of rows across all partitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    fn len(&self) -> StorageResult<usize>;

    /// Returns true if the store holds no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}
