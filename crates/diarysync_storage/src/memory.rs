//! In-memory record store for testing.

use crate::error::StorageResult;
use crate::row::StoredRow;
use crate::store::RecordStore;
use crate::table::PartitionTable;
use parking_lot::RwLock;

/// An in-memory record store.
///
/// This store keeps all rows in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Embedding where persistence is handled elsewhere
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads. Conditional
/// inserts hold the write lock across the existence check and the write.
///
/// # Example
///
/// ```rust
/// use diarysync_storage::{InMemoryStore, RecordStore, StoredRow};
///
/// let store = InMemoryStore::new();
/// store.upsert_replace(StoredRow::new("daily", "1").with_content("v1")).unwrap();
/// store.upsert_replace(StoredRow::new("daily", "1").with_content("v2")).unwrap();
/// let row = store.get("daily", "1").unwrap().unwrap();
/// assert_eq!(row.content.as_deref(), Some("v2"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    table: RwLock<PartitionTable>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with rows.
    ///
    /// Later rows replace earlier rows with the same key.
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = StoredRow>) -> Self {
        let mut table = PartitionTable::new();
        for row in rows {
            table.put(row);
        }
        Self {
            table: RwLock::new(table),
        }
    }
}

impl RecordStore for InMemoryStore {
    fn list_by_partition(&self, app_id: &str) -> StorageResult<Vec<StoredRow>> {
        Ok(self.table.read().list(app_id))
    }

    fn upsert_replace(&self, row: StoredRow) -> StorageResult<()> {
        self.table.write().put(row);
        Ok(())
    }

    fn upsert_if_absent(&self, row: StoredRow) -> StorageResult<bool> {
        let mut table = self.table.write();
        if table.contains(&row.app_id, &row.id) {
            return Ok(false);
        }
        table.put(row);
        Ok(true)
    }

    fn get(&self, app_id: &str, id: &str) -> StorageResult<Option<StoredRow>> {
        Ok(self.table.read().get(app_id, id).cloned())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.table.read().len())
    }
}
