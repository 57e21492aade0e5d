//! Test fixtures and store helpers.

use diarysync_protocol::Record;
use diarysync_storage::{FileStore, FileStoreConfig, RecordStore, StoredRow};
use std::sync::Arc;
use tempfile::TempDir;

/// A file store in a temporary directory, removed on drop.
pub struct TempFileStore {
    /// The store instance.
    pub store: Arc<FileStore>,
    /// The temporary directory (kept alive to prevent cleanup).
    dir: TempDir,
}

impl TempFileStore {
    /// Creates an empty store. Writes are not fsynced.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let store = open(&dir);
        Self { store, dir }
    }

    /// Closes and reopens the store, replaying its log.
    ///
    /// Every other handle from [`TempFileStore::shared`] must be dropped
    /// first, or the directory lock is still held.
    #[must_use]
    pub fn reopen(self) -> Self {
        let Self { store, dir } = self;
        drop(store);
        let store = open(&dir);
        Self { store, dir }
    }

    /// Returns the store as a trait object.
    pub fn shared(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store) as Arc<dyn RecordStore>
    }
}

impl Default for TempFileStore {
    fn default() -> Self {
        Self::new()
    }
}

fn open(dir: &TempDir) -> Arc<FileStore> {
    let config = FileStoreConfig::new().sync_on_write(false);
    Arc::new(
        FileStore::open_with_config(&dir.path().join("store"), config)
            .expect("Failed to open file store"),
    )
}

/// A journal record with every field set.
pub fn sample_record(id: &str, timestamp: i64) -> Record {
    Record::new(id)
        .with_content(format!("entry {id}"))
        .with_category("journal")
        .with_tags(["morning", "coffee"])
        .with_date("2024/1/1")
        .with_date_iso("2024-01-01")
        .with_timestamp(timestamp)
}

/// A stored row for `id` in `app_id` with the given content.
pub fn stored_row(app_id: &str, id: &str, content: &str) -> StoredRow {
    StoredRow::new(app_id, id).with_content(content)
}

/// Ids of the rows in a partition, in listing order.
pub fn partition_ids(store: &dyn RecordStore, app_id: &str) -> Vec<String> {
    store
        .list_by_partition(app_id)
        .expect("Failed to list partition")
        .into_iter()
        .map(|row| row.id)
        .collect()
}
