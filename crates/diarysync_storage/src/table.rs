//! Partition index shared by the store implementations.

use crate::row::StoredRow;
use std::collections::HashMap;

/// Rows grouped by partition, keyed by id.
#[derive(Debug, Default)]
pub(crate) struct PartitionTable {
    partitions: HashMap<String, HashMap<String, StoredRow>>,
    rows: usize,
}

impl PartitionTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, app_id: &str, id: &str) -> bool {
        self.partitions
            .get(app_id)
            .is_some_and(|partition| partition.contains_key(id))
    }

    pub(crate) fn get(&self, app_id: &str, id: &str) -> Option<&StoredRow> {
        self.partitions.get(app_id).and_then(|p| p.get(id))
    }

    /// Inserts or replaces the row for its key.
    pub(crate) fn put(&mut self, row: StoredRow) {
        let partition = self.partitions.entry(row.app_id.clone()).or_default();
        if partition.insert(row.id.clone(), row).is_none() {
            self.rows += 1;
        }
    }

    /// Rows of one partition in listing order.
    pub(crate) fn list(&self, app_id: &str) -> Vec<StoredRow> {
        let mut rows: Vec<StoredRow> = self
            .partitions
            .get(app_id)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default();
        rows.sort_by(StoredRow::newest_first);
        rows
    }

    /// Every row, in no particular order.
    pub(crate) fn rows(&self) -> impl Iterator<Item = &StoredRow> {
        self.partitions.values().flat_map(HashMap::values)
    }

    pub(crate) fn len(&self) -> usize {
        self.rows
    }
}
