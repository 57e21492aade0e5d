//! Unconditional create-or-update of records.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use diarysync_protocol::Record;
use diarysync_storage::RecordStore;
use std::sync::Arc;
use tracing::info;

/// Writes records with full-replace semantics.
///
/// Used when a client commits edits, as opposed to the presence-only
/// [`crate::Reconciler`].
pub struct BulkSaver {
    store: Arc<dyn RecordStore>,
    config: ServerConfig,
}

impl BulkSaver {
    /// Creates a saver over a store.
    pub fn new(store: Arc<dyn RecordStore>, config: ServerConfig) -> Self {
        Self { store, config }
    }

    /// Saves every record, replacing stored records with the same key.
    ///
    /// A record without `app_id` goes to the configured default partition.
    /// Returns the number of records processed.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if any record has no id; nothing is written
    /// - `Storage` on the first failing write; records before it stay
    ///   written and the rest are skipped
    pub fn save_entries(&self, records: &[Record]) -> ServerResult<usize> {
        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let app_id = self.config.resolve_app_id(record.app_id.as_deref());
                record.to_row(app_id).ok_or_else(|| {
                    ServerError::invalid_request(format!("record at index {index} has no id"))
                })
            })
            .collect::<ServerResult<Vec<_>>>()?;

        for row in rows {
            self.store.upsert_replace(row)?;
        }

        info!(count = records.len(), "records saved");
        Ok(records.len())
    }
}
