//! Two-way presence reconciliation of one partition.

use crate::error::{ServerError, ServerResult};
use diarysync_protocol::Record;
use diarysync_storage::{RecordStore, StoredRow};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of reconciling a client's records with a partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    /// Stored records whose id the client did not send, newest first.
    pub to_download: Vec<Record>,
    /// Number of records the client submitted, including ones that were
    /// already stored or repeated.
    pub uploaded_count: usize,
}

/// Computes and applies the differences between a client's record set and
/// a stored partition.
///
/// Records are compared by id only. Client records whose id is unknown to
/// the store are inserted with insert-if-absent, so a stale client copy
/// never replaces a stored record.
pub struct Reconciler {
    store: Arc<dyn RecordStore>,
}

impl Reconciler {
    /// Creates a reconciler over a store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Reconciles `local` with partition `app_id`.
    ///
    /// Every local record is written under `app_id`, whatever partition the
    /// record itself names. The download set is computed from the partition
    /// as it was before any local record was written.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `app_id` is empty or a local record has no id;
    ///   nothing is written in that case
    /// - `Storage` on the first failing store call
    pub fn reconcile(&self, app_id: &str, local: &[Record]) -> ServerResult<ReconcileOutcome> {
        if app_id.is_empty() {
            return Err(ServerError::invalid_request("appId is required for sync"));
        }
        let rows = rows_for_partition(app_id, local)?;

        let cloud = self.store.list_by_partition(app_id)?;
        let to_download: Vec<Record> = {
            let local_ids: HashSet<&str> = rows.iter().map(|row| row.id.as_str()).collect();
            cloud
                .into_iter()
                .filter(|row| !local_ids.contains(row.id.as_str()))
                .map(Record::from_row)
                .collect()
        };

        let mut inserted = 0usize;
        for row in rows {
            let id = row.id.clone();
            if self.store.upsert_if_absent(row)? {
                inserted += 1;
            } else {
                debug!(app_id, id = %id, "record already stored, left untouched");
            }
        }

        info!(
            app_id,
            submitted = local.len(),
            inserted,
            downloaded = to_download.len(),
            "partition reconciled"
        );

        Ok(ReconcileOutcome {
            to_download,
            uploaded_count: local.len(),
        })
    }
}

/// Maps every record to its row in `app_id`, rejecting the batch if any
/// record lacks an id.
fn rows_for_partition(app_id: &str, records: &[Record]) -> ServerResult<Vec<StoredRow>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record.to_row(app_id).ok_or_else(|| {
                ServerError::invalid_request(format!("record at index {index} has no id"))
            })
        })
        .collect()
}
