//! File-backed record store.
//!
//! The store directory has this layout:
//!
//! ```text
//! <store_path>/
//! ├─ LOCK          # Advisory lock for single-process access
//! └─ records.log   # Append-only log of row frames
//! ```
//!
//! Every write appends the full row. Opening the store replays the log into
//! an in-memory partition index, where the last frame for a key wins.
//! Replacing a row with an equal row appends nothing. Superseded frames stay
//! in the log until [`FileStore::compact`] rewrites it.

use crate::error::{StorageError, StorageResult};
use crate::frame::{decode_frame, encode_frame, Frame};
use crate::row::StoredRow;
use crate::store::RecordStore;
use crate::table::PartitionTable;
use fs2::FileExt;
use parking_lot::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const LOCK_FILE: &str = "LOCK";
const LOG_FILE: &str = "records.log";
const COMPACT_FILE: &str = "records.log.compact";

/// Configuration for opening a [`FileStore`].
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Whether to create the store directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to fsync the log after every write (safer but slower).
    pub sync_on_write: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            sync_on_write: true,
        }
    }
}

impl FileStoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the store directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to fsync after every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}

/// Statistics from a log compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionStats {
    /// Rows kept, one frame each.
    pub rows: usize,
    /// Log size before compaction.
    pub bytes_before: u64,
    /// Log size after compaction.
    pub bytes_after: u64,
}

#[derive(Debug)]
struct LogState {
    table: PartitionTable,
    log: File,
    size: u64,
    /// Set when a partial frame could not be removed; the log no longer
    /// ends on a frame boundary and must not be appended to.
    failed: bool,
}

impl LogState {
    fn ensure_writable(&self) -> StorageResult<()> {
        if self.failed {
            return Err(StorageError::Failed(
                "record log holds a partial frame; reopen the store".to_string(),
            ));
        }
        Ok(())
    }
}

/// A durable record store backed by an append-only log.
///
/// # Durability
///
/// Each write is flushed to the OS before the call returns, and synced to
/// disk when [`FileStoreConfig::sync_on_write`] is set.
///
/// # Thread Safety
///
/// All state sits behind one lock. Conditional inserts check the index and
/// append the frame without releasing it.
///
/// # Example
///
/// ```no_run
/// use diarysync_storage::{FileStore, RecordStore, StoredRow};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("journal_store")).unwrap();
/// store.upsert_if_absent(StoredRow::new("daily", "1")).unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    config: FileStoreConfig,
    state: RwLock<LogState>,
    /// Held for exclusive access; released when the file is closed.
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a store with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`FileStore::open_with_config`].
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::open_with_config(path, FileStoreConfig::default())
    }

    /// Opens or creates a store directory and replays its log.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist and `create_if_missing` is false
    /// - Another process holds the lock (returns `Locked`)
    /// - A complete frame in the log is corrupted
    /// - I/O errors occur
    pub fn open_with_config(path: &Path, config: FileStoreConfig) -> StorageResult<Self> {
        if !path.exists() {
            if !config.create_if_missing {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("store directory not found: {}", path.display()),
                )));
            }
            fs::create_dir_all(path)?;
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(LOCK_FILE))?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked(path.display().to_string()));
        }

        // An interrupted compaction leaves the original log intact
        let leftover = path.join(COMPACT_FILE);
        if leftover.exists() {
            warn!(path = %leftover.display(), "removing unfinished compaction output");
            fs::remove_file(&leftover)?;
        }

        let mut log = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(LOG_FILE))?;
        let (table, size) = replay(&mut log)?;
        debug!(path = %path.display(), rows = table.len(), bytes = size, "record log replayed");

        Ok(Self {
            path: path.to_path_buf(),
            config,
            state: RwLock::new(LogState {
                table,
                log,
                size,
                failed: false,
            }),
            _lock_file: lock_file,
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the size of the record log in bytes.
    #[must_use]
    pub fn log_size(&self) -> u64 {
        self.state.read().size
    }

    /// Rewrites the log with one frame per live row.
    ///
    /// The new log is written beside the old one and renamed over it, so a
    /// crash leaves either the old or the new log in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the store has failed or on I/O errors; the old
    /// log is kept in that case.
    pub fn compact(&self) -> StorageResult<CompactionStats> {
        let mut state = self.state.write();
        state.ensure_writable()?;

        let tmp_path = self.path.join(COMPACT_FILE);
        let (log, size) = match write_compacted(&tmp_path, &state.table) {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&tmp_path) {
                    warn!(error = %cleanup, "failed to remove compaction output");
                }
                return Err(e);
            }
        };
        fs::rename(&tmp_path, self.path.join(LOG_FILE))?;

        let stats = CompactionStats {
            rows: state.table.len(),
            bytes_before: state.size,
            bytes_after: size,
        };
        state.log = log;
        state.size = size;
        info!(
            rows = stats.rows,
            bytes_before = stats.bytes_before,
            bytes_after = stats.bytes_after,
            "record log compacted"
        );
        Ok(stats)
    }

    fn append(&self, state: &mut LogState, row: &StoredRow) -> StorageResult<()> {
        state.ensure_writable()?;
        let frame = encode_frame(row)?;
        if let Err(e) = write_frame(&mut state.log, &frame, self.config.sync_on_write) {
            // Drop whatever part of the frame reached the file
            if let Err(rollback) = state.log.set_len(state.size) {
                error!(
                    error = %rollback,
                    "failed to roll back partial frame, refusing further writes"
                );
                state.failed = true;
            }
            return Err(e);
        }
        state.size += frame.len() as u64;
        Ok(())
    }
}

fn write_compacted(path: &Path, table: &PartitionTable) -> StorageResult<(File, u64)> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut size = 0u64;
    for row in table.rows() {
        let frame = encode_frame(row)?;
        file.write_all(&frame)?;
        size += frame.len() as u64;
    }
    file.flush()?;
    file.sync_all()?;
    Ok((file, size))
}

fn write_frame(log: &mut File, frame: &[u8], sync: bool) -> StorageResult<()> {
    log.seek(SeekFrom::End(0))?;
    log.write_all(frame)?;
    log.flush()?;
    if sync {
        log.sync_data()?;
    }
    Ok(())
}

/// Rebuilds the index from the log, cutting off a torn trailing frame.
fn replay(log: &mut File) -> StorageResult<(PartitionTable, u64)> {
    let mut buf = Vec::new();
    log.seek(SeekFrom::Start(0))?;
    log.read_to_end(&mut buf)?;

    let mut table = PartitionTable::new();
    let mut offset = 0usize;
    while offset < buf.len() {
        match decode_frame(&buf[offset..], offset as u64)? {
            Frame::Row(row, len) => {
                table.put(row);
                offset += len;
            }
            Frame::Torn => {
                warn!(
                    offset,
                    dropped = buf.len() - offset,
                    "truncating torn frame at end of record log"
                );
                log.set_len(offset as u64)?;
                log.sync_all()?;
                break;
            }
        }
    }

    Ok((table, offset as u64))
}

impl RecordStore for FileStore {
    fn list_by_partition(&self, app_id: &str) -> StorageResult<Vec<StoredRow>> {
        Ok(self.state.read().table.list(app_id))
    }

    fn upsert_replace(&self, row: StoredRow) -> StorageResult<()> {
        let mut state = self.state.write();
        if state.table.get(&row.app_id, &row.id) == Some(&row) {
            return Ok(());
        }
        self.append(&mut state, &row)?;
        state.table.put(row);
        Ok(())
    }

    fn upsert_if_absent(&self, row: StoredRow) -> StorageResult<bool> {
        let mut state = self.state.write();
        if state.table.contains(&row.app_id, &row.id) {
            return Ok(false);
        }
        self.append(&mut state, &row)?;
        state.table.put(row);
        Ok(true)
    }

    fn get(&self, app_id: &str, id: &str) -> StorageResult<Option<StoredRow>> {
        Ok(self.state.read().table.get(app_id, id).cloned())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.state.read().table.len())
    }
}
