//! # diarysync Storage
//!
//! Partitioned record store for diarysync.
//!
//! Records are grouped into partitions by application id and keyed by record
//! id within a partition. The store knows nothing about the client-facing
//! record shape; it holds [`StoredRow`]s whose `tags` column is already in
//! its serialized form.
//!
//! ## Design Principles
//!
//! - One row per `(app_id, id)` key, never deleted
//! - Two write modes: full replace and insert-if-absent
//! - Conditional inserts are decided under the store's own write lock
//! - Stores must be `Send + Sync` so requests can share them
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral use
//! - [`FileStore`] - Durable append-only log with a replayed index
//!
//! ## Example
//!
//! ```rust
//! use diarysync_storage::{InMemoryStore, RecordStore, StoredRow};
//!
//! let store = InMemoryStore::new();
//! let row = StoredRow::new("daily", "entry-1").with_content("hello");
//! assert!(store.upsert_if_absent(row.clone()).unwrap());
//! assert!(!store.upsert_if_absent(row).unwrap());
//! assert_eq!(store.list_by_partition("daily").unwrap().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod error;
mod file;
mod frame;
mod memory;
mod row;
mod store;
mod table;

pub use error::{StorageError, StorageResult};
pub use file::{CompactionStats, FileStore, FileStoreConfig};
pub use memory::InMemoryStore;
pub use row::{SortKey, StoredRow};
pub use store::RecordStore;
