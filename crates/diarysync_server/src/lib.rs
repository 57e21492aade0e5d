//! # diarysync Server
//!
//! Record synchronization service for journal applications.
//!
//! This crate provides:
//! - [`Reconciler`]: two-way presence sync of one partition
//! - [`BulkSaver`]: unconditional create-or-update of records
//! - [`RequestHandler`] and [`SyncServer`]: the logical operations the
//!   transport layer exposes (info, list, save, sync)
//!
//! # Architecture
//!
//! The server is stateless between requests. All state lives in a
//! [`diarysync_storage::RecordStore`] shared as `Arc<dyn RecordStore>`, and the
//! store alone arbitrates concurrent writers.
//!
//! # Protocol
//!
//! A sync request carries a partition id and every record the client holds:
//! 1. The server loads the partition
//! 2. Stored records whose id the client lacks are returned for download
//! 3. Client records are inserted where their id is absent; existing
//!    stored records are never overwritten by a sync
//!
//! Explicit edits go through the save path, which replaces stored records.

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod bulk_save;
mod config;
mod error;
mod handler;
mod reconciler;
mod server;

pub use bulk_save::BulkSaver;
pub use config::{ServerConfig, DEFAULT_APP_ID};
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use server::SyncServer;
