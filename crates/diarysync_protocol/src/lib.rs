//! # diarysync Protocol
//!
//! Client-facing record shape and sync messages for diarysync.
//!
//! This crate provides:
//! - [`Record`], decoded leniently from whatever a client sends
//! - The tag codec used at the storage boundary
//! - Mapping between [`Record`] and [`diarysync_storage::StoredRow`]
//! - Request/response messages for listing, saving and syncing
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod error;
mod lenient;
mod messages;
mod record;
mod tags;

pub use diarysync_storage::SortKey;
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    ErrorResponse, ListRequest, ListResponse, Operation, SaveRequest, SaveResponse, ServiceInfo,
    SyncMessage, SyncRequest, SyncResponse, WireMessage,
};
pub use record::Record;
pub use tags::{decode_tags, encode_tags};
