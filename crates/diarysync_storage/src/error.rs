//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The record log is corrupted.
    #[error("record log corrupted at offset {offset}: {message}")]
    Corrupted {
        /// Byte offset of the offending frame.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// A row could not be encoded for the log.
    #[error("codec error: {0}")]
    Codec(String),

    /// The store stopped accepting writes after an unrecoverable failure.
    #[error("store failed: {0}")]
    Failed(String),

    /// Another process holds the store directory.
    #[error("store locked: another process has exclusive access to {0}")]
    Locked(String),
}

impl StorageError {
    /// Creates a corruption error for the frame at `offset`.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::Corrupted {
            offset,
            message: message.into(),
        }
    }
}
