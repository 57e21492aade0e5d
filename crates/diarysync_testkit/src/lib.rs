//! # diarysync Testkit
//!
//! Test utilities for diarysync.
//!
//! This crate provides:
//! - Temporary stores that clean up after themselves
//! - Property-based generators for records and record sets
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diarysync_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     let store = TempFileStore::new();
//!     // ... store operations, then store.reopen()
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
