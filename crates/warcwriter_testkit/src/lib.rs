//! # warcwriter testkit
//!
//! Test utilities for warcwriter.
//!
//! This crate provides:
//! - Temporary archives driven by a fixed clock
//! - Property-based exchange generators using proptest
//! - The cross-crate property and scenario suites under `tests/`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warcwriter_testkit::prelude::*;
//!
//! #[test]
//! fn writes_one_segment() {
//!     let mut archive = TestArchive::new(1_000_000);
//!     let (response, request) = exchange("http://example.com/", "hello");
//!     archive.record_exchange(&response, &request).unwrap();
//!     assert_eq!(archive.segment_files().len(), 1);
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
