//! # warcwriter storage
//!
//! Append-only storage backends for warcwriter segment files.
//!
//! Backends are **opaque byte sinks**. They know nothing about WARC records,
//! gzip members or segment naming; `warcwriter_core` owns all of that.
//!
//! ## Design Principles
//!
//! - Backends only append, flush, sync and report their size
//! - A segment file is created exactly once and never truncated or rewritten
//! - Must be `Send + Sync` so a writer can be moved across threads
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - Segment files on the local file system
//! - [`InMemoryBackend`] - For tests that inspect the written bytes directly
//!
//! ## Example
//!
//! ```rust
//! use warcwriter_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! let offset = backend.append(b"WARC/1.0\r\n").unwrap();
//! assert_eq!(offset, 0);
//! assert_eq!(backend.size().unwrap(), 10);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
