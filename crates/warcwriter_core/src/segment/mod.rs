//! Output segments.
//!
//! A segment is one gzip-framed WARC file. Segments are created by the
//! [`SegmentManager`], appended to by the serializer and never reopened,
//! truncated or deleted.
//!
//! ## Segment Layout
//!
//! ```text
//! | warcinfo member | response member | request member | response member | ...
//! ```
//!
//! The first member of every segment is a `warcinfo` record. Each exchange
//! contributes a response member immediately followed by its request member.

mod manager;
mod naming;

pub use manager::{RotationResult, SegmentManager, WriterState};
pub use naming::{SegmentName, SEGMENT_EXTENSION};

use crate::error::CoreResult;
use std::fmt;
use std::path::{Path, PathBuf};
use warcwriter_storage::StorageBackend;

/// An open output segment.
pub struct Segment {
    path: PathBuf,
    file_name: String,
    serial: u64,
    backend: Box<dyn StorageBackend>,
    info_written: bool,
    appended: u64,
}

impl Segment {
    /// Wraps an open backend as a fresh segment.
    ///
    /// The segment starts out waiting for its `warcinfo` record.
    #[must_use]
    pub fn new(path: PathBuf, serial: u64, backend: Box<dyn StorageBackend>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            serial,
            backend,
            info_written: false,
            appended: 0,
        }
    }

    /// Full path of the segment file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name, as written in `WARC-Filename`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Serial the segment was created with.
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Returns true until the segment's `warcinfo` record has been written.
    #[must_use]
    pub fn needs_info(&self) -> bool {
        !self.info_written
    }

    /// Bytes appended through this handle.
    #[must_use]
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Current stored size.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot report its size.
    pub fn size(&self) -> CoreResult<u64> {
        Ok(self.backend.size()?)
    }

    /// Returns false if the segment's storage has disappeared.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.backend.is_present()
    }

    /// Appends one gzip member and flushes it, syncing if asked to.
    pub(crate) fn append_member(&mut self, member: &[u8], sync: bool) -> CoreResult<()> {
        self.backend.append(member)?;
        self.appended += member.len() as u64;
        self.backend.flush()?;
        if sync {
            self.backend.sync()?;
        }
        Ok(())
    }

    pub(crate) fn mark_info_written(&mut self) {
        self.info_written = true;
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("path", &self.path)
            .field("serial", &self.serial)
            .field("info_written", &self.info_written)
            .field("appended", &self.appended)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warcwriter_storage::InMemoryBackend;

    #[test]
    fn new_segment_needs_info() {
        let segment = Segment::new(
            PathBuf::from("out/rec-20240101000000-00000-h.warc.gz"),
            0,
            Box::new(InMemoryBackend::new()),
        );
        assert!(segment.needs_info());
        assert_eq!(segment.file_name(), "rec-20240101000000-00000-h.warc.gz");
        assert_eq!(segment.serial(), 0);
        assert_eq!(segment.size().unwrap(), 0);
    }

    #[test]
    fn append_tracks_bytes() {
        let observer = InMemoryBackend::with_data(vec![0; 10]);
        let mut segment = Segment::new(PathBuf::from("s.warc.gz"), 1, Box::new(observer.clone()));

        segment.append_member(b"member", true).unwrap();
        segment.mark_info_written();

        assert!(!segment.needs_info());
        assert_eq!(segment.appended(), 6);
        assert_eq!(segment.size().unwrap(), 16);
        assert_eq!(&observer.data()[10..], b"member");
    }

    #[test]
    fn failed_append_is_reported() {
        let backend = InMemoryBackend::new();
        backend.close();
        let mut segment = Segment::new(PathBuf::from("s.warc.gz"), 1, Box::new(backend));

        assert!(segment.append_member(b"x", false).is_err());
        assert_eq!(segment.appended(), 0);
    }
}
