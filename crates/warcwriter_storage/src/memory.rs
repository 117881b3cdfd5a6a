//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An in-memory storage backend.
///
/// Clones share the same buffer, so a test can hand one clone to a segment
/// and keep another to inspect what was written.
///
/// # Example
///
/// ```rust
/// use warcwriter_storage::{StorageBackend, InMemoryBackend};
///
/// let observer = InMemoryBackend::new();
/// let mut writer = observer.clone();
/// writer.append(b"test data").unwrap();
/// assert_eq!(observer.data(), b"test data");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    data: Arc<RwLock<Vec<u8>>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing data.
    ///
    /// Useful for simulating a segment that already holds some bytes.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a copy of all data in the backend.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// Makes every later append fail with [`StorageError::Closed`].
    ///
    /// Used to inject write failures in tests.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl StorageBackend for InMemoryBackend {
    fn append(&mut self, new_data: &[u8]) -> StorageResult<u64> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StorageError::Closed);
        }

        let mut data = self.data.write();
        let offset = data.len() as u64;
        data.extend_from_slice(new_data);
        Ok(offset)
    }

    fn flush(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.data().is_empty());
    }

    #[test]
    fn memory_append_returns_correct_offset() {
        let mut backend = InMemoryBackend::new();

        assert_eq!(backend.append(b"hello").unwrap(), 0);
        assert_eq!(backend.append(b" world").unwrap(), 5);
        assert_eq!(backend.size().unwrap(), 11);
    }

    #[test]
    fn memory_clones_share_buffer() {
        let observer = InMemoryBackend::new();
        let mut writer = observer.clone();

        writer.append(b"shared").unwrap();
        assert_eq!(observer.data(), b"shared");
        assert_eq!(observer.size().unwrap(), 6);
    }

    #[test]
    fn memory_with_data() {
        let backend = InMemoryBackend::with_data(vec![0u8; 900]);
        assert_eq!(backend.size().unwrap(), 900);
    }

    #[test]
    fn memory_closed_rejects_appends() {
        let mut backend = InMemoryBackend::new();
        backend.append(b"before").unwrap();
        backend.close();

        let result = backend.append(b"after");
        assert!(matches!(result, Err(StorageError::Closed)));
        assert_eq!(backend.data(), b"before");
    }

    #[test]
    fn memory_flush_and_sync_succeed() {
        let mut backend = InMemoryBackend::new();
        backend.append(b"data").unwrap();
        assert!(backend.flush().is_ok());
        assert!(backend.sync().is_ok());
    }

    proptest! {
        #[test]
        fn size_is_sum_of_appends(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..16)) {
            let mut backend = InMemoryBackend::new();
            let mut expected = 0u64;
            for chunk in &chunks {
                let offset = backend.append(chunk).unwrap();
                prop_assert_eq!(offset, expected);
                expected += chunk.len() as u64;
            }
            prop_assert_eq!(backend.size().unwrap(), expected);
        }
    }
}
