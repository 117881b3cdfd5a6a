//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level append-only sink for segment bytes.
///
/// # Invariants
///
/// - `append` returns the offset where data was written
/// - Appended bytes are never modified or removed by the backend
/// - `size` reports the bytes actually stored, which is what rotation
///   decisions are based on
///
/// # Implementors
///
/// - [`super::FileBackend`] - For segment files on disk
/// - [`super::InMemoryBackend`] - For testing
pub trait StorageBackend: Send + Sync {
    /// Appends data to the end of the storage.
    ///
    /// Returns the offset where the data was written.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs. A failed append may leave a
    /// partial tail behind; readers are expected to skip it.
    fn append(&mut self, data: &[u8]) -> StorageResult<u64>;

    /// Flushes buffered writes to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Syncs data and metadata to durable storage.
    ///
    /// This is a stronger guarantee than `flush`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// For file backends this is re-read from the file system on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Returns false if the underlying storage has been removed from under
    /// the backend (for example, a segment file deleted by an operator).
    fn is_present(&self) -> bool {
        true
    }
}
