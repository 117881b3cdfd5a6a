//! File-based storage backend for segment files.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// Segment files are opened once, with exclusive-create semantics, and then
/// only ever appended to. The backend never truncates, seeks backwards or
/// deletes its file.
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Example
///
/// ```no_run
/// use warcwriter_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::create_new(Path::new("rec-00000.warc.gz")).unwrap();
/// backend.append(b"gzip member bytes").unwrap();
/// backend.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: File,
}

impl FileBackend {
    /// Creates a new file at `path` and opens it for appending.
    ///
    /// The open uses `create_new`, so an existing file at the same path is
    /// never reused, even if it appeared after the caller checked for it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if the path is taken, or an I/O
    /// error if the file cannot be created.
    pub fn create_new(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => StorageError::AlreadyExists {
                    path: path.to_path_buf(),
                },
                _ => StorageError::Io(e),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        let offset = self.file.metadata()?.len();
        if data.is_empty() {
            return Ok(offset);
        }

        self.file.write_all(data)?;
        Ok(offset)
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.file.flush()?;
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn is_present(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.warc.gz");

        let backend = FileBackend::create_new(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn create_new_refuses_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.warc.gz");
        std::fs::write(&path, b"already here").unwrap();

        let result = FileBackend::create_new(&path);
        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));

        // The existing file is left untouched.
        assert_eq!(std::fs::read(&path).unwrap(), b"already here");
    }

    #[test]
    fn append_returns_offsets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.warc.gz");

        let mut backend = FileBackend::create_new(&path).unwrap();
        assert_eq!(backend.append(b"hello").unwrap(), 0);
        assert_eq!(backend.append(b" world").unwrap(), 5);
        backend.flush().unwrap();

        assert_eq!(backend.size().unwrap(), 11);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn size_reflects_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.warc.gz");

        let mut backend = FileBackend::create_new(&path).unwrap();
        backend.append(&[7u8; 900]).unwrap();
        backend.sync().unwrap();

        assert_eq!(backend.size().unwrap(), 900);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 900);
    }

    #[test]
    fn empty_append_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.warc.gz");

        let mut backend = FileBackend::create_new(&path).unwrap();
        backend.append(b"x").unwrap();

        assert_eq!(backend.append(b"").unwrap(), 1);
        assert_eq!(backend.size().unwrap(), 1);
    }

    #[test]
    fn missing_parent_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("seg.warc.gz");

        let result = FileBackend::create_new(&path);
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn removed_file_is_not_present() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.warc.gz");

        let backend = FileBackend::create_new(&path).unwrap();
        assert!(backend.is_present());

        std::fs::remove_file(&path).unwrap();
        assert!(!backend.is_present());
    }

    #[test]
    fn file_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg.warc.gz");

        let backend = FileBackend::create_new(&path).unwrap();
        assert_eq!(backend.path(), path);
    }
}
