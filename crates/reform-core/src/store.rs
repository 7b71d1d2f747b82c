//! Blob store boundary.
//!
//! The pipeline reads originals and writes reforms through [`BlobStore`],
//! never through the filesystem directly. [`FsStore`] is the local-disk
//! implementation; paths are resolved under a fixed root and may not escape
//! it.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Storage abstraction the reform pipeline reads and writes through.
///
/// Implementations must hand out readers positioned at the start of the
/// blob and must treat deletion of a missing blob as a non-error.
pub trait BlobStore: Send + Sync {
    /// Open a blob for reading, positioned at the start.
    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>, StoreError>;

    /// Write a blob, creating parent directories as needed.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError>;

    /// Delete a blob. Returns `Ok(false)` when it did not exist.
    fn delete(&self, path: &Path) -> Result<bool, StoreError>;

    /// Whether a blob exists at the path.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory (and parents) if missing. Idempotent; a
    /// concurrent create of the same directory is not an error.
    fn ensure_dir(&self, path: &Path) -> Result<(), StoreError>;
}

/// Local filesystem store rooted at a base directory.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path under the root, rejecting traversal out of it.
    fn resolve(&self, path: &Path) -> Result<PathBuf, StoreError> {
        for component in path.components() {
            if matches!(component, std::path::Component::ParentDir) {
                return Err(StoreError::InvalidPath(format!(
                    "Path contains parent-directory sequences: {}",
                    path.display()
                )));
            }
        }
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        if !full.starts_with(&self.root) {
            return Err(StoreError::InvalidPath(format!(
                "Path outside store root: {}",
                path.display()
            )));
        }
        Ok(full)
    }
}

impl BlobStore for FsStore {
    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>, StoreError> {
        let full = self.resolve(path)?;
        let file = File::open(&full).map_err(|e| StoreError::SourceUnavailable {
            path: full.clone(),
            message: e.to_string(),
        })?;
        Ok(Box::new(file))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        tracing::debug!("Writing {} bytes to {:?}", bytes.len(), full);
        fs::write(&full, bytes)?;
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<bool, StoreError> {
        let full = self.resolve(path)?;
        match fs::remove_file(&full) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).map(|full| full.exists()).unwrap_or(false)
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        // create_dir_all succeeds when the directory already exists, which
        // also covers the concurrent-create race
        fs::create_dir_all(&full)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_write_then_open() {
        let (_dir, store) = store();
        store.write(Path::new("a/b/blob.bin"), b"hello").unwrap();
        assert!(store.exists(Path::new("a/b/blob.bin")));

        let mut reader = store.open(Path::new("a/b/blob.bin")).unwrap();
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"hello");
    }

    #[test]
    fn test_open_missing_is_source_unavailable() {
        let (_dir, store) = store();
        let err = store.open(Path::new("ghost.png")).err().unwrap();
        assert!(matches!(err, StoreError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_delete_missing_not_an_error() {
        let (_dir, store) = store();
        assert!(!store.delete(Path::new("ghost.png")).unwrap());

        store.write(Path::new("real.png"), b"x").unwrap();
        assert!(store.delete(Path::new("real.png")).unwrap());
        assert!(!store.exists(Path::new("real.png")));
    }

    #[test]
    fn test_traversal_rejected() {
        let (_dir, store) = store();
        let err = store.write(Path::new("../escape.bin"), b"x").unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }

    #[test]
    fn test_ensure_dir_idempotent() {
        let (_dir, store) = store();
        store.ensure_dir(Path::new("reforms/thumbnail")).unwrap();
        store.ensure_dir(Path::new("reforms/thumbnail")).unwrap();
        assert!(store.root().join("reforms/thumbnail").is_dir());
    }
}
