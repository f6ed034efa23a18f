//! File storage for uploaded product images.
//!
//! Paths handed to a [`BlobStore`] are always relative to the store root and
//! validated by [`ImagePath`], so callers cannot address files outside it.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::ImagePath;

#[cfg(test)]
pub mod test;

/// Directory under the storage root holding product images.
pub const PRODUCT_IMAGE_DIR: &str = "products";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Short machine-readable kind, reported as the error code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "storage",
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Minimal object/file store used by the product services.
pub trait BlobStore {
    /// Write `contents` to `path`, creating parent directories as needed.
    fn put(&self, path: &ImagePath, contents: &[u8]) -> StorageResult<()>;
    /// Remove `path`; removing a missing file succeeds.
    fn delete(&self, path: &ImagePath) -> StorageResult<()>;
    fn exists(&self, path: &ImagePath) -> StorageResult<bool>;
}

/// [`BlobStore`] backed by a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, path: &ImagePath) -> PathBuf {
        self.root.join(path.as_str())
    }
}

impl BlobStore for LocalBlobStore {
    fn put(&self, path: &ImagePath, contents: &[u8]) -> StorageResult<()> {
        let full_path = self.full_path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full_path, contents)?;
        Ok(())
    }

    fn delete(&self, path: &ImagePath) -> StorageResult<()> {
        match fs::remove_file(self.full_path(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, path: &ImagePath) -> StorageResult<bool> {
        Ok(self.full_path(path).try_exists()?)
    }
}

/// Build a stored image file name: `{unix_timestamp}-{unique_token}.{extension}`.
pub fn image_file_name(timestamp: i64, extension: &str) -> String {
    format!("{timestamp}-{}.{extension}", Uuid::new_v4().simple())
}
