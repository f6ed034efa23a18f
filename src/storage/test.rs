use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::domain::types::ImagePath;
use crate::storage::{BlobStore, StorageError, StorageResult};

/// In-memory [`BlobStore`] used for unit tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    deleted: RefCell<Vec<String>>,
    fail_puts: bool,
}

impl MemoryBlobStore {
    pub fn with_file(self, path: &str, contents: &[u8]) -> Self {
        self.files
            .borrow_mut()
            .insert(path.to_string(), contents.to_vec());
        self
    }

    pub fn failing_puts(mut self) -> Self {
        self.fail_puts = true;
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    /// Paths passed to `delete`, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, path: &ImagePath, contents: &[u8]) -> StorageResult<()> {
        if self.fail_puts {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.files
            .borrow_mut()
            .insert(path.as_str().to_string(), contents.to_vec());
        Ok(())
    }

    fn delete(&self, path: &ImagePath) -> StorageResult<()> {
        self.deleted.borrow_mut().push(path.as_str().to_string());
        self.files.borrow_mut().remove(path.as_str());
        Ok(())
    }

    fn exists(&self, path: &ImagePath) -> StorageResult<bool> {
        Ok(self.files.borrow().contains_key(path.as_str()))
    }
}
