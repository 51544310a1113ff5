//! core::worktree
//!
//! Working copy primitives.
//!
//! The working copy is flat: versioned files are the plain files directly
//! inside the working directory. Subdirectories, the repository directory
//! included, are never listed, and every name is checked as a [`FileName`]
//! before it touches the disk.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::store::StoreError;
use super::types::{FileName, ObjectId};

/// The files of a working directory.
#[derive(Debug, Clone)]
pub struct WorkTree {
    root: PathBuf,
}

impl WorkTree {
    /// Create a view over a working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Check that `name` is a plain file name inside the working directory.
    ///
    /// # Errors
    ///
    /// A name that could escape the working directory or reach the
    /// repository directory is reported as corrupt. User operands are
    /// checked before they get here, so only stored data can trip this.
    pub fn check_name(&self, name: &str) -> Result<(), StoreError> {
        self.path(name).map(|_| ())
    }

    fn path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let name = FileName::new(name).map_err(|e| StoreError::corrupt(&self.root, e))?;
        Ok(self.root.join(name.as_str()))
    }

    /// Names of every plain file in the working directory, sorted.
    pub fn list_files(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(StoreError::io(&self.root))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(StoreError::io(&self.root))?;
            let is_file = entry
                .file_type()
                .map_err(StoreError::io(&entry.path()))?
                .is_file();
            if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
                if FileName::new(name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Check whether `name` is a plain file in the working directory.
    ///
    /// Invalid names never exist.
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).map(|path| path.is_file()).unwrap_or(false)
    }

    /// Read a file, or `None` if it is absent.
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path(name)?;
        if !path.is_file() {
            return Ok(None);
        }
        fs::read(&path).map(Some).map_err(StoreError::io(&path))
    }

    /// Content id of a file, or `None` if it is absent.
    pub fn hash(&self, name: &str) -> Result<Option<ObjectId>, StoreError> {
        Ok(self.read(name)?.map(|content| ObjectId::hash_of(&content)))
    }

    /// Write a file, replacing any existing content.
    pub fn write(&self, name: &str, content: &[u8]) -> Result<(), StoreError> {
        let path = self.path(name)?;
        fs::write(&path, content).map_err(StoreError::io(&path))
    }

    /// Delete a file. Deleting an absent file is a no-op.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }
}
