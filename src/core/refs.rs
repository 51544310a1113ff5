//! core::refs
//!
//! The ref table: named branch pointers plus the HEAD indirection.
//!
//! Each branch is one file under `branches/` holding a commit id. Tracking
//! refs (`origin/master`) nest one directory deep. `HEAD` holds the name of
//! the current branch, never a commit id.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use super::paths::RepoPaths;
use super::store::{write_atomic, StoreError};
use super::types::{BranchName, ObjectId};

/// Branch pointers and HEAD for one repository.
#[derive(Debug, Clone)]
pub struct RefTable {
    branches_dir: PathBuf,
    head_path: PathBuf,
}

impl RefTable {
    /// Create a ref table over a repository's layout.
    pub fn new(paths: &RepoPaths) -> Self {
        Self {
            branches_dir: paths.branches_dir(),
            head_path: paths.head_path(),
        }
    }

    fn branch_path(&self, name: &BranchName) -> PathBuf {
        // Branch names are validated path-safe, '/' included.
        self.branches_dir.join(name.as_str())
    }

    /// Name of the current branch.
    ///
    /// # Errors
    ///
    /// A missing or malformed `HEAD` is reported as corrupt: every
    /// initialized repository has one.
    pub fn head(&self) -> Result<BranchName, StoreError> {
        let raw = fs::read_to_string(&self.head_path).map_err(StoreError::io(&self.head_path))?;
        BranchName::new(raw.trim()).map_err(|e| StoreError::corrupt(&self.head_path, e))
    }

    /// Point HEAD at a branch.
    pub fn set_head(&self, name: &BranchName) -> Result<(), StoreError> {
        write_atomic(&self.head_path, name.as_str().as_bytes())?;
        debug!(branch = %name, "HEAD moved");
        Ok(())
    }

    /// Commit id a branch points at, or `None` if the branch does not exist.
    pub fn tip(&self, name: &BranchName) -> Result<Option<ObjectId>, StoreError> {
        let path = self.branch_path(name);
        match fs::read_to_string(&path) {
            Ok(raw) => ObjectId::new(raw.trim())
                .map(Some)
                .map_err(|e| StoreError::corrupt(&path, e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // A directory here means `name` only prefixes tracking refs.
            Err(_) if path.is_dir() => Ok(None),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    /// Commit id of the current branch.
    pub fn head_commit(&self) -> Result<ObjectId, StoreError> {
        let head = self.head()?;
        self.tip(&head)?.ok_or_else(|| {
            StoreError::corrupt(&self.head_path, format!("HEAD names missing branch '{head}'"))
        })
    }

    /// Check whether `name` is a directory of tracking refs.
    pub fn is_namespace(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_dir()
    }

    /// Check whether a branch exists.
    pub fn exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    /// Create or move a branch.
    pub fn set_tip(&self, name: &BranchName, id: &ObjectId) -> Result<(), StoreError> {
        write_atomic(&self.branch_path(name), id.as_str().as_bytes())?;
        debug!(branch = %name, commit = %id.short(12), "branch updated");
        Ok(())
    }

    /// Delete a branch. Deleting an absent branch is a no-op.
    pub fn delete(&self, name: &BranchName) -> Result<(), StoreError> {
        let path = self.branch_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(branch = %name, "branch deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    /// List every branch, tracking refs included, sorted by name.
    pub fn list(&self) -> Result<Vec<BranchName>, StoreError> {
        let mut names = Vec::new();
        let mut pending: Vec<(PathBuf, String)> = vec![(self.branches_dir.clone(), String::new())];

        while let Some((dir, prefix)) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::Io { path: dir, source: e }),
            };
            for entry in entries {
                let entry = entry.map_err(StoreError::io(&dir))?;
                let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                let full = format!("{prefix}{file_name}");
                if entry.path().is_dir() {
                    pending.push((entry.path(), format!("{full}/")));
                } else if let Ok(name) = BranchName::new(full) {
                    // Leftover temp files start with '.' and fail validation.
                    names.push(name);
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_refs() -> (TempDir, RefTable) {
        let temp = TempDir::new().unwrap();
        let paths = RepoPaths::new(temp.path().to_path_buf());
        paths.ensure_dirs().unwrap();
        (temp, RefTable::new(&paths))
    }

    fn branch(name: &str) -> BranchName {
        BranchName::new(name).unwrap()
    }

    #[test]
    fn set_and_read_tip() {
        let (_temp, refs) = test_refs();
        let id = ObjectId::hash_of(b"c1");

        assert_eq!(refs.tip(&branch("master")).unwrap(), None);
        refs.set_tip(&branch("master"), &id).unwrap();
        assert_eq!(refs.tip(&branch("master")).unwrap(), Some(id));
        assert!(refs.exists(&branch("master")));
    }

    #[test]
    fn head_resolves_to_commit() {
        let (_temp, refs) = test_refs();
        let id = ObjectId::hash_of(b"c1");
        refs.set_tip(&branch("master"), &id).unwrap();
        refs.set_head(&branch("master")).unwrap();

        assert_eq!(refs.head().unwrap(), branch("master"));
        assert_eq!(refs.head_commit().unwrap(), id);
    }

    #[test]
    fn missing_head_is_corrupt_or_io() {
        let (_temp, refs) = test_refs();
        assert!(refs.head().is_err());
    }

    #[test]
    fn head_naming_missing_branch_is_reported() {
        let (_temp, refs) = test_refs();
        refs.set_head(&branch("gone")).unwrap();
        assert!(matches!(refs.head_commit(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn delete_removes_branch() {
        let (_temp, refs) = test_refs();
        refs.set_tip(&branch("feature"), &ObjectId::hash_of(b"x")).unwrap();
        refs.delete(&branch("feature")).unwrap();
        assert!(!refs.exists(&branch("feature")));
        refs.delete(&branch("feature")).unwrap();
    }

    #[test]
    fn list_includes_nested_tracking_refs() {
        let (_temp, refs) = test_refs();
        let id = ObjectId::hash_of(b"x");
        refs.set_tip(&branch("master"), &id).unwrap();
        refs.set_tip(&branch("origin/master"), &id).unwrap();
        refs.set_tip(&branch("feature"), &id).unwrap();

        let names: Vec<String> = refs.list().unwrap().into_iter().map(String::from).collect();
        assert_eq!(names, vec!["feature", "master", "origin/master"]);
    }

    #[test]
    fn remote_directory_is_not_a_branch() {
        let (_temp, refs) = test_refs();
        refs.set_tip(&branch("origin/master"), &ObjectId::hash_of(b"x")).unwrap();
        assert_eq!(refs.tip(&branch("origin")).unwrap(), None);
        assert!(!refs.exists(&branch("origin")));
        assert!(refs.is_namespace(&branch("origin")));
        assert!(!refs.is_namespace(&branch("origin/master")));
    }
}
