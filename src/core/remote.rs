//! core::remote
//!
//! The remote table: remote names bound to the location of another
//! repository directory on the local filesystem.
//!
//! Locations are stored as given, with `/` converted to the platform
//! separator. Relative locations resolve against the working directory
//! when a remote is opened.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use super::paths::RepoPaths;
use super::store::{read_json, write_json, StoreError};
use super::types::RemoteName;

/// Name to location mapping for remotes.
#[derive(Debug, Clone)]
pub struct RemoteTable {
    path: PathBuf,
    remotes: BTreeMap<RemoteName, String>,
}

impl RemoteTable {
    /// Load the remote table. A missing table loads empty.
    pub fn load(paths: &RepoPaths) -> Result<Self, StoreError> {
        let path = paths.remotes_path();
        let remotes = read_json(&path)?;
        Ok(Self { path, remotes })
    }

    /// Persist the table.
    pub fn save(&self) -> Result<(), StoreError> {
        write_json(&self.path, &self.remotes)
    }

    /// Add a remote. Returns `false` if the name is taken.
    pub fn add(&mut self, name: RemoteName, location: &str) -> bool {
        if self.remotes.contains_key(&name) {
            return false;
        }
        self.remotes.insert(name, normalize_location(location));
        true
    }

    /// Remove a remote. Returns `false` if it did not exist.
    pub fn remove(&mut self, name: &RemoteName) -> bool {
        self.remotes.remove(name).is_some()
    }

    /// Stored location of a remote.
    pub fn location(&self, name: &RemoteName) -> Option<&str> {
        self.remotes.get(name).map(String::as_str)
    }
}

fn normalize_location(location: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        location.to_string()
    } else {
        location.replace('/', &MAIN_SEPARATOR.to_string())
    }
}

/// Resolve a stored location to an absolute repository directory.
pub fn resolve_location(work_dir: &Path, location: &str) -> PathBuf {
    let path = Path::new(location);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        work_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, RepoPaths) {
        let temp = TempDir::new().unwrap();
        let paths = RepoPaths::new(temp.path().to_path_buf());
        paths.ensure_dirs().unwrap();
        (temp, paths)
    }

    fn name(s: &str) -> RemoteName {
        RemoteName::new(s).unwrap()
    }

    #[test]
    fn add_rejects_duplicates() {
        let (_temp, paths) = fixture();
        let mut table = RemoteTable::load(&paths).unwrap();
        assert!(table.add(name("origin"), "../other/.graft"));
        assert!(!table.add(name("origin"), "../elsewhere/.graft"));
        assert_eq!(
            table.location(&name("origin")),
            Some(normalize_location("../other/.graft").as_str())
        );
    }

    #[test]
    fn remove_reports_absence() {
        let (_temp, paths) = fixture();
        let mut table = RemoteTable::load(&paths).unwrap();
        assert!(!table.remove(&name("origin")));
        table.add(name("origin"), "x");
        assert!(table.remove(&name("origin")));
        assert!(table.location(&name("origin")).is_none());
    }

    #[test]
    fn save_and_reload() {
        let (_temp, paths) = fixture();
        let mut table = RemoteTable::load(&paths).unwrap();
        table.add(name("b"), "/b/.graft");
        table.add(name("a"), "/a/.graft");
        table.save().unwrap();

        let reloaded = RemoteTable::load(&paths).unwrap();
        let names: Vec<&str> = reloaded.remotes.keys().map(RemoteName::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn relative_locations_resolve_against_work_dir() {
        let resolved = resolve_location(Path::new("/work"), "../peer/.graft");
        assert_eq!(resolved, PathBuf::from("/work/../peer/.graft"));

        let absolute = resolve_location(Path::new("/work"), "/abs/.graft");
        assert_eq!(absolute, PathBuf::from("/abs/.graft"));
    }
}
