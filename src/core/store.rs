//! core::store
//!
//! Content-addressed object storage.
//!
//! # Architecture
//!
//! Two flat key spaces share one discipline: the key of an object is the
//! hex SHA-256 of its stored bytes.
//! - `objects/<id>` - blob contents, `id = hash(content)`
//! - `commits/<id>` - canonical commit records, `id = hash(canonical bytes)`
//!
//! Writes are idempotent: putting an object whose key already exists is a
//! no-op and returns the same id. Reads trust the key and perform no hash
//! verification.
//!
//! # Durability
//!
//! Every file this crate persists is written through [`write_atomic`]:
//! temp file in the same directory, `sync_all`, then rename. A reader never
//! observes a partially written object or ref.
//!
//! # Example
//!
//! ```
//! use graftwork::core::paths::RepoPaths;
//! use graftwork::core::store::ObjectStore;
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let paths = RepoPaths::new(temp.path().to_path_buf());
//! paths.ensure_dirs().unwrap();
//!
//! let store = ObjectStore::new(&paths);
//! let id = store.put_blob(b"hello").unwrap();
//! assert_eq!(store.get_blob(&id).unwrap(), b"hello");
//! assert_eq!(store.put_blob(b"hello").unwrap(), id);
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::commit::Commit;
use super::paths::RepoPaths;
use super::types::ObjectId;

/// The two kinds of stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Commit,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Blob => write!(f, "blob"),
            ObjectKind::Commit => write!(f, "commit"),
        }
    }
}

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No object with that id exists.
    #[error("{kind} not found: {id}")]
    NotFound { kind: ObjectKind, id: String },

    /// A commit id prefix matched more than one commit.
    #[error("ambiguous commit id prefix: {0}")]
    AmbiguousPrefix(String),

    /// A stored file could not be decoded.
    #[error("corrupt data at '{path}': {message}")]
    Corrupt { path: PathBuf, message: String },

    /// A commit could not be serialized.
    #[error("failed to encode commit: {0}")]
    Encode(#[source] serde_json::Error),

    /// Filesystem failure.
    #[error("i/o error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &Path, message: impl std::fmt::Display) -> StoreError {
        StoreError::Corrupt {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Content-addressed store for blobs and commits.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
    commits_dir: PathBuf,
}

impl ObjectStore {
    /// Create a store over a repository's object directories.
    pub fn new(paths: &RepoPaths) -> Self {
        Self {
            objects_dir: paths.objects_dir(),
            commits_dir: paths.commits_dir(),
        }
    }

    // =========================================================================
    // Blobs
    // =========================================================================

    /// Store blob content and return its id.
    ///
    /// Re-putting identical content writes nothing and returns the same id.
    pub fn put_blob(&self, content: &[u8]) -> Result<ObjectId, StoreError> {
        let id = ObjectId::hash_of(content);
        let path = self.objects_dir.join(id.as_str());
        if !path.exists() {
            write_atomic(&path, content)?;
            debug!(id = %id.short(12), bytes = content.len(), "stored blob");
        }
        Ok(id)
    }

    /// Read blob content.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no blob has that id.
    pub fn get_blob(&self, id: &ObjectId) -> Result<Vec<u8>, StoreError> {
        read_object(&self.objects_dir.join(id.as_str()), ObjectKind::Blob, id)
    }

    /// Check whether a blob is present.
    pub fn has_blob(&self, id: &ObjectId) -> bool {
        self.objects_dir.join(id.as_str()).is_file()
    }

    // =========================================================================
    // Commits
    // =========================================================================

    /// Store a commit under the hash of its canonical serialization.
    pub fn put_commit(&self, commit: &Commit) -> Result<ObjectId, StoreError> {
        let bytes = commit.to_canonical_bytes().map_err(StoreError::Encode)?;
        let id = ObjectId::hash_of(&bytes);
        self.put_commit_bytes(&id, &bytes)?;
        Ok(id)
    }

    /// Store an already-serialized commit under an existing id.
    ///
    /// Used when copying between stores, so ids are carried over verbatim
    /// and never recomputed. Returns `true` if anything was written.
    pub fn put_commit_bytes(&self, id: &ObjectId, bytes: &[u8]) -> Result<bool, StoreError> {
        let path = self.commits_dir.join(id.as_str());
        if path.exists() {
            return Ok(false);
        }
        write_atomic(&path, bytes)?;
        debug!(id = %id.short(12), "stored commit");
        Ok(true)
    }

    /// Read and decode a commit.
    pub fn get_commit(&self, id: &ObjectId) -> Result<Commit, StoreError> {
        let path = self.commits_dir.join(id.as_str());
        let bytes = read_object(&path, ObjectKind::Commit, id)?;
        Commit::from_bytes(&bytes).map_err(|e| StoreError::corrupt(&path, e))
    }

    /// Read a commit's stored bytes without decoding them.
    pub fn get_commit_bytes(&self, id: &ObjectId) -> Result<Vec<u8>, StoreError> {
        read_object(&self.commits_dir.join(id.as_str()), ObjectKind::Commit, id)
    }

    /// Check whether a commit is present.
    pub fn has_commit(&self, id: &ObjectId) -> bool {
        self.commits_dir.join(id.as_str()).is_file()
    }

    /// List every stored commit id, sorted.
    pub fn commit_ids(&self) -> Result<Vec<ObjectId>, StoreError> {
        let entries = fs::read_dir(&self.commits_dir).map_err(StoreError::io(&self.commits_dir))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(StoreError::io(&self.commits_dir))?;
            // Temp files and strays are not valid ids; skip them.
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| ObjectId::new(name).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Resolve an abbreviated commit id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if no commit id starts with `prefix`
    /// - [`StoreError::AmbiguousPrefix`] if more than one does
    pub fn resolve_commit_prefix(&self, prefix: &str) -> Result<ObjectId, StoreError> {
        let prefix = prefix.to_ascii_lowercase();
        let not_found = || StoreError::NotFound {
            kind: ObjectKind::Commit,
            id: prefix.clone(),
        };
        if prefix.is_empty() {
            return Err(not_found());
        }

        let mut matches = self
            .commit_ids()?
            .into_iter()
            .filter(|id| id.as_str().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (Some(_), Some(_)) => Err(StoreError::AmbiguousPrefix(prefix.clone())),
            (None, _) => Err(not_found()),
        }
    }
}

fn read_object(path: &Path, kind: ObjectKind, id: &ObjectId) -> Result<Vec<u8>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound {
            kind,
            id: id.to_string(),
        }),
        Err(e) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write a file atomically.
///
/// Creates parent directories if needed, writes to a uniquely named temp
/// file beside the target, syncs it, then renames over the target.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::corrupt(path, "path has no parent directory"))?;
    fs::create_dir_all(parent).map_err(StoreError::io(parent))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("object");
    let temp_path = parent.join(format!(
        ".{}.tmp-{}",
        file_name,
        uuid::Uuid::new_v4().simple()
    ));

    let mut file = File::create(&temp_path).map_err(StoreError::io(&temp_path))?;
    file.write_all(contents).map_err(StoreError::io(&temp_path))?;
    file.sync_all().map_err(StoreError::io(&temp_path))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(StoreError::io(path))
}

/// Read a JSON document, returning the default value if the file is absent or empty.
pub(crate) fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&contents).map_err(|e| StoreError::corrupt(path, e))
}

/// Write a JSON document atomically.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| StoreError::corrupt(path, e))?;
    write_atomic(path, &json)
}
