//! core::index
//!
//! The staging index: the file map of the next commit.
//!
//! # Model
//!
//! The index is a full snapshot, not a delta. Immediately after a commit or
//! checkout it equals the current commit's file map; `add` and `rm` edit it
//! in place, and [`StagingIndex::diff_against`] recovers the staged changes.
//!
//! Content staged by `add` is held in a cache and only written to the object
//! store when a commit is built, so content overwritten before committing is
//! never persisted. The cache is cleared after every successful commit and
//! every checkout.
//!
//! # Persistence
//!
//! The index and cache are loaded once per session and must be saved
//! explicitly with [`StagingIndex::save`] after mutation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use super::commit::Commit;
use super::paths::RepoPaths;
use super::store::{read_json, write_json, ObjectKind, ObjectStore, StoreError};
use super::types::ObjectId;

/// Staged changes relative to a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexDiff {
    /// Files new or changed relative to the commit.
    pub added: Vec<String>,

    /// Files tracked by the commit but absent from the index.
    pub removed: Vec<String>,
}

impl IndexDiff {
    /// Check whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The pending next-commit snapshot plus the staged content cache.
#[derive(Debug, Clone)]
pub struct StagingIndex {
    index_path: PathBuf,
    staged_path: PathBuf,
    entries: BTreeMap<String, ObjectId>,
    staged: BTreeMap<ObjectId, Vec<u8>>,
}

impl StagingIndex {
    /// Load the index and staged cache from disk.
    ///
    /// Missing files load as empty.
    pub fn load(paths: &RepoPaths) -> Result<Self, StoreError> {
        let index_path = paths.index_path();
        let staged_path = paths.staged_path();

        let entries: BTreeMap<String, ObjectId> = read_json(&index_path)?;
        let encoded: BTreeMap<ObjectId, String> = read_json(&staged_path)?;
        let mut staged = BTreeMap::new();
        for (id, hex_content) in encoded {
            let content =
                hex::decode(&hex_content).map_err(|e| StoreError::corrupt(&staged_path, e))?;
            staged.insert(id, content);
        }

        Ok(Self {
            index_path,
            staged_path,
            entries,
            staged,
        })
    }

    /// Persist the index and staged cache.
    pub fn save(&self) -> Result<(), StoreError> {
        let encoded: BTreeMap<&ObjectId, String> = self
            .staged
            .iter()
            .map(|(id, content)| (id, hex::encode(content)))
            .collect();
        write_json(&self.staged_path, &encoded)?;
        write_json(&self.index_path, &self.entries)
    }

    /// The full file map.
    pub fn entries(&self) -> &BTreeMap<String, ObjectId> {
        &self.entries
    }

    /// Blob id staged under `name`.
    pub fn get(&self, name: &str) -> Option<&ObjectId> {
        self.entries.get(name)
    }

    /// Check whether `name` is in the index.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Stage content under `name`.
    ///
    /// Returns `false` without changing anything if the index already maps
    /// `name` to identical content.
    pub fn stage(&mut self, name: &str, content: Vec<u8>) -> bool {
        let id = ObjectId::hash_of(&content);
        if self.entries.get(name) == Some(&id) {
            return false;
        }
        debug!(file = name, blob = %id.short(12), "staged");
        self.staged.insert(id.clone(), content);
        self.entries.insert(name.to_string(), id);
        true
    }

    /// Remove `name` from the index, returning the id it held.
    ///
    /// Any cached content for it stays until the next commit clears the cache.
    pub fn unstage(&mut self, name: &str) -> Option<ObjectId> {
        let removed = self.entries.remove(name);
        if removed.is_some() {
            debug!(file = name, "unstaged");
        }
        removed
    }

    /// Staged changes relative to `commit`.
    pub fn diff_against(&self, commit: &Commit) -> IndexDiff {
        let added = self
            .entries
            .iter()
            .filter(|(name, id)| commit.blob(name) != Some(*id))
            .map(|(name, _)| name.clone())
            .collect();
        let removed = commit
            .files
            .keys()
            .filter(|name| !self.entries.contains_key(*name))
            .cloned()
            .collect();
        IndexDiff { added, removed }
    }

    /// Check whether the index equals `commit`'s file map.
    pub fn matches(&self, commit: &Commit) -> bool {
        self.entries == commit.files
    }

    /// Turn the index into a stored commit.
    ///
    /// The index becomes the commit's file map verbatim. Cached content the
    /// store lacks is written first, then the commit itself; the cache is
    /// then cleared and the index saved. The caller advances the branch ref,
    /// last.
    pub fn build_next_commit(
        &mut self,
        store: &ObjectStore,
        message: &str,
        parent: ObjectId,
        second_parent: Option<ObjectId>,
    ) -> Result<ObjectId, StoreError> {
        for id in self.entries.values() {
            if store.has_blob(id) {
                continue;
            }
            let content = self.staged.get(id).ok_or_else(|| StoreError::NotFound {
                kind: ObjectKind::Blob,
                id: id.to_string(),
            })?;
            store.put_blob(content)?;
        }

        let commit = match second_parent {
            Some(other) => Commit::merge(message, parent, other, self.entries.clone()),
            None => Commit::new(message, Some(parent), self.entries.clone()),
        };
        let id = store.put_commit(&commit)?;

        self.staged.clear();
        self.save()?;
        debug!(commit = %id.short(12), files = self.entries.len(), "commit built");
        Ok(id)
    }

    /// Replace the index with `commit`'s file map and clear the cache.
    pub fn reset_to(&mut self, commit: &Commit) {
        self.entries = commit.files.clone();
        self.staged.clear();
    }
}
