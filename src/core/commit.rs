//! core::commit
//!
//! The immutable commit record and its canonical serialization.
//!
//! # Canonical form
//!
//! A commit's id is the SHA-256 of its canonical bytes: compact JSON with
//! fields in declaration order (`message`, `timestamp`, `parent`,
//! `second_parent`, `files`) and the file map sorted by name. Logically
//! identical commits always hash identically, in any store.
//!
//! Ids are computed once, from the bytes that are written. Stored commits
//! are never re-serialized to recover an id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{ObjectId, UtcTimestamp};

/// Message of the root commit every repository starts from.
pub const ROOT_MESSAGE: &str = "initial commit";

/// One repository snapshot.
///
/// Field order is part of the canonical form. Do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit message.
    pub message: String,

    /// When the commit was made.
    pub timestamp: UtcTimestamp,

    /// Primary parent. `None` only for the root commit.
    pub parent: Option<ObjectId>,

    /// Second parent, present only on merge commits.
    pub second_parent: Option<ObjectId>,

    /// Tracked files: name to blob id.
    pub files: BTreeMap<String, ObjectId>,
}

impl Commit {
    /// Create a single-parent commit stamped with the current time.
    pub fn new(
        message: impl Into<String>,
        parent: Option<ObjectId>,
        files: BTreeMap<String, ObjectId>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp: UtcTimestamp::now(),
            parent,
            second_parent: None,
            files,
        }
    }

    /// Create a merge commit with two parents.
    pub fn merge(
        message: impl Into<String>,
        parent: ObjectId,
        second_parent: ObjectId,
        files: BTreeMap<String, ObjectId>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp: UtcTimestamp::now(),
            parent: Some(parent),
            second_parent: Some(second_parent),
            files,
        }
    }

    /// The root commit.
    ///
    /// Its timestamp is the Unix epoch, so every repository shares the same
    /// root id.
    pub fn root() -> Self {
        Self {
            message: ROOT_MESSAGE.to_string(),
            timestamp: UtcTimestamp::epoch(),
            parent: None,
            second_parent: None,
            files: BTreeMap::new(),
        }
    }

    /// Serialize to canonical bytes.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode stored commit bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Compute the id of this commit's canonical form.
    pub fn id(&self) -> Result<ObjectId, serde_json::Error> {
        Ok(ObjectId::hash_of(&self.to_canonical_bytes()?))
    }

    /// Parent ids, primary first.
    pub fn parents(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.iter().chain(self.second_parent.iter())
    }

    /// Check whether this is a merge commit.
    pub fn is_merge(&self) -> bool {
        self.second_parent.is_some()
    }

    /// Blob id tracked under `name`, if any.
    pub fn blob(&self, name: &str) -> Option<&ObjectId> {
        self.files.get(name)
    }

    /// Check whether the commit tracks `name`.
    pub fn tracks(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(pairs: &[(&str, &[u8])]) -> BTreeMap<String, ObjectId> {
        pairs
            .iter()
            .map(|(name, content)| (name.to_string(), ObjectId::hash_of(content)))
            .collect()
    }

    #[test]
    fn root_id_is_stable() {
        assert_eq!(Commit::root().id().unwrap(), Commit::root().id().unwrap());
        assert!(Commit::root().parent.is_none());
        assert!(Commit::root().files.is_empty());
    }

    #[test]
    fn canonical_field_order() {
        let json = String::from_utf8(Commit::root().to_canonical_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"message":"initial commit","timestamp":"1970-01-01T00:00:00Z","parent":null,"second_parent":null,"files":{}}"#
        );
    }

    #[test]
    fn file_map_is_sorted_in_canonical_form() {
        let mut commit = Commit::root();
        commit.files = files(&[("z.txt", b"z"), ("a.txt", b"a")]);
        let json = String::from_utf8(commit.to_canonical_bytes().unwrap()).unwrap();
        assert!(json.find("a.txt").unwrap() < json.find("z.txt").unwrap());
    }

    #[test]
    fn identical_commits_hash_identically() {
        let mut a = Commit::new("msg", Some(Commit::root().id().unwrap()), files(&[("f", b"1")]));
        let b = a.clone();
        assert_eq!(a.id().unwrap(), b.id().unwrap());

        a.message.push('!');
        assert_ne!(a.id().unwrap(), b.id().unwrap());
    }

    #[test]
    fn decode_roundtrip() {
        let commit = Commit::merge(
            "Merged feature into master.",
            ObjectId::hash_of(b"p1"),
            ObjectId::hash_of(b"p2"),
            files(&[("a", b"a")]),
        );
        let bytes = commit.to_canonical_bytes().unwrap();
        let decoded = Commit::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, commit);
        assert_eq!(decoded.to_canonical_bytes().unwrap(), bytes);
    }

    #[test]
    fn parents_primary_first() {
        let p1 = ObjectId::hash_of(b"p1");
        let p2 = ObjectId::hash_of(b"p2");
        let commit = Commit::merge("m", p1.clone(), p2.clone(), BTreeMap::new());
        let parents: Vec<_> = commit.parents().cloned().collect();
        assert_eq!(parents, vec![p1, p2]);
        assert!(commit.is_merge());
        assert_eq!(Commit::root().parents().count(), 0);
    }

    #[test]
    fn tracks_and_blob() {
        let mut commit = Commit::root();
        commit.files = files(&[("a.txt", b"1")]);
        assert!(commit.tracks("a.txt"));
        assert!(!commit.tracks("b.txt"));
        assert_eq!(commit.blob("a.txt"), Some(&ObjectId::hash_of(b"1")));
    }
}
