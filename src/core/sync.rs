//! core::sync
//!
//! Copying history between two repositories on the local filesystem.
//!
//! # Copy discipline
//!
//! Commits travel byte-for-byte under their existing ids. For each commit
//! the blobs it references are copied first, then the commit itself; commits
//! go oldest-first so a parent is always present before its children. Refs
//! move last. A store therefore never holds a commit whose parents or blobs
//! are missing, which is also what lets [`missing_commits`] stop descending
//! at the first commit the target already has.
//!
//! Nothing here touches either side's HEAD, index or working copy.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use super::graph::is_ancestor;
use super::refs::RefTable;
use super::store::{ObjectStore, StoreError};
use super::types::{BranchName, ObjectId, RemoteName};

/// Errors from push and fetch.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote branch has commits the local branch lacks.
    #[error("remote branch '{0}' is not an ancestor of the local head")]
    Rejected(BranchName),

    /// The remote has no such branch.
    #[error("remote has no branch '{0}'")]
    MissingBranch(BranchName),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One side of a transfer: a store and its refs.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub store: &'a ObjectStore,
    pub refs: &'a RefTable,
}

/// Objects written by a transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub commits: usize,
    pub blobs: usize,
}

impl CopyStats {
    /// Check whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.commits == 0 && self.blobs == 0
    }
}

/// Result of a successful push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub copied: CopyStats,
    /// Whether the remote branch moved.
    pub ref_updated: bool,
}

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Local tracking ref, `remote/branch`.
    pub tracking: BranchName,
    /// Fetched tip.
    pub tip: ObjectId,
    pub copied: CopyStats,
    /// Whether the tracking ref moved.
    pub ref_updated: bool,
}

/// Commits reachable from `tip` in `source` that `target` lacks, oldest first.
///
/// Iterative depth-first post-order over both parent edges, so every commit
/// comes after all of its missing parents.
pub fn missing_commits(
    source: &ObjectStore,
    target: &ObjectStore,
    tip: &ObjectId,
) -> Result<Vec<ObjectId>, StoreError> {
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(tip.clone(), false)];

    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        if target.has_commit(&id) || !visited.insert(id.clone()) {
            continue;
        }
        let commit = source.get_commit(&id)?;
        stack.push((id, true));
        // Reversed so the primary parent is explored first.
        for parent in commit.parents().collect::<Vec<_>>().into_iter().rev() {
            if !visited.contains(parent) && !target.has_commit(parent) {
                stack.push((parent.clone(), false));
            }
        }
    }

    Ok(order)
}

/// Copy commits, blobs first, in the order given.
pub fn copy_commits(
    source: &ObjectStore,
    target: &ObjectStore,
    ids: &[ObjectId],
) -> Result<CopyStats, StoreError> {
    let mut stats = CopyStats::default();
    for id in ids {
        let commit = source.get_commit(id)?;
        for blob in commit.files.values() {
            if !target.has_blob(blob) {
                target.put_blob(&source.get_blob(blob)?)?;
                stats.blobs += 1;
            }
        }
        if target.put_commit_bytes(id, &source.get_commit_bytes(id)?)? {
            stats.commits += 1;
        }
    }
    Ok(stats)
}

/// Push `local_tip` to `branch` on the remote.
///
/// Rejected unless the remote's current tip, if any, is an ancestor of
/// `local_tip`. A branch the remote lacks is created.
pub fn push(
    local: Endpoint<'_>,
    local_tip: &ObjectId,
    remote: Endpoint<'_>,
    branch: &BranchName,
) -> Result<PushOutcome, SyncError> {
    let remote_tip = remote.refs.tip(branch)?;
    if let Some(remote_tip) = &remote_tip {
        if !is_ancestor(local.store, remote_tip, local_tip)? {
            debug!(branch = %branch, remote_tip = %remote_tip.short(12), "push rejected");
            return Err(SyncError::Rejected(branch.clone()));
        }
    }

    let missing = missing_commits(local.store, remote.store, local_tip)?;
    let copied = copy_commits(local.store, remote.store, &missing)?;

    let ref_updated = remote_tip.as_ref() != Some(local_tip);
    if ref_updated {
        remote.refs.set_tip(branch, local_tip)?;
    }

    info!(
        branch = %branch,
        commits = copied.commits,
        blobs = copied.blobs,
        "pushed"
    );
    Ok(PushOutcome {
        copied,
        ref_updated,
    })
}

/// Fetch `branch` from the remote into the tracking ref `remote_name/branch`.
pub fn fetch(
    local: Endpoint<'_>,
    remote: Endpoint<'_>,
    remote_name: &RemoteName,
    branch: &BranchName,
) -> Result<FetchOutcome, SyncError> {
    let tip = remote
        .refs
        .tip(branch)?
        .ok_or_else(|| SyncError::MissingBranch(branch.clone()))?;

    let missing = missing_commits(remote.store, local.store, &tip)?;
    let copied = copy_commits(remote.store, local.store, &missing)?;

    let tracking = BranchName::tracking(remote_name, branch);
    let ref_updated = local.refs.tip(&tracking)?.as_ref() != Some(&tip);
    if ref_updated {
        local.refs.set_tip(&tracking, &tip)?;
    }

    info!(
        tracking = %tracking,
        commits = copied.commits,
        blobs = copied.blobs,
        "fetched"
    );
    Ok(FetchOutcome {
        tracking,
        tip,
        copied,
        ref_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commit::Commit;
    use crate::core::paths::RepoPaths;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    struct Side {
        _temp: TempDir,
        store: ObjectStore,
        refs: RefTable,
    }

    impl Side {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let paths = RepoPaths::new(temp.path().to_path_buf());
            paths.ensure_dirs().unwrap();
            let store = ObjectStore::new(&paths);
            let refs = RefTable::new(&paths);
            let root = store.put_commit(&Commit::root()).unwrap();
            refs.set_tip(&branch("master"), &root).unwrap();
            refs.set_head(&branch("master")).unwrap();
            Self {
                _temp: temp,
                store,
                refs,
            }
        }

        fn endpoint(&self) -> Endpoint<'_> {
            Endpoint {
                store: &self.store,
                refs: &self.refs,
            }
        }

        fn commit(&self, message: &str, parent: &ObjectId, file: &str, content: &str) -> ObjectId {
            let blob = self.store.put_blob(content.as_bytes()).unwrap();
            let mut files = BTreeMap::new();
            files.insert(file.to_string(), blob);
            self.store
                .put_commit(&Commit::new(message, Some(parent.clone()), files))
                .unwrap()
        }
    }

    fn branch(name: &str) -> BranchName {
        BranchName::new(name).unwrap()
    }

    #[test]
    fn missing_commits_are_oldest_first() {
        let local = Side::new();
        let remote = Side::new();
        let root = Commit::root().id().unwrap();
        let a = local.commit("a", &root, "f", "1");
        let b = local.commit("b", &a, "f", "2");

        assert_eq!(
            missing_commits(&local.store, &remote.store, &b).unwrap(),
            vec![a, b]
        );
    }

    #[test]
    fn missing_commits_include_second_parents() {
        let local = Side::new();
        let remote = Side::new();
        let root = Commit::root().id().unwrap();
        let main = local.commit("main", &root, "m", "m");
        let side = local.commit("side", &root, "s", "s");
        let merged = local
            .store
            .put_commit(&Commit::merge("m", main.clone(), side.clone(), BTreeMap::new()))
            .unwrap();

        let order = missing_commits(&local.store, &remote.store, &merged).unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order.last(), Some(&merged));
        assert!(order.contains(&side));
    }

    #[test]
    fn push_copies_and_advances() {
        let local = Side::new();
        let remote = Side::new();
        let root = Commit::root().id().unwrap();
        let a = local.commit("a", &root, "f", "1");

        let outcome = push(local.endpoint(), &a, remote.endpoint(), &branch("master")).unwrap();
        assert_eq!(outcome.copied, CopyStats { commits: 1, blobs: 1 });
        assert!(outcome.ref_updated);
        assert_eq!(remote.refs.tip(&branch("master")).unwrap(), Some(a.clone()));
        assert_eq!(
            remote.store.get_commit_bytes(&a).unwrap(),
            local.store.get_commit_bytes(&a).unwrap()
        );
    }

    #[test]
    fn push_rejected_when_remote_diverged() {
        let local = Side::new();
        let remote = Side::new();
        let root = Commit::root().id().unwrap();
        let theirs = remote.commit("theirs", &root, "f", "r");
        remote.refs.set_tip(&branch("master"), &theirs).unwrap();
        let ours = local.commit("ours", &root, "f", "l");

        let err = push(local.endpoint(), &ours, remote.endpoint(), &branch("master")).unwrap_err();
        assert!(matches!(err, SyncError::Rejected(_)));
        assert!(!remote.store.has_commit(&ours));
        assert_eq!(remote.refs.tip(&branch("master")).unwrap(), Some(theirs));
    }

    #[test]
    fn push_creates_missing_branch() {
        let local = Side::new();
        let remote = Side::new();
        let a = local.commit("a", &Commit::root().id().unwrap(), "f", "1");

        push(local.endpoint(), &a, remote.endpoint(), &branch("feature")).unwrap();
        assert_eq!(remote.refs.tip(&branch("feature")).unwrap(), Some(a));
        assert_eq!(remote.refs.head().unwrap(), branch("master"));
    }

    #[test]
    fn fetch_is_idempotent() {
        let local = Side::new();
        let remote = Side::new();
        let a = remote.commit("a", &Commit::root().id().unwrap(), "f", "1");
        remote.refs.set_tip(&branch("master"), &a).unwrap();
        let origin = RemoteName::new("origin").unwrap();

        let first = fetch(local.endpoint(), remote.endpoint(), &origin, &branch("master")).unwrap();
        assert_eq!(first.tracking, branch("origin/master"));
        assert!(first.ref_updated);
        assert!(!first.copied.is_empty());

        let second = fetch(local.endpoint(), remote.endpoint(), &origin, &branch("master")).unwrap();
        assert!(second.copied.is_empty());
        assert!(!second.ref_updated);
        assert_eq!(local.refs.tip(&branch("origin/master")).unwrap(), Some(a));
    }

    #[test]
    fn fetch_missing_branch() {
        let local = Side::new();
        let remote = Side::new();
        let origin = RemoteName::new("origin").unwrap();
        assert!(matches!(
            fetch(local.endpoint(), remote.endpoint(), &origin, &branch("nope")),
            Err(SyncError::MissingBranch(_))
        ));
    }
}
