//! core::graph
//!
//! Commit graph navigation.
//!
//! # Architecture
//!
//! The history is a DAG where:
//! - Nodes are commits
//! - Edges point from child to parent (primary parent, plus a second parent
//!   on merge commits)
//! - Every repository shares one root commit
//!
//! The graph is never materialized up front. Traversals pull commits on
//! demand from a [`CommitSource`], which lets the same code run against the
//! on-disk store or an in-memory fixture.
//!
//! # Invariants
//!
//! - Traversals use explicit queues, never recursion, so history depth is
//!   bounded only by memory
//! - Every traversal that reaches a merge follows both parents
//! - [`split_point`] is deterministic: equal-cost candidates are ordered by id

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use super::commit::Commit;
use super::store::{ObjectStore, StoreError};
use super::types::ObjectId;

/// Anything commits can be loaded from.
pub trait CommitSource {
    /// Load the commit with the given id.
    fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError>;
}

impl CommitSource for ObjectStore {
    fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError> {
        self.get_commit(id)
    }
}

/// Lazy walk along primary-parent edges, from a commit back to the root.
///
/// Created by [`primary_chain`]. Yields each commit with its id. A load
/// failure is yielded once and ends the walk.
pub struct PrimaryChain<'a, S: CommitSource + ?Sized> {
    source: &'a S,
    next: Option<ObjectId>,
}

impl<S: CommitSource + ?Sized> Iterator for PrimaryChain<'_, S> {
    type Item = Result<(ObjectId, Commit), StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.source.load_commit(&id) {
            Ok(commit) => {
                self.next = commit.parent.clone();
                Some(Ok((id, commit)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Walk the primary-parent chain starting at `start`.
///
/// Used for linear history display. Second parents are not followed.
pub fn primary_chain<S: CommitSource + ?Sized>(source: &S, start: ObjectId) -> PrimaryChain<'_, S> {
    PrimaryChain {
        source,
        next: Some(start),
    }
}

/// Result of a breadth-first walk over both parent edges.
struct Walk {
    depths: HashMap<ObjectId, usize>,
    parents: HashMap<ObjectId, Vec<ObjectId>>,
}

fn walk<S: CommitSource + ?Sized>(source: &S, start: &ObjectId) -> Result<Walk, StoreError> {
    let mut depths = HashMap::new();
    let mut parents = HashMap::new();
    let mut queue = VecDeque::new();

    depths.insert(start.clone(), 0);
    queue.push_back((start.clone(), 0usize));

    while let Some((id, depth)) = queue.pop_front() {
        let commit = source.load_commit(&id)?;
        let edges: Vec<ObjectId> = commit.parents().cloned().collect();
        for parent in &edges {
            if !depths.contains_key(parent) {
                depths.insert(parent.clone(), depth + 1);
                queue.push_back((parent.clone(), depth + 1));
            }
        }
        parents.insert(id, edges);
    }

    Ok(Walk { depths, parents })
}

/// Every commit reachable from `start` through either parent edge.
///
/// The result maps each ancestor to its BFS depth (shortest edge count from
/// `start`). `start` itself is included at depth 0.
pub fn all_ancestors<S: CommitSource + ?Sized>(
    source: &S,
    start: &ObjectId,
) -> Result<HashMap<ObjectId, usize>, StoreError> {
    Ok(walk(source, start)?.depths)
}

/// Check whether `ancestor` is reachable from `descendant` (or equal to it).
pub fn is_ancestor<S: CommitSource + ?Sized>(
    source: &S,
    ancestor: &ObjectId,
    descendant: &ObjectId,
) -> Result<bool, StoreError> {
    Ok(all_ancestors(source, descendant)?.contains_key(ancestor))
}

/// The lowest common ancestor of two commits.
///
/// Candidates are the common ancestors that are not a parent of another
/// common ancestor. Among them the one with the smallest combined BFS depth
/// from `a` and `b` wins; remaining ties go to the smallest id.
///
/// Returns `None` only when the two histories share no commit.
///
/// # Example
///
/// ```
/// use graftwork::core::graph::split_point;
/// # use graftwork::core::graph::CommitSource;
/// # use graftwork::core::commit::Commit;
/// # use graftwork::core::store::StoreError;
/// # use graftwork::core::types::ObjectId;
/// # use std::collections::HashMap;
/// # struct Mem(HashMap<ObjectId, Commit>);
/// # impl CommitSource for Mem {
/// #     fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError> {
/// #         Ok(self.0[id].clone())
/// #     }
/// # }
/// # let root = Commit::root();
/// # let root_id = root.id().unwrap();
/// # let mut mem = Mem(HashMap::new());
/// # mem.0.insert(root_id.clone(), root);
/// let split = split_point(&mem, &root_id, &root_id).unwrap();
/// assert_eq!(split, Some(root_id));
/// ```
pub fn split_point<S: CommitSource + ?Sized>(
    source: &S,
    a: &ObjectId,
    b: &ObjectId,
) -> Result<Option<ObjectId>, StoreError> {
    if a == b {
        return Ok(Some(a.clone()));
    }

    let from_a = walk(source, a)?;
    let from_b = walk(source, b)?;

    let common: HashSet<&ObjectId> = from_a
        .depths
        .keys()
        .filter(|id| from_b.depths.contains_key(*id))
        .collect();

    // A common ancestor that is the parent of another common ancestor
    // cannot be lowest.
    let superseded: HashSet<&ObjectId> = common
        .iter()
        .filter_map(|id| from_a.parents.get(*id))
        .flatten()
        .collect();

    let best = common
        .iter()
        .filter(|id| !superseded.contains(*id))
        .map(|id| (from_a.depths[*id] + from_b.depths[*id], *id))
        .min()
        .map(|(_, id)| id.clone());

    if let Some(split) = &best {
        debug!(a = %a.short(12), b = %b.short(12), split = %split.short(12), "split point");
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::ObjectKind;
    use std::collections::BTreeMap;

    /// In-memory commit source for graph tests.
    #[derive(Default)]
    struct MemorySource {
        commits: HashMap<ObjectId, Commit>,
    }

    impl MemorySource {
        fn root(&mut self) -> ObjectId {
            self.insert(Commit::root())
        }

        fn child(&mut self, message: &str, parent: &ObjectId) -> ObjectId {
            self.insert(Commit::new(message, Some(parent.clone()), BTreeMap::new()))
        }

        fn merge(&mut self, message: &str, first: &ObjectId, second: &ObjectId) -> ObjectId {
            self.insert(Commit::merge(
                message,
                first.clone(),
                second.clone(),
                BTreeMap::new(),
            ))
        }

        fn insert(&mut self, commit: Commit) -> ObjectId {
            let id = commit.id().unwrap();
            self.commits.insert(id.clone(), commit);
            id
        }
    }

    impl CommitSource for MemorySource {
        fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError> {
            self.commits.get(id).cloned().ok_or_else(|| StoreError::NotFound {
                kind: ObjectKind::Commit,
                id: id.to_string(),
            })
        }
    }

    #[test]
    fn primary_chain_walks_to_root() {
        let mut g = MemorySource::default();
        let root = g.root();
        let a = g.child("a", &root);
        let b = g.child("b", &a);

        let ids: Vec<ObjectId> = primary_chain(&g, b.clone())
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(ids, vec![b, a, root]);
    }

    #[test]
    fn primary_chain_skips_second_parent() {
        let mut g = MemorySource::default();
        let root = g.root();
        let main = g.child("main", &root);
        let side = g.child("side", &root);
        let m = g.merge("m", &main, &side);

        let ids: Vec<ObjectId> = primary_chain(&g, m.clone())
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(ids, vec![m, main, root]);
    }

    #[test]
    fn primary_chain_reports_missing_commit_once() {
        let g = MemorySource::default();
        let mut chain = primary_chain(&g, ObjectId::hash_of(b"nope"));
        assert!(chain.next().unwrap().is_err());
        assert!(chain.next().is_none());
    }

    #[test]
    fn all_ancestors_follows_both_parents() {
        let mut g = MemorySource::default();
        let root = g.root();
        let main = g.child("main", &root);
        let side = g.child("side", &root);
        let m = g.merge("m", &main, &side);

        let ancestors = all_ancestors(&g, &m).unwrap();
        assert_eq!(ancestors.len(), 4);
        assert_eq!(ancestors[&m], 0);
        assert_eq!(ancestors[&side], 1);
        assert_eq!(ancestors[&root], 2);
    }

    #[test]
    fn is_ancestor_is_reflexive() {
        let mut g = MemorySource::default();
        let root = g.root();
        let a = g.child("a", &root);
        assert!(is_ancestor(&g, &a, &a).unwrap());
        assert!(is_ancestor(&g, &root, &a).unwrap());
        assert!(!is_ancestor(&g, &a, &root).unwrap());
    }

    #[test]
    fn split_of_linear_history_is_older_commit() {
        let mut g = MemorySource::default();
        let root = g.root();
        let a = g.child("a", &root);
        let b = g.child("b", &a);

        assert_eq!(split_point(&g, &a, &b).unwrap(), Some(a.clone()));
        assert_eq!(split_point(&g, &b, &a).unwrap(), Some(a));
    }

    #[test]
    fn split_of_fork_is_fork_point() {
        // A -> B -> C, B -> D -> E, M = merge(C, E)
        let mut g = MemorySource::default();
        let a = g.root();
        let b = g.child("B", &a);
        let c = g.child("C", &b);
        let d = g.child("D", &b);
        let e = g.child("E", &d);
        let m = g.merge("M", &c, &e);

        assert_eq!(split_point(&g, &c, &e).unwrap(), Some(b));
        assert_eq!(split_point(&g, &m, &e).unwrap(), Some(e.clone()));
        assert_eq!(split_point(&g, &e, &m).unwrap(), Some(e));
    }

    #[test]
    fn split_sees_through_merged_second_parent() {
        // master: root -> m1 -> merge(m1, f2) -> m3
        // feature: root -> f1 -> f2 -> f3
        // A primary-chain walk from m3 never reaches f2.
        let mut g = MemorySource::default();
        let root = g.root();
        let m1 = g.child("m1", &root);
        let f1 = g.child("f1", &root);
        let f2 = g.child("f2", &f1);
        let f3 = g.child("f3", &f2);
        let merged = g.merge("merged", &m1, &f2);
        let m3 = g.child("m3", &merged);

        assert_eq!(split_point(&g, &m3, &f3).unwrap(), Some(f2));
    }

    #[test]
    fn criss_cross_tie_breaks_by_smallest_id() {
        // Two LCAs at equal combined depth.
        let mut g = MemorySource::default();
        let root = g.root();
        let x = g.child("x", &root);
        let y = g.child("y", &root);
        let left = g.merge("left", &x, &y);
        let right = g.merge("right", &y, &x);

        let expected = std::cmp::min(x.clone(), y.clone());
        assert_eq!(split_point(&g, &left, &right).unwrap(), Some(expected.clone()));
        assert_eq!(split_point(&g, &right, &left).unwrap(), Some(expected));
    }

    #[test]
    fn split_of_same_commit_is_itself() {
        let mut g = MemorySource::default();
        let root = g.root();
        let a = g.child("a", &root);
        assert_eq!(split_point(&g, &a, &a).unwrap(), Some(a));
    }

    #[test]
    fn unrelated_histories_have_no_split() {
        let mut g = MemorySource::default();
        let one = g.insert(Commit::new("one", None, BTreeMap::new()));
        let two = g.insert(Commit::new("two", None, BTreeMap::new()));
        assert_eq!(split_point(&g, &one, &two).unwrap(), None);
    }
}
