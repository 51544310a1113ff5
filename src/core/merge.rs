//! core::merge
//!
//! Three-way merge classification.
//!
//! # Algorithm
//!
//! Every file named by the split commit, the current commit or the other
//! commit is classified by comparing its blob id pairwise. Two sides are
//! *consistent* when both lack the file or both hold the same id.
//!
//! | split/current | split/other | current/other | resolution      |
//! |---------------|-------------|---------------|-----------------|
//! | consistent    | consistent  | -             | keep current    |
//! | consistent    | differs     | -             | take other      |
//! | differs       | consistent  | -             | keep current    |
//! | differs       | differs     | consistent    | keep current    |
//! | differs       | differs     | differs       | conflict        |
//!
//! "Take other" deletes the file when the other side deleted it.
//!
//! This module only plans. Applying a plan (the untracked-file scan, the
//! working copy and index writes, the merge commit) belongs to the
//! repository session, which checks every path the plan touches before it
//! changes any of them.

use std::collections::{BTreeMap, BTreeSet};

use super::types::ObjectId;

/// Opening marker of a conflicted file.
pub const CONFLICT_START: &str = "<<<<<<< HEAD\n";
/// Separator between the two sides of a conflicted file.
pub const CONFLICT_SEPARATOR: &str = "=======\n";
/// Closing marker of a conflicted file.
pub const CONFLICT_END: &str = ">>>>>>>\n";

/// What the merge does with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Leave the current version in place.
    KeepCurrent,

    /// Replace the current version with the other side's blob.
    TakeOther(ObjectId),

    /// Remove the file: the other side deleted it and current left it alone.
    Delete,

    /// Both sides changed the file differently. `None` marks a deleted side.
    Conflict {
        current: Option<ObjectId>,
        other: Option<ObjectId>,
    },
}

impl Resolution {
    /// Check whether applying this resolution touches the working copy.
    pub fn touches_worktree(&self) -> bool {
        !matches!(self, Resolution::KeepCurrent)
    }
}

/// Classify a single file from its three blob ids.
pub fn classify(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    other: Option<&ObjectId>,
) -> Resolution {
    let split_current = split == current;
    let split_other = split == other;
    let current_other = current == other;

    match (split_current, split_other, current_other) {
        (true, true, _) => Resolution::KeepCurrent,
        (true, false, _) => match other {
            Some(id) => Resolution::TakeOther(id.clone()),
            None => Resolution::Delete,
        },
        (false, true, _) => Resolution::KeepCurrent,
        (false, false, true) => Resolution::KeepCurrent,
        (false, false, false) => Resolution::Conflict {
            current: current.cloned(),
            other: other.cloned(),
        },
    }
}

/// Resolutions for every file that changes, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    changes: BTreeMap<String, Resolution>,
}

impl MergePlan {
    /// Build a plan from the three file maps.
    ///
    /// Files resolved as [`Resolution::KeepCurrent`] are left out.
    pub fn new(
        split: &BTreeMap<String, ObjectId>,
        current: &BTreeMap<String, ObjectId>,
        other: &BTreeMap<String, ObjectId>,
    ) -> Self {
        let names: BTreeSet<&String> = split
            .keys()
            .chain(current.keys())
            .chain(other.keys())
            .collect();
        let changes = names
            .into_iter()
            .filter_map(|name| {
                let resolution = classify(split.get(name), current.get(name), other.get(name));
                resolution
                    .touches_worktree()
                    .then(|| (name.clone(), resolution))
            })
            .collect();
        Self { changes }
    }

    /// Files the merge writes or deletes, with their resolution.
    pub fn changes(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.changes.iter().map(|(name, r)| (name.as_str(), r))
    }

    /// Check whether any file conflicts.
    pub fn has_conflict(&self) -> bool {
        self.changes
            .values()
            .any(|r| matches!(r, Resolution::Conflict { .. }))
    }
}

/// Content written for a conflicted file.
///
/// A deleted side contributes empty content.
pub fn conflict_content(current: &[u8], other: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(current.len() + other.len() + 32);
    out.extend_from_slice(CONFLICT_START.as_bytes());
    out.extend_from_slice(current);
    out.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
    out.extend_from_slice(other);
    out.extend_from_slice(CONFLICT_END.as_bytes());
    out
}
