//! core::repo
//!
//! The repository session: every user-facing operation.
//!
//! # Session model
//!
//! A [`Repository`] is opened once per command. It owns the object store,
//! ref table, staging index, working copy and configuration for that
//! command; nothing is cached across commands. The index is loaded at open
//! time and saved explicitly after each mutation.
//!
//! # Write ordering
//!
//! Every operation that both writes objects and moves a ref does so in the
//! order blobs, commit, index, ref. A crash can leave unreferenced objects
//! behind but never a ref pointing at a commit that is missing content.
//!
//! # Errors
//!
//! [`RepoError`] variants carry the exact messages shown to users. Each
//! maps to an [`ErrorCategory`] so callers can tell misuse from a missing
//! object from a damaged repository.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use super::commit::Commit;
use super::config::{Config, ConfigError};
use super::graph::{primary_chain, split_point};
use super::index::StagingIndex;
use super::merge::{conflict_content, MergePlan, Resolution};
use super::paths::RepoPaths;
use super::refs::RefTable;
use super::remote::{resolve_location, RemoteTable};
use super::store::{ObjectStore, StoreError};
use super::sync::{self, Endpoint, FetchOutcome, PushOutcome, SyncError};
use super::types::{BranchName, FileName, ObjectId, RemoteName};
use super::worktree::WorkTree;

/// Broad classes of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Misuse: bad arguments, wrong state, refused operation.
    User,
    /// A referenced commit, file or object does not exist.
    NotFound,
    /// Stored data is unreadable or corrupt. Unrecoverable.
    Invariant,
}

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not in an initialized graft directory.")]
    NotInitialized,

    #[error("A graft version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("File does not exist.")]
    FileNotFound,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("No reason to remove the file.")]
    NothingToRemove,

    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    #[error("No commit with that id exists.")]
    NoSuchCommit,

    #[error("Ambiguous commit id prefix.")]
    AmbiguousCommit,

    #[error("File does not exist in that commit.")]
    FileNotInCommit,

    #[error("No such branch exists.")]
    NoSuchBranch,

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedInTheWay,

    #[error("A branch with that name already exists.")]
    BranchExists,

    #[error("Invalid branch name.")]
    InvalidBranchName,

    #[error("A branch with that name does not exist.")]
    BranchNotFound,

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("A remote with that name already exists.")]
    RemoteExists,

    #[error("Invalid remote name.")]
    InvalidRemoteName,

    #[error("A remote with that name does not exist.")]
    RemoteNotFound,

    #[error("Remote directory not found.")]
    RemoteDirMissing,

    #[error("Please pull down remote changes before pushing.")]
    PushRejected,

    #[error("That remote does not have that branch.")]
    RemoteBranchMissing,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RepoError {
    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RepoError::NoCommitWithMessage
            | RepoError::NoSuchCommit
            | RepoError::AmbiguousCommit
            | RepoError::FileNotInCommit
            | RepoError::Store(StoreError::NotFound { .. })
            | RepoError::Store(StoreError::AmbiguousPrefix(_)) => ErrorCategory::NotFound,
            RepoError::Store(_) => ErrorCategory::Invariant,
            _ => ErrorCategory::User,
        }
    }
}

impl From<SyncError> for RepoError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Rejected(_) => RepoError::PushRejected,
            SyncError::MissingBranch(_) => RepoError::RemoteBranchMissing,
            SyncError::Store(e) => RepoError::Store(e),
        }
    }
}

/// One commit in a history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: ObjectId,
    pub commit: Commit,
}

/// How a tracked file differs from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationKind {
    Modified,
    Deleted,
}

impl std::fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModificationKind::Modified => write!(f, "modified"),
            ModificationKind::Deleted => write!(f, "deleted"),
        }
    }
}

/// A working-copy change that is not staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub name: String,
    pub kind: ModificationKind,
}

/// Snapshot of repository state for `status`.
///
/// Every list is sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub current_branch: BranchName,
    pub branches: Vec<BranchName>,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<Modification>,
    pub untracked: Vec<String>,
}

/// Result of a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The given branch is already contained in the current branch.
    AlreadyAncestor,

    /// The current branch moved to the given branch's tip.
    FastForward { to: ObjectId },

    /// A merge commit was created. `conflict` is set when any file was
    /// written with conflict markers.
    Merged { commit: ObjectId, conflict: bool },
}

/// Result of a pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullOutcome {
    pub fetch: FetchOutcome,
    pub merge: MergeOutcome,
}

/// An open repository.
#[derive(Debug)]
pub struct Repository {
    paths: RepoPaths,
    store: ObjectStore,
    refs: RefTable,
    index: StagingIndex,
    worktree: WorkTree,
    config: Config,
}

impl Repository {
    // =========================================================================
    // Session
    // =========================================================================

    /// Create a repository in `work_dir` using the global configuration.
    pub fn init(work_dir: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let config = Config::load(None)?;
        Self::init_with_config(work_dir, config)
    }

    /// Create a repository in `work_dir`.
    ///
    /// Stores the root commit, points the default branch at it and makes
    /// that branch current.
    ///
    /// # Errors
    ///
    /// [`RepoError::AlreadyInitialized`] if a repository already exists.
    pub fn init_with_config(work_dir: impl Into<PathBuf>, config: Config) -> Result<Self, RepoError> {
        let paths = RepoPaths::new(work_dir.into());
        if paths.is_initialized() {
            return Err(RepoError::AlreadyInitialized);
        }
        paths.ensure_dirs().map_err(StoreError::io(&paths.repo_dir))?;

        let branch = BranchName::local(config.default_branch())
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let store = ObjectStore::new(&paths);
        let refs = RefTable::new(&paths);
        let root = Commit::root();
        let root_id = store.put_commit(&root)?;

        let mut index = StagingIndex::load(&paths)?;
        index.reset_to(&root);
        index.save()?;

        refs.set_tip(&branch, &root_id)?;
        refs.set_head(&branch)?;
        info!(path = %paths.work_dir.display(), branch = %branch, "initialized repository");

        Ok(Self {
            worktree: WorkTree::new(paths.work_dir.clone()),
            paths,
            store,
            refs,
            index,
            config,
        })
    }

    /// Open the repository in `work_dir`.
    ///
    /// # Errors
    ///
    /// [`RepoError::NotInitialized`] if `work_dir` has no repository.
    pub fn open(work_dir: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let paths = RepoPaths::new(work_dir.into());
        if !paths.is_initialized() {
            return Err(RepoError::NotInitialized);
        }
        let config = Config::load(Some(&paths))?;
        let index = StagingIndex::load(&paths)?;
        debug!(path = %paths.work_dir.display(), "opened repository");

        Ok(Self {
            store: ObjectStore::new(&paths),
            refs: RefTable::new(&paths),
            worktree: WorkTree::new(paths.work_dir.clone()),
            paths,
            index,
            config,
        })
    }

    /// Repository paths.
    pub fn paths(&self) -> &RepoPaths {
        &self.paths
    }

    /// Object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Ref table.
    pub fn refs(&self) -> &RefTable {
        &self.refs
    }

    /// Staging index.
    pub fn index(&self) -> &StagingIndex {
        &self.index
    }

    /// Effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the current branch.
    pub fn current_branch(&self) -> Result<BranchName, RepoError> {
        Ok(self.refs.head()?)
    }

    /// Id of the current commit.
    pub fn head_id(&self) -> Result<ObjectId, RepoError> {
        Ok(self.refs.head_commit()?)
    }

    /// The current commit.
    pub fn head_commit(&self) -> Result<Commit, RepoError> {
        Ok(self.store.get_commit(&self.head_id()?)?)
    }

    /// Resolve a full or abbreviated commit id.
    pub fn resolve_commit(&self, prefix: &str) -> Result<ObjectId, RepoError> {
        self.store
            .resolve_commit_prefix(prefix)
            .map_err(|e| match e {
                StoreError::NotFound { .. } => RepoError::NoSuchCommit,
                StoreError::AmbiguousPrefix(_) => RepoError::AmbiguousCommit,
                other => RepoError::Store(other),
            })
    }

    // =========================================================================
    // Staging and committing
    // =========================================================================

    /// Stage a working file. Returns `false` if it was already staged as is.
    pub fn add(&mut self, name: &str) -> Result<bool, RepoError> {
        FileName::new(name).map_err(|_| RepoError::FileNotFound)?;
        let content = self.worktree.read(name)?.ok_or(RepoError::FileNotFound)?;
        let changed = self.index.stage(name, content);
        if changed {
            self.index.save()?;
        }
        Ok(changed)
    }

    /// Commit the index on the current branch.
    pub fn commit(&mut self, message: &str) -> Result<ObjectId, RepoError> {
        if message.is_empty() {
            return Err(RepoError::EmptyMessage);
        }
        let branch = self.current_branch()?;
        let head_id = self.head_id()?;
        let head = self.store.get_commit(&head_id)?;
        if self.index.matches(&head) {
            return Err(RepoError::NothingToCommit);
        }

        let id = self
            .index
            .build_next_commit(&self.store, message, head_id, None)?;
        self.refs.set_tip(&branch, &id)?;
        info!(branch = %branch, commit = %id.short(12), "committed");
        Ok(id)
    }

    /// Unstage a file, deleting it from the working copy if HEAD tracks it.
    pub fn rm(&mut self, name: &str) -> Result<(), RepoError> {
        FileName::new(name).map_err(|_| RepoError::NothingToRemove)?;
        let head = self.head_commit()?;
        let tracked = head.tracks(name);
        if !tracked && !self.index.contains(name) {
            return Err(RepoError::NothingToRemove);
        }

        self.index.unstage(name);
        self.index.save()?;
        if tracked {
            self.worktree.remove(name)?;
        }
        Ok(())
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Primary-parent history of the current commit, newest first.
    pub fn log(&self) -> Result<Vec<LogEntry>, RepoError> {
        primary_chain(&self.store, self.head_id()?)
            .map(|item| {
                let (id, commit) = item?;
                Ok(LogEntry { id, commit })
            })
            .collect()
    }

    /// Every stored commit, ordered by id.
    pub fn global_log(&self) -> Result<Vec<LogEntry>, RepoError> {
        self.store
            .commit_ids()?
            .into_iter()
            .map(|id| {
                let commit = self.store.get_commit(&id)?;
                Ok(LogEntry { id, commit })
            })
            .collect()
    }

    /// Ids of every commit with exactly this message, ordered by id.
    pub fn find(&self, message: &str) -> Result<Vec<ObjectId>, RepoError> {
        let found: Vec<ObjectId> = self
            .global_log()?
            .into_iter()
            .filter(|entry| entry.commit.message == message)
            .map(|entry| entry.id)
            .collect();
        if found.is_empty() {
            return Err(RepoError::NoCommitWithMessage);
        }
        Ok(found)
    }

    /// Branches, staged changes and working-copy changes.
    pub fn status(&self) -> Result<StatusReport, RepoError> {
        let current_branch = self.current_branch()?;
        let head = self.head_commit()?;
        let diff = self.index.diff_against(&head);

        let mut modified = Vec::new();
        for (name, staged_id) in self.index.entries() {
            let kind = match self.worktree.hash(name)? {
                None => Some(ModificationKind::Deleted),
                Some(working) if &working != staged_id => Some(ModificationKind::Modified),
                Some(_) => None,
            };
            if let Some(kind) = kind {
                modified.push(Modification {
                    name: name.clone(),
                    kind,
                });
            }
        }

        let untracked = self
            .worktree
            .list_files()?
            .into_iter()
            .filter(|name| !self.index.contains(name) && !head.tracks(name))
            .collect();

        Ok(StatusReport {
            current_branch,
            branches: self.refs.list()?,
            staged: diff.added,
            removed: diff.removed,
            modified,
            untracked,
        })
    }

    // =========================================================================
    // Checkout and branches
    // =========================================================================

    /// Restore one file from a commit (HEAD when `commit` is `None`).
    ///
    /// Refs, the index and the staged cache are not touched.
    pub fn checkout_file(&self, commit: Option<&str>, name: &str) -> Result<(), RepoError> {
        let id = match commit {
            Some(prefix) => self.resolve_commit(prefix)?,
            None => self.head_id()?,
        };
        let commit = self.store.get_commit(&id)?;
        FileName::new(name).map_err(|_| RepoError::FileNotInCommit)?;
        let blob = commit.blob(name).ok_or(RepoError::FileNotInCommit)?;
        let content = self.store.get_blob(blob)?;
        self.worktree.write(name, &content)?;
        debug!(file = name, commit = %id.short(12), "restored file");
        Ok(())
    }

    /// Switch to another branch.
    pub fn checkout_branch(&mut self, name: &str) -> Result<(), RepoError> {
        let branch = BranchName::new(name).map_err(|_| RepoError::NoSuchBranch)?;
        let target_id = self.refs.tip(&branch)?.ok_or(RepoError::NoSuchBranch)?;
        if branch == self.current_branch()? {
            return Err(RepoError::AlreadyOnBranch);
        }

        let target = self.store.get_commit(&target_id)?;
        self.switch_to(&target)?;
        self.refs.set_head(&branch)?;
        info!(branch = %branch, "switched branch");
        Ok(())
    }

    /// Move the current branch to an arbitrary commit.
    pub fn reset(&mut self, prefix: &str) -> Result<ObjectId, RepoError> {
        let id = self.resolve_commit(prefix)?;
        let target = self.store.get_commit(&id)?;
        self.switch_to(&target)?;
        let branch = self.current_branch()?;
        self.refs.set_tip(&branch, &id)?;
        info!(branch = %branch, commit = %id.short(12), "reset");
        Ok(id)
    }

    /// Create a branch at the current commit.
    ///
    /// The name must be a single component that no remote or tracking ref
    /// namespace already claims.
    pub fn create_branch(&self, name: &str) -> Result<BranchName, RepoError> {
        let branch = BranchName::local(name).map_err(|_| RepoError::InvalidBranchName)?;
        if self.refs.exists(&branch) {
            return Err(RepoError::BranchExists);
        }
        if self.refs.is_namespace(&branch) || self.is_remote(branch.as_str())? {
            return Err(RepoError::InvalidBranchName);
        }
        self.refs.set_tip(&branch, &self.head_id()?)?;
        info!(branch = %branch, "created branch");
        Ok(branch)
    }

    /// Delete a branch other than the current one.
    pub fn delete_branch(&self, name: &str) -> Result<(), RepoError> {
        let branch = BranchName::new(name).map_err(|_| RepoError::BranchNotFound)?;
        if !self.refs.exists(&branch) {
            return Err(RepoError::BranchNotFound);
        }
        if branch == self.current_branch()? {
            return Err(RepoError::RemoveCurrentBranch);
        }
        self.refs.delete(&branch)?;
        info!(branch = %branch, "deleted branch");
        Ok(())
    }

    /// Rewrite the working copy and index to `target`'s snapshot.
    ///
    /// Fails before touching anything if an untracked working file would be
    /// overwritten. Files the current commit tracks and `target` does not are
    /// deleted. The caller moves refs afterwards.
    fn switch_to(&mut self, target: &Commit) -> Result<(), RepoError> {
        let current = self.head_commit()?;
        self.check_untracked(&current, target.files.keys().map(String::as_str))?;

        for name in current.files.keys() {
            if !target.tracks(name) {
                self.worktree.remove(name)?;
            }
        }
        for (name, blob) in &target.files {
            if self.worktree.hash(name)?.as_ref() != Some(blob) {
                self.worktree.write(name, &self.store.get_blob(blob)?)?;
            }
        }

        self.index.reset_to(target);
        self.index.save()?;
        Ok(())
    }

    fn check_untracked<'a>(
        &self,
        current: &Commit,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), RepoError> {
        for name in names {
            self.worktree.check_name(name)?;
            if !current.tracks(name) && self.worktree.exists(name) {
                debug!(file = name, "untracked file in the way");
                return Err(RepoError::UntrackedInTheWay);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Merge
    // =========================================================================

    /// Merge a branch into the current branch.
    ///
    /// The untracked-file check covers every file the merge would write or
    /// delete and runs before any of them changes, so a refused merge leaves
    /// the repository untouched.
    pub fn merge(&mut self, name: &str) -> Result<MergeOutcome, RepoError> {
        let current_branch = self.current_branch()?;
        let head_id = self.head_id()?;
        let head = self.store.get_commit(&head_id)?;
        if !self.index.matches(&head) {
            return Err(RepoError::UncommittedChanges);
        }

        let other_branch = BranchName::new(name).map_err(|_| RepoError::BranchNotFound)?;
        let other_id = self
            .refs
            .tip(&other_branch)?
            .ok_or(RepoError::BranchNotFound)?;
        if other_branch == current_branch {
            return Err(RepoError::MergeWithSelf);
        }

        let split = split_point(&self.store, &head_id, &other_id)?;
        if split.as_ref() == Some(&other_id) {
            return Ok(MergeOutcome::AlreadyAncestor);
        }
        let other = self.store.get_commit(&other_id)?;
        if split.as_ref() == Some(&head_id) {
            self.switch_to(&other)?;
            self.refs.set_tip(&current_branch, &other_id)?;
            info!(branch = %current_branch, to = %other_id.short(12), "fast-forwarded");
            return Ok(MergeOutcome::FastForward { to: other_id });
        }

        let split_files = match &split {
            Some(id) => self.store.get_commit(id)?.files,
            None => BTreeMap::new(),
        };
        let plan = MergePlan::new(&split_files, &head.files, &other.files);

        self.check_untracked(&head, plan.changes().map(|(name, _)| name))?;
        self.apply_plan(&plan)?;

        let message = format!("Merged {} into {}.", other_branch, current_branch);
        let commit = self
            .index
            .build_next_commit(&self.store, &message, head_id, Some(other_id))?;
        self.refs.set_tip(&current_branch, &commit)?;

        let conflict = plan.has_conflict();
        info!(
            branch = %current_branch,
            other = %other_branch,
            commit = %commit.short(12),
            conflict,
            "merged"
        );
        Ok(MergeOutcome::Merged { commit, conflict })
    }

    fn apply_plan(&mut self, plan: &MergePlan) -> Result<(), RepoError> {
        for (name, resolution) in plan.changes() {
            debug!(file = name, ?resolution, "merge resolution");
            match resolution {
                Resolution::KeepCurrent => {}
                Resolution::TakeOther(blob) => {
                    let content = self.store.get_blob(blob)?;
                    self.worktree.write(name, &content)?;
                    self.index.stage(name, content);
                }
                Resolution::Delete => {
                    self.worktree.remove(name)?;
                    self.index.unstage(name);
                }
                Resolution::Conflict { current, other } => {
                    let content = conflict_content(
                        &self.blob_or_empty(current.as_ref())?,
                        &self.blob_or_empty(other.as_ref())?,
                    );
                    self.worktree.write(name, &content)?;
                    self.index.stage(name, content);
                }
            }
        }
        self.index.save()?;
        Ok(())
    }

    fn blob_or_empty(&self, id: Option<&ObjectId>) -> Result<Vec<u8>, RepoError> {
        match id {
            Some(id) => Ok(self.store.get_blob(id)?),
            None => Ok(Vec::new()),
        }
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    /// Register a remote repository directory.
    pub fn add_remote(&self, name: &str, location: &str) -> Result<(), RepoError> {
        let remote = RemoteName::new(name).map_err(|_| RepoError::InvalidRemoteName)?;
        let shadowed = BranchName::new(remote.as_str()).map_or(false, |b| self.refs.exists(&b));
        if shadowed {
            return Err(RepoError::InvalidRemoteName);
        }
        let mut table = RemoteTable::load(&self.paths)?;
        if !table.add(remote.clone(), location) {
            return Err(RepoError::RemoteExists);
        }
        table.save()?;
        info!(remote = %remote, location, "added remote");
        Ok(())
    }

    /// Forget a remote. Its tracking refs are kept.
    pub fn rm_remote(&self, name: &str) -> Result<(), RepoError> {
        let remote = RemoteName::new(name).map_err(|_| RepoError::RemoteNotFound)?;
        let mut table = RemoteTable::load(&self.paths)?;
        if !table.remove(&remote) {
            return Err(RepoError::RemoteNotFound);
        }
        table.save()?;
        info!(remote = %remote, "removed remote");
        Ok(())
    }

    fn is_remote(&self, name: &str) -> Result<bool, RepoError> {
        let Ok(remote) = RemoteName::new(name) else {
            return Ok(false);
        };
        Ok(RemoteTable::load(&self.paths)?.location(&remote).is_some())
    }

    fn open_remote(&self, name: &str) -> Result<(RemoteName, RepoPaths), RepoError> {
        let remote = RemoteName::new(name).map_err(|_| RepoError::RemoteNotFound)?;
        let table = RemoteTable::load(&self.paths)?;
        let location = table.location(&remote).ok_or(RepoError::RemoteNotFound)?;
        let repo_dir = resolve_location(&self.paths.work_dir, location);
        if !repo_dir.is_dir() {
            return Err(RepoError::RemoteDirMissing);
        }
        Ok((remote, RepoPaths::from_repo_dir(repo_dir)))
    }

    /// Push the current commit to `branch` on a remote.
    pub fn push(&self, remote: &str, branch: &str) -> Result<PushOutcome, RepoError> {
        let (_, remote_paths) = self.open_remote(remote)?;
        let branch = BranchName::local(branch).map_err(|_| RepoError::InvalidBranchName)?;
        let remote_store = ObjectStore::new(&remote_paths);
        let remote_refs = RefTable::new(&remote_paths);

        let outcome = sync::push(
            self.endpoint(),
            &self.head_id()?,
            Endpoint {
                store: &remote_store,
                refs: &remote_refs,
            },
            &branch,
        )?;
        Ok(outcome)
    }

    /// Fetch `branch` from a remote into the tracking ref `remote/branch`.
    pub fn fetch(&self, remote: &str, branch: &str) -> Result<FetchOutcome, RepoError> {
        let (remote_name, remote_paths) = self.open_remote(remote)?;
        let branch = BranchName::local(branch).map_err(|_| RepoError::RemoteBranchMissing)?;
        let remote_store = ObjectStore::new(&remote_paths);
        let remote_refs = RefTable::new(&remote_paths);

        let outcome = sync::fetch(
            self.endpoint(),
            Endpoint {
                store: &remote_store,
                refs: &remote_refs,
            },
            &remote_name,
            &branch,
        )?;
        Ok(outcome)
    }

    /// Fetch, then merge the tracking ref into the current branch.
    pub fn pull(&mut self, remote: &str, branch: &str) -> Result<PullOutcome, RepoError> {
        let fetch = self.fetch(remote, branch)?;
        let merge = self.merge(fetch.tracking.as_str())?;
        Ok(PullOutcome { fetch, merge })
    }

    fn endpoint(&self) -> Endpoint<'_> {
        Endpoint {
            store: &self.store,
            refs: &self.refs,
        }
    }
}
