//! core::paths
//!
//! Centralized path routing for repository storage.
//!
//! # Storage Layout
//!
//! All repository data is stored under `<work_dir>/.graft/`:
//! - `commits/` - Commit records keyed by id
//! - `objects/` - Blob contents keyed by id
//! - `branches/` - One file per branch holding a commit id; tracking refs
//!   nest as `branches/<remote>/<branch>`
//! - `HEAD` - Name of the current branch
//! - `index` - Staging index (file name -> blob id)
//! - `staged-files` - Staged blob contents not yet in `objects/`
//! - `remote` - Remote table (remote name -> location)
//! - `config.toml` - Repository configuration
//!
//! **Hard rule:** No code outside this module computes `.join(".graft")`
//! paths. Everything goes through [`RepoPaths`].
//!
//! # Example
//!
//! ```
//! use graftwork::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/work"));
//! assert_eq!(paths.head_path(), PathBuf::from("/work/.graft/HEAD"));
//! ```

use std::path::{Path, PathBuf};

/// Name of the repository directory inside the working directory.
pub const REPO_DIR_NAME: &str = ".graft";

/// Centralized path routing for repository storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    /// The working directory whose files are versioned.
    pub work_dir: PathBuf,

    /// The repository directory (`<work_dir>/.graft`).
    pub repo_dir: PathBuf,
}

impl RepoPaths {
    /// Create paths for a working directory.
    pub fn new(work_dir: PathBuf) -> Self {
        let repo_dir = work_dir.join(REPO_DIR_NAME);
        Self { work_dir, repo_dir }
    }

    /// Create paths for a bare repository directory.
    ///
    /// Used for remotes, whose location names the `.graft` directory itself.
    /// The working directory is taken to be its parent.
    pub fn from_repo_dir(repo_dir: PathBuf) -> Self {
        let work_dir = repo_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| repo_dir.clone());
        Self { work_dir, repo_dir }
    }

    /// Check whether the repository directory exists.
    pub fn is_initialized(&self) -> bool {
        self.repo_dir.is_dir()
    }

    // =========================================================================
    // Object storage
    // =========================================================================

    /// Directory holding commit records.
    pub fn commits_dir(&self) -> PathBuf {
        self.repo_dir.join("commits")
    }

    /// Directory holding blob contents.
    pub fn objects_dir(&self) -> PathBuf {
        self.repo_dir.join("objects")
    }

    // =========================================================================
    // Refs and session state
    // =========================================================================

    /// Directory holding branch refs.
    pub fn branches_dir(&self) -> PathBuf {
        self.repo_dir.join("branches")
    }

    /// Path to the HEAD file.
    pub fn head_path(&self) -> PathBuf {
        self.repo_dir.join("HEAD")
    }

    /// Path to the staging index.
    pub fn index_path(&self) -> PathBuf {
        self.repo_dir.join("index")
    }

    /// Path to the staged blob cache.
    pub fn staged_path(&self) -> PathBuf {
        self.repo_dir.join("staged-files")
    }

    /// Path to the remote table.
    pub fn remotes_path(&self) -> PathBuf {
        self.repo_dir.join("remote")
    }

    /// Path to the repository configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.repo_dir.join("config.toml")
    }

    /// Create the directory structure.
    ///
    /// # Errors
    ///
    /// Returns an IO error if directory creation fails.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.commits_dir())?;
        std::fs::create_dir_all(self.objects_dir())?;
        std::fs::create_dir_all(self.branches_dir())?;
        Ok(())
    }
}
