//! core
//!
//! Domain types, storage and history operations for graft.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ObjectId, BranchName, RemoteName, UtcTimestamp
//! - [`paths`] - Centralized path routing for `.graft/` storage
//! - [`config`] - Configuration schema and loading
//! - [`store`] - Content-addressed blob and commit storage
//! - [`commit`] - Commit snapshots and their canonical encoding
//! - [`refs`] - Branch tips and HEAD
//! - [`index`] - Staging index and staged blob cache
//! - [`worktree`] - Working-copy file access
//! - [`graph`] - Commit graph traversal and split points
//! - [`merge`] - Three-way merge classification
//! - [`remote`] - Remote table
//! - [`sync`] - Push and fetch between local stores
//! - [`repo`] - Repository session and user-facing operations
//!
//! # Design Principles
//!
//! - Objects are immutable and addressed by the sha256 of their bytes
//! - Refs move only after everything they point at is on disk
//! - Metadata writes are atomic

pub mod commit;
pub mod config;
pub mod graph;
pub mod index;
pub mod merge;
pub mod paths;
pub mod refs;
pub mod remote;
pub mod repo;
pub mod store;
pub mod sync;
pub mod types;
pub mod worktree;
