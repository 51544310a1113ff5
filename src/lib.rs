//! Graftwork - a small content-addressed version-control engine
//!
//! Graftwork keeps snapshots of a working directory as immutable commits,
//! organises them into named branches, merges branches with a three-way
//! algorithm and exchanges history with other repositories on the same
//! filesystem. The `graft` binary exposes it on the command line.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, calls the session)
//! - [`core`] - Domain types, storage, history and merge operations
//! - [`ui`] - Console output and tracing setup
//!
//! # Correctness Invariants
//!
//! 1. An object's id is the sha256 of its stored bytes
//! 2. A ref never points at a commit whose parents or blobs are missing
//! 3. Refused operations leave the repository untouched

pub mod cli;
pub mod core;
pub mod ui;
