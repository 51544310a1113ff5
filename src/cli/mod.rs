//! cli
//!
//! Command-line interface layer for graft.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT touch repository files directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to a
//! handler, which opens a [`crate::core::repo::Repository`] session, runs
//! one operation and formats the result.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, UsageError};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::repo::Repository;
use crate::ui::output::{self, Verbosity};

/// Execution context shared by command handlers.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// Directory the command operates on.
    pub fn work_dir(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    /// Output verbosity from the global flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Open the repository in the working directory.
    pub fn open_repo(&self) -> Result<Repository> {
        let work_dir = self.work_dir()?;
        output::debug(
            format!("opening repository in {}", work_dir.display()),
            self.verbosity(),
        );
        Ok(Repository::open(work_dir)?)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args()?;

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };
    output::init_tracing(ctx.verbosity());

    let command = cli.command.ok_or(UsageError::NoCommand)?;
    commands::dispatch(command, &ctx)
}
