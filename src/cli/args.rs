//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//!
//! # Usage errors
//!
//! Parse failures are reported with fixed messages rather than clap's
//! usage text; see [`UsageError`].

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use thiserror::Error;

/// Graft - a small version-control system
#[derive(Parser, Debug)]
#[command(name = "graft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if graft was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Command-line misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Please enter a command.")]
    NoCommand,

    #[error("No command with that name exists.")]
    UnknownCommand,

    #[error("Incorrect operands.")]
    IncorrectOperands,
}

impl Cli {
    /// Parse the process arguments.
    ///
    /// Help and version requests print and exit, as clap normally does.
    pub fn parse_args() -> Result<Self, UsageError> {
        Self::parse_from_args(std::env::args_os())
    }

    /// Parse an explicit argument list (first item is the program name).
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        match Cli::try_parse_from(args.iter().cloned()) {
            Ok(cli) => Ok(cli),
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
                _ => Err(classify(&args)),
            },
        }
    }
}

/// Decide which usage error a failed parse represents.
///
/// The first token that is not a global flag names the command.
fn classify(args: &[OsString]) -> UsageError {
    let mut tokens = args.iter().skip(1).map(|arg| arg.to_string_lossy());
    let mut command = None;
    while let Some(token) = tokens.next() {
        match token.as_ref() {
            "--cwd" => {
                tokens.next();
            }
            "--debug" | "--quiet" | "-q" => {}
            t if t.starts_with("--cwd=") => {}
            t => {
                command = Some(t.to_string());
                break;
            }
        }
    }

    let Some(command) = command else {
        return UsageError::NoCommand;
    };
    let known = Cli::command()
        .get_subcommands()
        .any(|sub| sub.get_name() == command);
    if known {
        UsageError::IncorrectOperands
    } else {
        UsageError::UnknownCommand
    }
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create a repository in the current directory
    Init,

    /// Stage a file for the next commit
    Add {
        /// File to stage
        file: String,
    },

    /// Record the staged snapshot as a new commit
    Commit {
        /// Commit message
        message: String,
    },

    /// Unstage a file, deleting it if the current commit tracks it
    Rm {
        /// File to remove
        file: String,
    },

    /// Show the history of the current commit
    Log,

    /// Show every commit ever made
    #[command(name = "global-log")]
    GlobalLog,

    /// Print the ids of commits with the given message
    Find {
        /// Exact commit message
        message: String,
    },

    /// Show branches, staged files and working-copy changes
    Status,

    /// Restore a file or switch branches
    #[command(
        long_about = "Restore a file or switch branches.\n\n\
            With `-- <file>`, restores the file from the current commit. With \
            `<commit> -- <file>`, restores it from the given commit (an id prefix \
            is enough). With `<branch>`, switches to that branch.",
        after_help = "\
EXAMPLES:
    graft checkout -- notes.txt
    graft checkout 3f2a9c -- notes.txt
    graft checkout feature"
    )]
    Checkout {
        /// Branch name, or commit id when a file follows
        target: Option<String>,

        /// File to restore
        #[arg(last = true)]
        file: Option<String>,
    },

    /// Create a branch at the current commit
    Branch {
        /// Branch name
        name: String,
    },

    /// Delete a branch
    #[command(name = "rm-branch")]
    RmBranch {
        /// Branch name
        name: String,
    },

    /// Move the current branch to a commit and check it out
    Reset {
        /// Commit id or unique prefix
        commit: String,
    },

    /// Merge a branch into the current branch
    Merge {
        /// Branch to merge
        branch: String,
    },

    /// Register another repository as a remote
    #[command(name = "add-remote")]
    AddRemote {
        /// Remote name
        name: String,
        /// Path to the remote's .graft directory
        path: String,
    },

    /// Forget a remote
    #[command(name = "rm-remote")]
    RmRemote {
        /// Remote name
        name: String,
    },

    /// Copy the current branch's history to a remote branch
    Push {
        /// Remote name
        remote: String,
        /// Remote branch
        branch: String,
    },

    /// Copy a remote branch into the tracking branch `remote/branch`
    Fetch {
        /// Remote name
        remote: String,
        /// Remote branch
        branch: String,
    },

    /// Fetch a remote branch and merge it into the current branch
    Pull {
        /// Remote name
        remote: String,
        /// Remote branch
        branch: String,
    },
}
