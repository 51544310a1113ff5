//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens a repository session (except `init`)
//! 2. Runs one [`crate::core::repo::Repository`] operation
//! 3. Formats and displays the result
//!
//! Failures propagate as `anyhow` errors wrapping the core error, so
//! `main` can still tell user mistakes from repository damage.

mod branch;
mod checkout;
mod commit;
mod init;
mod log_cmd;
mod merge;
mod remote;
mod stage;
mod status;

// Re-export command functions for testing and direct invocation
pub use branch::{branch, rm_branch};
pub use checkout::{checkout, reset};
pub use commit::commit;
pub use init::init;
pub use log_cmd::{find, global_log, log};
pub use merge::merge;
pub use remote::{add_remote, fetch, pull, push, rm_remote};
pub use stage::{add, rm};
pub use status::status;

use super::args::Command;
use super::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        // Setup
        Command::Init => init::init(ctx),

        // Staging and commits
        Command::Add { file } => stage::add(ctx, &file),
        Command::Rm { file } => stage::rm(ctx, &file),
        Command::Commit { message } => commit::commit(ctx, &message),

        // Read-only
        Command::Log => log_cmd::log(ctx),
        Command::GlobalLog => log_cmd::global_log(ctx),
        Command::Find { message } => log_cmd::find(ctx, &message),
        Command::Status => status::status(ctx),

        // Checkout and branches
        Command::Checkout { target, file } => {
            checkout::checkout(ctx, target.as_deref(), file.as_deref())
        }
        Command::Reset { commit } => checkout::reset(ctx, &commit),
        Command::Branch { name } => branch::branch(ctx, &name),
        Command::RmBranch { name } => branch::rm_branch(ctx, &name),
        Command::Merge { branch } => merge::merge(ctx, &branch),

        // Remotes
        Command::AddRemote { name, path } => remote::add_remote(ctx, &name, &path),
        Command::RmRemote { name } => remote::rm_remote(ctx, &name),
        Command::Push { remote, branch } => remote::push(ctx, &remote, &branch),
        Command::Fetch { remote, branch } => remote::fetch(ctx, &remote, &branch),
        Command::Pull { remote, branch } => remote::pull(ctx, &remote, &branch),
    }
}
