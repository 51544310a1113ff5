//! branch and rm-branch commands

use crate::cli::Context;
use crate::ui::output;
use anyhow::Result;

/// Create a branch at the current commit. HEAD does not move.
pub fn branch(ctx: &Context, name: &str) -> Result<()> {
    let repo = ctx.open_repo()?;
    let created = repo.create_branch(name)?;
    output::debug(
        format!("created {} at {}", created, repo.head_id()?.short(7)),
        ctx.verbosity(),
    );
    Ok(())
}

/// Delete a branch pointer. Its commits are kept.
pub fn rm_branch(ctx: &Context, name: &str) -> Result<()> {
    let repo = ctx.open_repo()?;
    repo.delete_branch(name)?;
    Ok(())
}
