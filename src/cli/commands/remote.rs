//! add-remote, rm-remote, push, fetch and pull commands

use crate::cli::Context;
use crate::ui::output;
use anyhow::Result;

use super::merge;

/// Register a remote repository directory.
pub fn add_remote(ctx: &Context, name: &str, path: &str) -> Result<()> {
    let repo = ctx.open_repo()?;
    repo.add_remote(name, path)?;
    Ok(())
}

/// Forget a remote.
pub fn rm_remote(ctx: &Context, name: &str) -> Result<()> {
    let repo = ctx.open_repo()?;
    repo.rm_remote(name)?;
    Ok(())
}

/// Push the current commit to a remote branch.
pub fn push(ctx: &Context, remote: &str, branch: &str) -> Result<()> {
    let repo = ctx.open_repo()?;
    let outcome = repo.push(remote, branch)?;
    output::debug(
        format!(
            "pushed {} commit(s), {} blob(s) to {}/{}",
            outcome.copied.commits, outcome.copied.blobs, remote, branch
        ),
        ctx.verbosity(),
    );
    if !outcome.ref_updated {
        output::debug("remote branch already up to date", ctx.verbosity());
    }
    Ok(())
}

/// Fetch a remote branch into its tracking branch.
pub fn fetch(ctx: &Context, remote: &str, branch: &str) -> Result<()> {
    let repo = ctx.open_repo()?;
    let outcome = repo.fetch(remote, branch)?;
    output::debug(
        format!(
            "fetched {} commit(s), {} blob(s) into {} at {}",
            outcome.copied.commits,
            outcome.copied.blobs,
            outcome.tracking,
            outcome.tip.short(7)
        ),
        ctx.verbosity(),
    );
    Ok(())
}

/// Fetch a remote branch and merge its tracking branch.
pub fn pull(ctx: &Context, remote: &str, branch: &str) -> Result<()> {
    let mut repo = ctx.open_repo()?;
    let outcome = repo.pull(remote, branch)?;
    merge::report(&outcome.merge, ctx.verbosity());
    Ok(())
}
