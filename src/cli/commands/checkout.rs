//! checkout and reset commands - Restore files, switch branches, move HEAD

use crate::cli::{Context, UsageError};
use crate::ui::output;
use anyhow::Result;

/// Restore a file or switch branches.
///
/// # Arguments
///
/// * `target` - Branch name, or commit id prefix when `file` is given
/// * `file` - File to restore (given after `--`)
pub fn checkout(ctx: &Context, target: Option<&str>, file: Option<&str>) -> Result<()> {
    match (target, file) {
        (commit, Some(file)) => {
            let repo = ctx.open_repo()?;
            repo.checkout_file(commit, file)?;
        }
        (Some(branch), None) => {
            let mut repo = ctx.open_repo()?;
            repo.checkout_branch(branch)?;
            output::debug(format!("switched to {}", branch), ctx.verbosity());
        }
        (None, None) => return Err(UsageError::IncorrectOperands.into()),
    }
    Ok(())
}

/// Move the current branch to a commit and check it out.
pub fn reset(ctx: &Context, commit: &str) -> Result<()> {
    let mut repo = ctx.open_repo()?;
    let id = repo.reset(commit)?;
    output::debug(format!("HEAD is now at {}", id.short(7)), ctx.verbosity());
    Ok(())
}
