//! commit command - Record the staged snapshot

use crate::cli::Context;
use crate::ui::output;
use anyhow::Result;

/// Create a commit from the staging index on the current branch.
pub fn commit(ctx: &Context, message: &str) -> Result<()> {
    let mut repo = ctx.open_repo()?;
    let id = repo.commit(message)?;
    output::debug(
        format!("[{} {}] {}", repo.current_branch()?, id.short(7), message),
        ctx.verbosity(),
    );
    Ok(())
}
