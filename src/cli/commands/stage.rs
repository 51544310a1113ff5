//! add and rm commands - Change what the next commit will contain

use crate::cli::Context;
use crate::ui::output;
use anyhow::Result;

/// Stage the working copy of a file.
pub fn add(ctx: &Context, file: &str) -> Result<()> {
    let mut repo = ctx.open_repo()?;
    let changed = repo.add(file)?;
    if !changed {
        output::debug(format!("{} already staged", file), ctx.verbosity());
    }
    Ok(())
}

/// Unstage a file, deleting it when the current commit tracks it.
pub fn rm(ctx: &Context, file: &str) -> Result<()> {
    let mut repo = ctx.open_repo()?;
    repo.rm(file)?;
    Ok(())
}
