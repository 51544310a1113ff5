//! init command - Create a repository in the working directory

use crate::cli::Context;
use crate::core::repo::Repository;
use crate::ui::output;
use anyhow::Result;

/// Create a repository in the working directory.
///
/// Stores the root commit and makes the configured default branch current.
pub fn init(ctx: &Context) -> Result<()> {
    let work_dir = ctx.work_dir()?;
    let repo = Repository::init(&work_dir)?;

    let branch = repo.current_branch()?;
    output::debug(
        format!(
            "initialized {} on branch {}",
            repo.paths().repo_dir.display(),
            branch
        ),
        ctx.verbosity(),
    );
    Ok(())
}
