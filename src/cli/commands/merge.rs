//! merge command - Merge a branch into the current branch

use crate::cli::Context;
use crate::core::repo::MergeOutcome;
use crate::ui::output::{self, Verbosity};
use anyhow::Result;

/// Report a merge outcome. Shared with `pull`.
pub(super) fn report(outcome: &MergeOutcome, verbosity: Verbosity) {
    match outcome {
        MergeOutcome::AlreadyAncestor => output::print(
            "Given branch is an ancestor of the current branch.",
            verbosity,
        ),
        MergeOutcome::FastForward { to } => {
            output::print("Current branch fast-forwarded.", verbosity);
            output::debug(format!("now at {}", to.short(7)), verbosity);
        }
        MergeOutcome::Merged { commit, conflict } => {
            if *conflict {
                output::print("Encountered a merge conflict.", verbosity);
            }
            output::debug(format!("merge commit {}", commit.short(7)), verbosity);
        }
    }
}

/// Merge `branch` into the current branch.
pub fn merge(ctx: &Context, branch: &str) -> Result<()> {
    let mut repo = ctx.open_repo()?;
    let outcome = repo.merge(branch)?;
    report(&outcome, ctx.verbosity());
    Ok(())
}
