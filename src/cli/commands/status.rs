//! status command - Show branches, staged files and working-copy changes

use crate::cli::Context;
use crate::core::repo::StatusReport;
use crate::ui::output::{self, format_branch, format_section};
use anyhow::Result;

fn format_status(report: &StatusReport) -> String {
    let branches: Vec<String> = report
        .branches
        .iter()
        .map(|b| format_branch(b.as_str(), b == &report.current_branch))
        .collect();
    let modified: Vec<String> = report
        .modified
        .iter()
        .map(|m| format!("{} ({})", m.name, m.kind))
        .collect();

    [
        format_section("Branches", &branches),
        format_section("Staged Files", &report.staged),
        format_section("Removed Files", &report.removed),
        format_section("Modifications Not Staged For Commit", &modified),
        format_section("Untracked Files", &report.untracked),
    ]
    .join("\n")
}

/// Show repository status.
pub fn status(ctx: &Context) -> Result<()> {
    let repo = ctx.open_repo()?;
    let report = repo.status()?;
    output::print(format_status(&report), ctx.verbosity());
    Ok(())
}
