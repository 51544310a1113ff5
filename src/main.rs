//! graft binary entry point.

use std::process::ExitCode;

use graftwork::cli::{self, UsageError};
use graftwork::core::repo::{ErrorCategory, RepoError};
use graftwork::ui::output;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Print a failure. Repository damage is marked `fatal:`; mistakes and
/// missing objects print their message alone.
fn report(err: &anyhow::Error) {
    if let Some(repo_err) = err.downcast_ref::<RepoError>() {
        match repo_err.category() {
            ErrorCategory::Invariant => output::fatal(repo_err),
            ErrorCategory::User | ErrorCategory::NotFound => output::error(repo_err),
        }
    } else if let Some(usage) = err.downcast_ref::<UsageError>() {
        output::error(usage);
    } else {
        output::fatal(format!("{:#}", err));
    }
}
