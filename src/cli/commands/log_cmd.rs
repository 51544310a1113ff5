//! log, global-log and find commands - Display commit history

use chrono::FixedOffset;

use crate::cli::Context;
use crate::core::repo::LogEntry;
use crate::ui::output;
use anyhow::Result;

/// Date layout for log entries, e.g. `Thu Jan 1 00:00:00 1970 -0800`.
const DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Format one log entry, ending with a blank line.
fn format_entry(entry: &LogEntry, offset: &FixedOffset) -> String {
    let commit = &entry.commit;
    let mut out = format!("===\ncommit {}\n", entry.id);
    if let (Some(first), Some(second)) = (&commit.parent, &commit.second_parent) {
        out.push_str(&format!("Merge: {} {}\n", first.short(7), second.short(7)));
    }
    let date = commit.timestamp.as_datetime().with_timezone(offset);
    out.push_str(&format!("Date: {}\n", date.format(DATE_FORMAT)));
    out.push_str(&commit.message);
    out.push('\n');
    out
}

fn print_entries(ctx: &Context, entries: &[LogEntry], offset: &FixedOffset) {
    for entry in entries {
        output::print(format_entry(entry, offset), ctx.verbosity());
    }
}

/// Show the primary-parent history of the current commit.
pub fn log(ctx: &Context) -> Result<()> {
    let repo = ctx.open_repo()?;
    let offset = repo.config().date_offset();
    print_entries(ctx, &repo.log()?, &offset);
    Ok(())
}

/// Show every stored commit, ordered by id.
pub fn global_log(ctx: &Context) -> Result<()> {
    let repo = ctx.open_repo()?;
    let offset = repo.config().date_offset();
    print_entries(ctx, &repo.global_log()?, &offset);
    Ok(())
}

/// Print the id of every commit with exactly this message.
pub fn find(ctx: &Context, message: &str) -> Result<()> {
    let repo = ctx.open_repo()?;
    let ids = repo.find(message)?;
    output::print(output::format_list(&ids, ""), ctx.verbosity());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commit::Commit;
    use crate::core::types::{ObjectId, UtcTimestamp};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn root_entry_in_pacific_time() {
        let root = Commit::root();
        let entry = LogEntry {
            id: root.id().unwrap(),
            commit: root,
        };
        let text = format_entry(&entry, &offset(-8));
        assert_eq!(
            text,
            format!(
                "===\ncommit {}\nDate: Wed Dec 31 16:00:00 1969 -0800\ninitial commit\n",
                entry.id
            )
        );
    }

    #[test]
    fn merge_entry_shows_both_parents() {
        let first = ObjectId::hash_of(b"first");
        let second = ObjectId::hash_of(b"second");
        let mut commit = Commit::merge(
            "Merged other into master.",
            first.clone(),
            second.clone(),
            BTreeMap::new(),
        );
        commit.timestamp =
            UtcTimestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 2).unwrap());
        let entry = LogEntry {
            id: commit.id().unwrap(),
            commit,
        };

        let text = format_entry(&entry, &offset(0));
        assert!(text.contains(&format!("Merge: {} {}\n", first.short(7), second.short(7))));
        assert!(text.contains("Date: Tue Mar 5 09:07:02 2024 +0000\n"));
        assert!(text.ends_with("Merged other into master.\n"));
    }
}
