//! Binary-level tests for the `graft` command.
//!
//! Each test runs the real binary in a temporary directory with an empty
//! home, so no user configuration leaks in.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

struct Workspace {
    dir: TempDir,
    home: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
            home: TempDir::new().expect("failed to create temp home"),
        }
    }

    /// An initialized workspace.
    fn init() -> Self {
        let ws = Self::new();
        ws.graft(&["init"]).assert().success();
        ws
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn graft(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("graft").expect("binary not built");
        cmd.current_dir(self.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path())
            .env_remove("GRAFT_CONFIG")
            .env_remove("GRAFT_LOG")
            .args(args);
        cmd
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).unwrap();
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path().join(name)).unwrap()
    }

    fn commit_file(&self, name: &str, content: &str, message: &str) {
        self.write(name, content);
        self.graft(&["add", name]).assert().success();
        self.graft(&["commit", message]).assert().success();
    }
}

fn message(text: &str) -> impl Predicate<str> {
    predicate::str::diff(format!("{}\n", text))
}

// =============================================================================
// Usage
// =============================================================================

#[test]
fn no_command() {
    let ws = Workspace::new();
    ws.graft(&[])
        .assert()
        .failure()
        .code(1)
        .stderr(message("Please enter a command."));
}

#[test]
fn unknown_command() {
    let ws = Workspace::new();
    ws.graft(&["frobnicate"])
        .assert()
        .failure()
        .stderr(message("No command with that name exists."));
}

#[test]
fn wrong_operand_count() {
    let ws = Workspace::init();
    ws.graft(&["add"])
        .assert()
        .failure()
        .stderr(message("Incorrect operands."));
    ws.graft(&["checkout"])
        .assert()
        .failure()
        .stderr(message("Incorrect operands."));
}

#[test]
fn outside_a_repository() {
    let ws = Workspace::new();
    ws.graft(&["status"])
        .assert()
        .failure()
        .stderr(message("Not in an initialized graft directory."));
}

#[test]
fn help_succeeds() {
    let ws = Workspace::new();
    ws.graft(&["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("global-log"));
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn init_twice() {
    let ws = Workspace::init();
    assert!(ws.path().join(".graft/HEAD").is_file());
    ws.graft(&["init"]).assert().failure().stderr(message(
        "A graft version-control system already exists in the current directory.",
    ));
}

#[test]
fn log_shows_root_in_pacific_time() {
    let ws = Workspace::init();
    ws.graft(&["log"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("===\ncommit "))
        .stdout(predicate::str::ends_with(
            "Date: Wed Dec 31 16:00:00 1969 -0800\ninitial commit\n\n",
        ));
}

#[test]
fn repo_config_changes_log_offset() {
    let ws = Workspace::init();
    fs::write(ws.path().join(".graft/config.toml"), "date_offset = \"+00:00\"\n").unwrap();
    ws.graft(&["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Date: Thu Jan 1 00:00:00 1970 +0000\n",
        ));
}

#[test]
fn status_layout() {
    let ws = Workspace::init();
    ws.write("untracked.txt", "u");
    ws.graft(&["status"]).assert().success().stdout(predicate::str::diff(
        "=== Branches ===\n*master\n\n\
         === Staged Files ===\n\n\
         === Removed Files ===\n\n\
         === Modifications Not Staged For Commit ===\n\n\
         === Untracked Files ===\nuntracked.txt\n\n",
    ));
}

#[test]
fn commit_errors() {
    let ws = Workspace::init();
    ws.graft(&["commit", "nothing"])
        .assert()
        .failure()
        .stderr(message("No changes added to the commit."));
    ws.write("a.txt", "a");
    ws.graft(&["add", "a.txt"]).assert().success();
    ws.graft(&["commit", ""])
        .assert()
        .failure()
        .stderr(message("Please enter a commit message."));
}

#[test]
fn find_prints_ids() {
    let ws = Workspace::init();
    ws.commit_file("a.txt", "a", "findable");
    ws.graft(&["find", "findable"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[0-9a-f]{64}\n$").unwrap());
    ws.graft(&["find", "absent"])
        .assert()
        .failure()
        .stderr(message("Found no commit with that message."));
}

#[test]
fn checkout_file_restores_contents() {
    let ws = Workspace::init();
    ws.commit_file("a.txt", "committed", "a");
    ws.write("a.txt", "scribbled");
    ws.graft(&["checkout", "--", "a.txt"]).assert().success();
    assert_eq!(ws.read("a.txt"), "committed");
}

#[test]
fn merge_conflict_is_reported() {
    let ws = Workspace::init();
    ws.commit_file("f.txt", "1\n", "one");
    ws.graft(&["branch", "other"]).assert().success();
    ws.commit_file("f.txt", "2\n", "two");
    ws.graft(&["checkout", "other"]).assert().success();
    ws.commit_file("f.txt", "3\n", "three");
    ws.graft(&["checkout", "master"]).assert().success();

    ws.graft(&["merge", "other"])
        .assert()
        .success()
        .stdout(message("Encountered a merge conflict."));
    assert_eq!(ws.read("f.txt"), "<<<<<<< HEAD\n2\n=======\n3\n>>>>>>>\n");
    ws.graft(&["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge: "))
        .stdout(predicate::str::contains("Merged other into master.\n"));
}

#[test]
fn merge_messages() {
    let ws = Workspace::init();
    ws.graft(&["branch", "other"]).assert().success();
    ws.commit_file("a.txt", "a", "ahead");
    ws.graft(&["merge", "other"])
        .assert()
        .success()
        .stdout(message("Given branch is an ancestor of the current branch."));

    ws.graft(&["checkout", "other"]).assert().success();
    ws.graft(&["merge", "master"])
        .assert()
        .success()
        .stdout(message("Current branch fast-forwarded."));
    assert_eq!(ws.read("a.txt"), "a");

    ws.graft(&["merge", "other"])
        .assert()
        .failure()
        .stderr(message("Cannot merge a branch with itself."));
}

#[test]
fn quiet_suppresses_results() {
    let ws = Workspace::init();
    ws.graft(&["branch", "other"]).assert().success();
    ws.commit_file("a.txt", "a", "ahead");
    ws.graft(&["-q", "merge", "other"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn push_rejected_message() {
    let local = Workspace::init();
    let peer = Workspace::init();
    peer.commit_file("remote.txt", "remote", "remote");
    local.commit_file("local.txt", "local", "local");

    let location = peer.path().join(".graft");
    local
        .graft(&["add-remote", "peer", &location.to_string_lossy()])
        .assert()
        .success();
    local
        .graft(&["push", "peer", "master"])
        .assert()
        .failure()
        .stderr(message("Please pull down remote changes before pushing."));

    local
        .graft(&["pull", "peer", "master"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(local.read("remote.txt"), "remote");
    local.graft(&["push", "peer", "master"]).assert().success();
}

#[test]
fn damaged_head_is_fatal() {
    let ws = Workspace::init();
    fs::write(ws.path().join(".graft/HEAD"), "ghost").unwrap();
    ws.graft(&["log"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("fatal: "));
}
