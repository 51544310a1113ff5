//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Command results go to stdout and respect the quiet flag. Errors,
//! warnings and diagnostics go to stderr. Internal `tracing` events are
//! routed to stderr by [`init_tracing`].

use std::fmt::Display;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "GRAFT_LOG";

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    fn default_directive(self) -> &'static str {
        match self {
            Verbosity::Debug => "debug",
            Verbosity::Normal | Verbosity::Quiet => "warn",
        }
    }
}

/// Install the stderr tracing subscriber.
///
/// `GRAFT_LOG` overrides the level chosen from `verbosity`. Calling this
/// twice is harmless; the second call keeps the first subscriber.
pub fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("{}", message);
}

/// Print an unrecoverable error (always shown).
pub fn fatal(message: impl Display) {
    eprintln!("fatal: {}", message);
}

/// Format a branch name for display, marking the current branch.
pub fn format_branch(name: &str, current: bool) -> String {
    if current {
        format!("*{}", name)
    } else {
        name.to_string()
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a titled status section.
pub fn format_section<T: Display>(title: &str, items: &[T]) -> String {
    let mut out = format!("=== {} ===\n", title);
    if !items.is_empty() {
        out.push_str(&format_list(items, ""));
        out.push('\n');
    }
    out
}
