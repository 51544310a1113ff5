//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting, verbosity and tracing setup
//!
//! # Design
//!
//! All console output goes through this module so quiet and debug modes
//! behave the same way across commands.

pub mod output;
