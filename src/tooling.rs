//! Tooling & Integration Layer
//!
//! The command-line surface over the workflow and its text formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, CommandOutput, Commands};
