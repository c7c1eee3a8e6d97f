//! CLI module for the `JatimGuide` route planner.
//!
//! This module provides the command-line interface for generating
//! itineraries and curating hotel and food selections.

mod commands;
mod output;
mod repl;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
pub use repl::{ReplCommand, REPL_HELP};
