//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::CatalogKind;

/// `JatimGuide` - East Java itinerary planner.
#[derive(Parser, Debug)]
#[command(name = "jatimguide")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "JATIMGUIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter configuration file.
    Init {
        /// Directory to initialize (defaults to current directory).
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Force overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the planner configuration.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// List the catalog.
    Catalog {
        /// Only list one kind (destinations, hotels, foods).
        kind: Option<CatalogKind>,
    },

    /// Generate an itinerary.
    Generate {
        /// Starting point.
        #[arg(short, long)]
        from: String,

        /// Trip length in days.
        #[arg(short, long)]
        days: String,

        /// Transport mode (public-transport, private-car, motorcycle, bicycle).
        #[arg(short, long, default_value = "public-transport")]
        transport: String,

        /// Skip the generation service and use the fallback planner.
        #[arg(long)]
        offline: bool,

        /// Catalog hotel ids to add to the itinerary.
        #[arg(long = "hotel", value_name = "ID")]
        hotels: Vec<u32>,

        /// Catalog food ids to add to the itinerary.
        #[arg(long = "food", value_name = "ID")]
        foods: Vec<u32>,
    },

    /// Start an interactive planning session.
    Session {
        /// Skip the generation service and use the fallback planner.
        #[arg(long)]
        offline: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from([
            "jatimguide", "generate", "--from", "Surabaya", "--days", "3", "--transport",
            "private-car", "--hotel", "1", "--hotel", "2", "--offline",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                from,
                days,
                transport,
                offline,
                hotels,
                foods,
            } => {
                assert_eq!(from, "Surabaya");
                assert_eq!(days, "3");
                assert_eq!(transport, "private-car");
                assert!(offline);
                assert_eq!(hotels, [1, 2]);
                assert!(foods.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_catalog_kind_arg() {
        let cli =
            Cli::try_parse_from(["jatimguide", "catalog", "hotels", "--output", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Catalog {
                kind: Some(CatalogKind::Hotel)
            }
        ));
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
