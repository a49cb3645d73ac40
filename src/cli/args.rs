//! CLI argument definitions using clap
//!
//! Commands:
//! - plugin-vtab declare --schema <path>
//! - plugin-vtab plan --schema <path> --table <name> --request <path>
//! - plugin-vtab decode --token <json>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Developer tooling for the plugin virtual-table bridge
#[derive(Parser, Debug)]
#[command(name = "plugin-vtab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Optional JSON configuration file; environment overrides still apply
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the table declarations for a schema file
    Declare {
        /// Path to a schema JSON file
        #[arg(long)]
        schema: PathBuf,
    },

    /// Plan one access shape and print the plan
    Plan {
        /// Path to a schema JSON file
        #[arg(long)]
        schema: PathBuf,

        /// Table to plan against
        #[arg(long)]
        table: String,

        /// Path to a planning request JSON file
        #[arg(long)]
        request: PathBuf,
    },

    /// Validate a plan token and print it re-encoded
    Decode {
        /// Plan token as produced by `plan`
        #[arg(long)]
        token: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
