//! CLI module for plugin-vtab
//!
//! Provides command-line interface for:
//! - declare: Table declarations for a schema file
//! - plan: One planning call against a schema file
//! - decode: Plan token validation

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{declare, decode, execute, load_config, plan, run, run_command, PlanRequest};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_response};
