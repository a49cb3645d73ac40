//! CLI command implementations
//!
//! Commands run against a schema file instead of a live plugin: the schema
//! is served by an in-memory source, so planning goes through the same
//! module and table path the engine uses.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::BridgeConfig;
use crate::planner::{ColumnMask, IndexConstraint, QueryContext};
use crate::remote::StaticSource;
use crate::schema::Schema;
use crate::table::{PluginModule, VirtualTable};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_error, write_response};

/// Planning request file for `plan`
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    /// Column bitmask; absent means every column
    #[serde(default)]
    pub columns_used: Option<u64>,

    #[serde(default)]
    pub constraints: Vec<IndexConstraint>,
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = load_config(cli.config.as_deref())?;
    config.install_logging();
    run_command(cli.command, &config)
}

/// Run a command and write its JSON response to stdout
pub fn run_command(cmd: Command, config: &BridgeConfig) -> CliResult<()> {
    match execute(cmd, config) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run a command and return its response payload
pub fn execute(cmd: Command, config: &BridgeConfig) -> CliResult<Value> {
    match cmd {
        Command::Declare { schema } => declare(&schema, config),
        Command::Plan {
            schema,
            table,
            request,
        } => plan(&schema, &table, &request, config),
        Command::Decode { token } => decode(&token),
    }
}

/// Defaults or a JSON file, then environment overrides
pub fn load_config(path: Option<&Path>) -> CliResult<BridgeConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::config_error(format!("{}: {}", path.display(), e))
            })?;
            BridgeConfig::from_json_str(&text)?
        }
        None => BridgeConfig::default(),
    };
    config.apply_overrides(|key| env::var(key).ok());
    Ok(config)
}

/// Declarations for every table in a schema file
pub fn declare(schema_path: &Path, config: &BridgeConfig) -> CliResult<Value> {
    let module = load_module(schema_path, config)?;

    let mut tables = Map::new();
    for name in module.table_names() {
        let (_, declaration) = module.connect(&name)?;
        tables.insert(name, Value::String(declaration));
    }

    Ok(json!({ "tables": tables }))
}

/// Plan one request against one table
pub fn plan(
    schema_path: &Path,
    table: &str,
    request_path: &Path,
    config: &BridgeConfig,
) -> CliResult<Value> {
    let module = load_module(schema_path, config)?;
    let request: PlanRequest = read_json_file(request_path)?;

    let (table, declaration) = module.connect(table)?;
    let plan = table.best_index(
        request.columns_used.map(ColumnMask::from_bits),
        &request.constraints,
    )?;

    Ok(json!({
        "table": table.name(),
        "declaration": declaration,
        "plan": serde_json::to_value(&plan)?,
        "context": serde_json::to_value(&plan.context)?,
    }))
}

/// Decode a plan token and re-encode it
pub fn decode(token: &str) -> CliResult<Value> {
    let context = QueryContext::decode(token)?;
    let encoded = context.encode()?;

    Ok(json!({
        "context": serde_json::to_value(&context)?,
        "token": encoded,
        "slots": context.slot_count(),
    }))
}

fn load_module(schema_path: &Path, config: &BridgeConfig) -> CliResult<PluginModule> {
    let schema: Schema = read_json_file(schema_path)?;
    let source = Arc::new(StaticSource::new(schema));
    Ok(PluginModule::load(source, config.clone())?)
}
