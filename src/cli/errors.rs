//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::planner::PlannerError;
use crate::table::TableError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Schema could not be loaded or a table is unknown
    SchemaError,
    /// Planning failed
    PlanError,
    /// Plan token does not decode
    TokenError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLI_CONFIG_ERROR",
            Self::IoError => "CLI_IO_ERROR",
            Self::SchemaError => "CLI_SCHEMA_ERROR",
            Self::PlanError => "CLI_PLAN_ERROR",
            Self::TokenError => "CLI_TOKEN_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<TableError> for CliError {
    fn from(e: TableError) -> Self {
        let code = match e {
            TableError::Planner(_) => CliErrorCode::PlanError,
            TableError::Schema(_) | TableError::Remote(_) => CliErrorCode::SchemaError,
        };
        Self::new(code, format!("{}: {}", e.code(), e))
    }
}

impl From<PlannerError> for CliError {
    fn from(e: PlannerError) -> Self {
        let code = match e {
            PlannerError::InvalidToken(_) => CliErrorCode::TokenError,
            _ => CliErrorCode::PlanError,
        };
        Self::new(code, format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaError;

    #[test]
    fn test_display() {
        let err = CliError::io_error("missing file");
        assert_eq!(err.to_string(), "CLI_IO_ERROR: missing file");
    }

    #[test]
    fn test_from_table_error() {
        let err: CliError = TableError::Schema(SchemaError::UnknownTable("t".into())).into();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(err.message().starts_with("SCHEMA_UNKNOWN_TABLE"));
    }
}
