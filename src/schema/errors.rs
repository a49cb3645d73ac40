//! Schema error types

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Remote schema cannot be turned into a table declaration
    #[error("malformed schema for table '{table}': {reason}")]
    MalformedSchema { table: String, reason: String },

    /// Table is not part of the current schema snapshot
    #[error("table '{0}' not found in schema")]
    UnknownTable(String),
}

impl SchemaError {
    pub fn malformed(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSchema {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedSchema { .. } => "SCHEMA_MALFORMED",
            Self::UnknownTable(_) => "SCHEMA_UNKNOWN_TABLE",
        }
    }
}
