//! Table and module error types

use thiserror::Error;

use crate::planner::PlannerError;
use crate::remote::RemoteError;
use crate::schema::SchemaError;

/// Result type for table and module operations
pub type TableResult<T> = Result<T, TableError>;

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Schema refresh changed the columns the engine was given at connect
    #[error("table '{0}' changed shape since it was declared; reconnect it")]
    Redeclared(String),
}

impl TableError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Schema(err) => err.code(),
            Self::Planner(err) => err.code(),
            Self::Remote(err) => err.code(),
            Self::Redeclared(_) => "TABLE_REDECLARED",
        }
    }
}
