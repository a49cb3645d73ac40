//! Cursor error types
//!
//! Mapping and decode errors surface from `filter` before any remote call.
//! Remote errors surface from `filter` (call setup, first row) or `next`.

use thiserror::Error;

use super::state::CursorState;
use crate::planner::PlannerError;
use crate::remote::RemoteError;
use crate::value::ValueError;

/// Result type for cursor operations
pub type CursorResult<T> = Result<T, CursorError>;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Operation not allowed in the current state
    #[error("cannot {operation} a cursor in state '{state}'")]
    InvalidState {
        operation: &'static str,
        state: CursorState,
    },

    /// Plan refers to an argument slot the engine did not bind
    #[error("argument slot {slot} not bound ({provided} values provided)")]
    MissingArgument { slot: usize, provided: usize },

    #[error("column {index} out of range ({columns} columns)")]
    ColumnOutOfRange { index: usize, columns: usize },

    #[error("cursor has no current row")]
    NoCurrentRow,
}

impl CursorError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Planner(err) => err.code(),
            Self::Value(err) => err.code(),
            Self::Remote(_) => "CURSOR_STREAM_FAILED",
            Self::InvalidState { .. } => "CURSOR_INVALID_STATE",
            Self::MissingArgument { .. } => "CURSOR_MISSING_ARGUMENT",
            Self::ColumnOutOfRange { .. } => "CURSOR_COLUMN_OUT_OF_RANGE",
            Self::NoCurrentRow => "CURSOR_NO_CURRENT_ROW",
        }
    }
}
