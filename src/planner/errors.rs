//! Planner error types
//!
//! Error codes:
//! - PLAN_MALFORMED_CONSTRAINT
//! - PLAN_ENCODE_FAILED
//! - PLAN_INVALID_TOKEN
//!
//! Missing required key columns are not an error; they raise the plan cost.

use thiserror::Error;

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// Constraint refers to a column the table does not declare
    #[error("constraint {index} is malformed: {reason}")]
    MalformedConstraint { index: usize, reason: String },

    /// Query context could not be serialized into a plan token
    #[error("failed to encode plan token: {0}")]
    Encode(#[source] serde_json::Error),

    /// Plan token handed back by the engine does not decode
    #[error("invalid plan token: {0}")]
    InvalidToken(#[source] serde_json::Error),
}

impl PlannerError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedConstraint {
            index,
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedConstraint { .. } => "PLAN_MALFORMED_CONSTRAINT",
            Self::Encode(_) => "PLAN_ENCODE_FAILED",
            Self::InvalidToken(_) => "PLAN_INVALID_TOKEN",
        }
    }
}
