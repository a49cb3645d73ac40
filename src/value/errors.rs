//! Value mapping errors

use thiserror::Error;

use crate::schema::ColumnType;

/// Result type for value mapping
pub type ValueResult<T> = Result<T, ValueError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Bound value cannot be read as the column's declared type
    #[error("cannot convert {value} to {column_type}: {reason}")]
    Conversion {
        column_type: ColumnType,
        value: String,
        reason: String,
    },
}

impl ValueError {
    pub fn conversion(
        column_type: ColumnType,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            column_type,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Conversion { .. } => "VALUE_CONVERSION_FAILED",
        }
    }
}
