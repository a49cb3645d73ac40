//! Remote source error types

use thiserror::Error;

/// Result type for remote source operations
pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Stream broke before the source finished
    #[error("transport error: {0}")]
    Transport(String),

    /// Source rejected or failed the query (e.g. missing required qual)
    #[error("remote execution failed: {0}")]
    Execution(String),

    /// Source could not describe its tables
    #[error("schema unavailable for connection '{connection}': {reason}")]
    SchemaUnavailable { connection: String, reason: String },

    /// Call was cancelled before it started
    #[error("remote call cancelled")]
    Cancelled,
}

impl RemoteError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "REMOTE_TRANSPORT",
            Self::Execution(_) => "REMOTE_EXECUTION_FAILED",
            Self::SchemaUnavailable { .. } => "REMOTE_SCHEMA_UNAVAILABLE",
            Self::Cancelled => "REMOTE_CANCELLED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(RemoteError::Transport("reset".into()).code(), "REMOTE_TRANSPORT");
        assert_eq!(RemoteError::Cancelled.code(), "REMOTE_CANCELLED");
    }

    #[test]
    fn test_display() {
        let err = RemoteError::Execution("missing required qual 'region'".into());
        assert_eq!(
            err.to_string(),
            "remote execution failed: missing required qual 'region'"
        );
    }
}
