//! Remote execute request

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::BridgeConfig;
use crate::value::RemoteValue;

/// Limit value meaning "no limit"
pub const UNBOUNDED_LIMIT: i64 = -1;

/// One predicate sent to the remote source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteQual {
    pub field_name: String,
    pub operator: String,
    pub value: RemoteValue,
}

impl RemoteQual {
    pub fn new(field_name: impl Into<String>, operator: impl Into<String>, value: RemoteValue) -> Self {
        Self {
            field_name: field_name.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// Per-connection execution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionData {
    pub cache_enabled: bool,
    pub cache_ttl_secs: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Unique per remote call
    pub call_id: Uuid,
    pub connection: String,
    pub table: String,
    pub columns: Vec<String>,
    /// Predicates grouped by field, in slot order within a field
    pub quals: BTreeMap<String, Vec<RemoteQual>>,
    pub limit: i64,
    pub connection_data: ConnectionData,
    /// Row-channel capacity the source should stream through
    pub stream_buffer: usize,
}

impl ExecuteRequest {
    pub fn new(config: &BridgeConfig, table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            connection: config.connection.clone(),
            table: table.into(),
            columns,
            quals: BTreeMap::new(),
            limit: UNBOUNDED_LIMIT,
            connection_data: ConnectionData {
                cache_enabled: config.cache_enabled,
                cache_ttl_secs: config.cache_max_ttl_secs,
                limit: UNBOUNDED_LIMIT,
            },
            stream_buffer: config.stream_buffer,
        }
    }

    pub fn push_qual(&mut self, qual: RemoteQual) {
        self.quals
            .entry(qual.field_name.clone())
            .or_default()
            .push(qual);
    }

    pub fn set_limit(&mut self, rows: i64) {
        self.limit = rows;
        self.connection_data.limit = rows;
    }

    pub fn is_bounded(&self) -> bool {
        self.limit >= 0
    }

    pub fn qual_count(&self) -> usize {
        self.quals.values().map(Vec::len).sum()
    }

    /// Predicates on one field
    pub fn quals_for(&self, field: &str) -> &[RemoteQual] {
        self.quals.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_config() {
        let mut config = BridgeConfig::for_connection("aws_prod");
        config.cache_enabled = false;
        let request = ExecuteRequest::new(&config, "aws_s3_bucket", vec!["name".into()]);

        assert_eq!(request.connection, "aws_prod");
        assert_eq!(request.limit, UNBOUNDED_LIMIT);
        assert!(!request.is_bounded());
        assert!(!request.connection_data.cache_enabled);
        assert_eq!(request.connection_data.cache_ttl_secs, config.cache_max_ttl_secs);
        assert_eq!(request.stream_buffer, config.stream_buffer);
    }

    #[test]
    fn test_same_field_quals_kept() {
        let config = BridgeConfig::default();
        let mut request = ExecuteRequest::new(&config, "events", vec![]);
        request.push_qual(RemoteQual::new("ts", ">=", RemoteValue::Int(1)));
        request.push_qual(RemoteQual::new("ts", "<", RemoteValue::Int(9)));
        request.push_qual(RemoteQual::new("kind", "=", RemoteValue::String("a".into())));

        assert_eq!(request.qual_count(), 3);
        let ops: Vec<_> = request.quals_for("ts").iter().map(|q| q.operator.as_str()).collect();
        assert_eq!(ops, vec![">=", "<"]);
        assert!(request.quals_for("missing").is_empty());
    }

    #[test]
    fn test_call_ids_unique() {
        let config = BridgeConfig::default();
        let a = ExecuteRequest::new(&config, "t", vec![]);
        let b = ExecuteRequest::new(&config, "t", vec![]);
        assert_ne!(a.call_id, b.call_id);
    }

    #[test]
    fn test_set_limit() {
        let mut request = ExecuteRequest::new(&BridgeConfig::default(), "t", vec![]);
        request.set_limit(25);
        assert!(request.is_bounded());
        assert_eq!(request.connection_data.limit, 25);
    }
}
