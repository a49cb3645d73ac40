//! Query context carried from planning to execution
//!
//! The planner serializes a `QueryContext` into the opaque plan token the
//! engine hands back at filter time. Argument slots are 1-based, matching
//! the positions the engine uses for bound values.

use serde::{Deserialize, Serialize};

use super::errors::{PlannerError, PlannerResult};
use crate::schema::ColumnDefinition;

/// One pushed-down predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qual {
    /// 1-based slot of the bound value
    pub argv_index: usize,
    pub field_name: String,
    pub operator: String,
    pub column_definition: ColumnDefinition,
}

/// Row-limit slot
///
/// `rows` is filled in at filter time from the bound value and never
/// travels in the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLimit {
    #[serde(skip)]
    pub rows: i64,
    #[serde(rename = "idx")]
    pub argv_index: usize,
}

impl QueryLimit {
    pub fn new(argv_index: usize) -> Self {
        Self {
            rows: 0,
            argv_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryContext {
    pub columns: Vec<String>,
    #[serde(default)]
    pub quals: Vec<Qual>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<QueryLimit>,
}

impl QueryContext {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            quals: Vec::new(),
            limit: None,
        }
    }

    /// Serialize into a plan token
    pub fn encode(&self) -> PlannerResult<String> {
        serde_json::to_string(self).map_err(PlannerError::Encode)
    }

    /// Rebuild from a plan token
    pub fn decode(token: &str) -> PlannerResult<Self> {
        serde_json::from_str(token).map_err(PlannerError::InvalidToken)
    }

    /// Number of argument slots the plan consumes
    pub fn slot_count(&self) -> usize {
        self.quals.len() + usize::from(self.limit.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use serde_json::json;

    fn sample() -> QueryContext {
        let mut ctx = QueryContext::new(vec!["id".into(), "created".into()]);
        ctx.quals.push(Qual {
            argv_index: 1,
            field_name: "created".into(),
            operator: ">=".into(),
            column_definition: ColumnDefinition::new("created", ColumnType::Timestamp),
        });
        ctx.limit = Some(QueryLimit::new(2));
        ctx
    }

    #[test]
    fn test_token_shape() {
        let token = sample().encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&token).unwrap();

        assert_eq!(value["columns"], json!(["id", "created"]));
        assert_eq!(value["quals"][0]["argv_index"], json!(1));
        assert_eq!(value["quals"][0]["operator"], json!(">="));
        assert_eq!(value["quals"][0]["column_definition"]["type"], json!("timestamp"));
        assert_eq!(value["limit"], json!({"idx": 2}));
    }

    #[test]
    fn test_token_is_stable() {
        let token = sample().encode().unwrap();
        let decoded = QueryContext::decode(&token).unwrap();
        assert_eq!(decoded, sample());
        assert_eq!(decoded.encode().unwrap(), token);
    }

    #[test]
    fn test_operator_not_escaped() {
        let token = sample().encode().unwrap();
        assert!(token.contains("\">=\""));
    }

    #[test]
    fn test_limit_rows_not_serialized() {
        let mut ctx = sample();
        if let Some(limit) = ctx.limit.as_mut() {
            limit.rows = 500;
        }
        let decoded = QueryContext::decode(&ctx.encode().unwrap()).unwrap();
        assert_eq!(decoded.limit.map(|l| l.rows), Some(0));
    }

    #[test]
    fn test_no_limit_key_when_absent() {
        let ctx = QueryContext::new(vec!["a".into()]);
        let token = ctx.encode().unwrap();
        assert_eq!(token, r#"{"columns":["a"],"quals":[]}"#);
        assert_eq!(ctx.slot_count(), 0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = QueryContext::decode("not json").unwrap_err();
        assert_eq!(err.code(), "PLAN_INVALID_TOKEN");
    }
}
