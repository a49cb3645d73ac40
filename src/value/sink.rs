//! Typed result sink for column reads
//!
//! The engine supplies a sink per `column()` call; the cursor writes exactly
//! one value into it, plus an optional subtype tag.

use super::types::SqlValue;

/// Subtype tag marking a TEXT result as JSON
pub const JSON_SUBTYPE: u32 = 74;

/// Receives one column value from a cursor
pub trait ResultSink {
    fn result_null(&mut self);
    fn result_int(&mut self, value: i64);
    fn result_float(&mut self, value: f64);
    fn result_text(&mut self, value: &str);
    fn result_subtype(&mut self, subtype: u32);
}

/// Sink that keeps what was written
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapturedResult {
    pub value: Option<SqlValue>,
    pub subtype: Option<u32>,
}

impl CapturedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_json(&self) -> bool {
        self.subtype == Some(JSON_SUBTYPE)
    }
}

impl ResultSink for CapturedResult {
    fn result_null(&mut self) {
        self.value = Some(SqlValue::Null);
    }

    fn result_int(&mut self, value: i64) {
        self.value = Some(SqlValue::Integer(value));
    }

    fn result_float(&mut self, value: f64) {
        self.value = Some(SqlValue::Float(value));
    }

    fn result_text(&mut self, value: &str) {
        self.value = Some(SqlValue::Text(value.to_string()));
    }

    fn result_subtype(&mut self, subtype: u32) {
        self.subtype = Some(subtype);
    }
}
