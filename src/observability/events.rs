//! Observable events emitted by the bridge
//!
//! Events are explicit and typed; the string form is what lands in the
//! `event` key of a log line.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration and schema
    /// Configuration resolved
    ConfigLoaded,
    /// Initial schema published
    SchemaLoaded,
    /// Dynamic schema replaced
    SchemaRefreshed,
    /// Static schema refresh skipped
    SchemaRefreshSkipped,
    /// A connected table's columns no longer match the current schema
    TableRedeclared,

    // Planning
    /// A planning call produced a plan
    PlanCreated,
    /// One constraint was examined
    PlanConstraint,
    /// Required key columns absent, cost forced to maximum
    PlanRequiredKeyMissing,
    /// Planning failed
    PlanFailed,

    // Cursor lifecycle
    /// Cursor opened
    CursorOpen,
    /// Remote call issued
    CursorFilter,
    /// Plan token or bound values unusable; no remote call made
    CursorFilterFailed,
    /// Bound limit value was not integral and was dropped
    LimitDropped,
    /// Bound value could not be mapped
    ValueMappingFailed,
    /// Remote stream reached its end
    CursorExhausted,
    /// Remote stream reported an error
    CursorStreamFailed,
    /// Cursor closed and its stream cancelled
    CursorClosed,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaRefreshed => "SCHEMA_REFRESHED",
            Event::SchemaRefreshSkipped => "SCHEMA_REFRESH_SKIPPED",
            Event::TableRedeclared => "TABLE_REDECLARED",
            Event::PlanCreated => "PLAN_CREATED",
            Event::PlanConstraint => "PLAN_CONSTRAINT",
            Event::PlanRequiredKeyMissing => "PLAN_REQUIRED_KEY_MISSING",
            Event::PlanFailed => "PLAN_FAILED",
            Event::CursorOpen => "CURSOR_OPEN",
            Event::CursorFilter => "CURSOR_FILTER",
            Event::CursorFilterFailed => "CURSOR_FILTER_FAILED",
            Event::LimitDropped => "LIMIT_DROPPED",
            Event::ValueMappingFailed => "VALUE_MAPPING_FAILED",
            Event::CursorExhausted => "CURSOR_EXHAUSTED",
            Event::CursorStreamFailed => "CURSOR_STREAM_FAILED",
            Event::CursorClosed => "CURSOR_CLOSED",
        }
    }

    /// Returns true for events that describe a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::PlanFailed
                | Event::CursorFilterFailed
                | Event::ValueMappingFailed
                | Event::CursorStreamFailed
        )
    }
}

impl Event {
    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            _ if self.is_failure() => Severity::Error,
            Event::LimitDropped | Event::TableRedeclared => Severity::Warn,
            Event::ConfigLoaded
            | Event::SchemaLoaded
            | Event::SchemaRefreshed
            | Event::SchemaRefreshSkipped => Severity::Info,
            Event::PlanConstraint => Severity::Trace,
            _ => Severity::Debug,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
