//! Observability for the bridge
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Relaxed atomic counters
//!
//! Observability is read-only: nothing here can fail a plan or a cursor.
//!
//! ```ignore
//! use plugin_vtab::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::CursorFilter, &[("table", "aws_s3_bucket")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{BridgeMetrics, MetricsSnapshot};

/// Log a lifecycle event at its natural severity
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields at the event's severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

/// True when `event` would be written; lets callers skip building fields
pub fn event_enabled(event: Event) -> bool {
    Logger::enabled(event.severity())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Verifies no panic
        log_event(Event::SchemaLoaded);
        log_event(Event::CursorStreamFailed);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::CursorFilter, &[("table", "t"), ("limit", "10")]);
    }
}
