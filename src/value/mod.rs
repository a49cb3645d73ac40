//! Value subsystem
//!
//! Engine-side and plugin-side value types, the declared-type-directed
//! mapper for predicate values, and the result sink used by column reads.

mod errors;
mod mapper;
mod sink;
mod types;

pub use errors::{ValueError, ValueResult};
pub use mapper::QualValueMapper;
pub use sink::{CapturedResult, ResultSink, JSON_SUBTYPE};
pub use types::{
    format_timestamp, parse_timestamp, RemoteValue, SqlValue, DATE_ONLY_FORMAT, TIMESTAMP_FORMAT,
};
