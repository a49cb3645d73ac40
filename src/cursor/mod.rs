//! Cursor / streaming executor
//!
//! Drives one cancellable remote call per `filter` and exposes its rows to
//! the engine one at a time.

mod cursor;
mod errors;
mod state;

pub use cursor::PluginCursor;
pub use errors::{CursorError, CursorResult};
pub use state::CursorState;
