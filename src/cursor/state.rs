//! Cursor lifecycle states

use std::fmt;

/// `Created → Filtering → Streaming → (Exhausted | Closed | Errored)`
///
/// `Closed` is reachable from every state. `filter` may restart a cursor
/// from any state except `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Created,
    /// Request being built and issued
    Filtering,
    Streaming,
    Exhausted,
    Errored,
    Closed,
}

impl CursorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorState::Created => "created",
            CursorState::Filtering => "filtering",
            CursorState::Streaming => "streaming",
            CursorState::Exhausted => "exhausted",
            CursorState::Errored => "errored",
            CursorState::Closed => "closed",
        }
    }

    pub fn can_filter(&self) -> bool {
        !matches!(self, CursorState::Closed)
    }

    /// States where a row may be current
    pub fn is_active(&self) -> bool {
        matches!(self, CursorState::Streaming)
    }
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
