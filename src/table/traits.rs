//! Capability set the SQL engine drives
//!
//! One implementation per physical table; the engine only ever sees these
//! methods.

use crate::cursor::CursorResult;
use crate::planner::{ColumnMask, IndexConstraint, IndexPlan};
use crate::value::{ResultSink, SqlValue};

use super::errors::TableResult;

pub trait VirtualTable {
    type Cursor: VirtualCursor;

    /// Plans one candidate access shape. Free of side effects apart from
    /// the plan id.
    fn best_index(
        &self,
        columns_used: Option<ColumnMask>,
        constraints: &[IndexConstraint],
    ) -> TableResult<IndexPlan>;

    fn open(&self) -> TableResult<Self::Cursor>;

    fn disconnect(&self) {}

    fn destroy(&self) {}
}

pub trait VirtualCursor {
    fn filter(&mut self, plan_token: &str, values: &[SqlValue]) -> CursorResult<()>;

    fn next(&mut self) -> CursorResult<()>;

    fn eof(&self) -> bool;

    fn column(&self, index: usize, sink: &mut dyn ResultSink) -> CursorResult<()>;

    fn rowid(&self) -> CursorResult<i64>;

    fn close(&mut self);
}
