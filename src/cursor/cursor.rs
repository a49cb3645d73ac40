//! Streaming cursor over one remote call
//!
//! A cursor is driven synchronously by the engine. `filter` issues the
//! remote call and positions on the first row; `advance` is the only other
//! call that blocks. Column reads only touch the buffered row.
//!
//! Every remote call gets a child of the cursor's root cancellation token.
//! `close` (and `Drop`) cancel the root unconditionally.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::errors::{CursorError, CursorResult};
use super::state::CursorState;
use crate::config::BridgeConfig;
use crate::observability::{log_event_with_fields, BridgeMetrics, Event};
use crate::planner::QueryContext;
use crate::remote::{ExecuteRequest, RemoteQual, RemoteSource, Row, RowStream};
use crate::schema::{ColumnType, TableSnapshot};
use crate::table::VirtualCursor;
use crate::value::{format_timestamp, QualValueMapper, RemoteValue, ResultSink, SqlValue, JSON_SUBTYPE};

/// Row index once the stream is exhausted
const EXHAUSTED_ROW: i64 = -1;

pub struct PluginCursor {
    /// Snapshot current when the cursor was opened
    table: Arc<TableSnapshot>,
    source: Arc<dyn RemoteSource>,
    config: Arc<BridgeConfig>,
    metrics: Arc<BridgeMetrics>,
    state: CursorState,
    cancel: CancellationToken,
    call_cancel: Option<CancellationToken>,
    stream: Option<RowStream>,
    current: Option<Row>,
    row_index: i64,
}

impl PluginCursor {
    pub fn open(
        table: Arc<TableSnapshot>,
        source: Arc<dyn RemoteSource>,
        config: Arc<BridgeConfig>,
        metrics: Arc<BridgeMetrics>,
    ) -> Self {
        metrics.increment_cursors_opened();
        log_event_with_fields(Event::CursorOpen, &[("table", table.name.as_str())]);

        Self {
            table,
            source,
            config,
            metrics,
            state: CursorState::Created,
            cancel: CancellationToken::new(),
            call_cancel: None,
            stream: None,
            current: None,
            row_index: 0,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn table_name(&self) -> &str {
        &self.table.name
    }

    /// Starts a remote call for `plan_token` with the engine's bound values
    /// and positions on the first row.
    ///
    /// A previous call on this cursor is cancelled first.
    pub fn filter(&mut self, plan_token: &str, values: &[SqlValue]) -> CursorResult<()> {
        if !self.state.can_filter() {
            return Err(CursorError::InvalidState {
                operation: "filter",
                state: self.state,
            });
        }
        self.release_call();
        self.state = CursorState::Filtering;
        self.row_index = 0;

        let request = match self.build_request(plan_token, values) {
            Ok(request) => request,
            Err(err) => return Err(self.fail(err)),
        };

        let call_id = request.call_id.to_string();
        self.metrics.increment_filters();
        log_event_with_fields(
            Event::CursorFilter,
            &[
                ("call_id", &call_id),
                ("columns", &request.columns.len().to_string()),
                ("limit", &request.limit.to_string()),
                ("quals", &request.qual_count().to_string()),
                ("table", self.table.name.as_str()),
            ],
        );

        let call_cancel = self.cancel.child_token();
        match self.source.execute(request, call_cancel.clone()) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.call_cancel = Some(call_cancel);
                self.state = CursorState::Streaming;
            }
            Err(err) => {
                call_cancel.cancel();
                return Err(self.fail(err.into()));
            }
        }

        self.advance()
    }

    /// Pulls the next row. A no-op once exhausted.
    pub fn advance(&mut self) -> CursorResult<()> {
        match self.state {
            CursorState::Streaming => {}
            CursorState::Exhausted => return Ok(()),
            state => {
                return Err(CursorError::InvalidState {
                    operation: "advance",
                    state,
                })
            }
        }

        let next = match self.stream.as_mut() {
            Some(stream) => stream.next_row(),
            None => None,
        };

        match next {
            Some(Ok(row)) => {
                self.current = Some(row);
                self.row_index += 1;
                self.metrics.increment_rows();
                Ok(())
            }
            Some(Err(err)) => Err(self.fail(err.into())),
            None => {
                self.current = None;
                self.row_index = EXHAUSTED_ROW;
                self.state = CursorState::Exhausted;
                self.release_call();
                log_event_with_fields(
                    Event::CursorExhausted,
                    &[("table", self.table.name.as_str())],
                );
                Ok(())
            }
        }
    }

    pub fn eof(&self) -> bool {
        self.row_index < 0
    }

    /// Writes column `index` of the current row into `sink`
    pub fn column(&self, index: usize, sink: &mut dyn ResultSink) -> CursorResult<()> {
        let definition = self
            .table
            .column(index)
            .ok_or(CursorError::ColumnOutOfRange {
                index,
                columns: self.table.schema.column_count(),
            })?;
        let row = self
            .current
            .as_ref()
            .filter(|_| self.state.is_active())
            .ok_or(CursorError::NoCurrentRow)?;

        match row.get(&definition.name) {
            Some(value) => write_value(definition.column_type, value, sink),
            None => sink.result_null(),
        }
        Ok(())
    }

    /// 1-based position of the current row; negative once exhausted
    pub fn rowid(&self) -> i64 {
        self.row_index
    }

    /// Cancels any remote call and releases the row buffer. Idempotent.
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.release_call();
        self.current = None;

        if self.state != CursorState::Closed {
            self.state = CursorState::Closed;
            self.metrics.increment_cursors_closed();
            log_event_with_fields(Event::CursorClosed, &[("table", self.table.name.as_str())]);
        }
    }

    fn build_request(&self, plan_token: &str, values: &[SqlValue]) -> CursorResult<ExecuteRequest> {
        let mut context = QueryContext::decode(plan_token)?;
        let mut request =
            ExecuteRequest::new(&self.config, self.table.name.clone(), context.columns.clone());

        if let Some(limit) = context.limit.as_mut() {
            match bound_value(values, limit.argv_index).and_then(SqlValue::as_integer) {
                Some(rows) => {
                    limit.rows = rows;
                    request.set_limit(rows);
                }
                None => log_event_with_fields(
                    Event::LimitDropped,
                    &[
                        ("slot", &limit.argv_index.to_string()),
                        ("table", self.table.name.as_str()),
                    ],
                ),
            }
        }

        for qual in &context.quals {
            let raw = bound_value(values, qual.argv_index).ok_or(CursorError::MissingArgument {
                slot: qual.argv_index,
                provided: values.len(),
            })?;
            let value = QualValueMapper::map(raw, qual.column_definition.column_type)?;
            request.push_qual(RemoteQual::new(
                qual.field_name.clone(),
                qual.operator.clone(),
                value,
            ));
        }

        Ok(request)
    }

    /// Records a failure and moves to `Errored`
    fn fail(&mut self, err: CursorError) -> CursorError {
        self.state = CursorState::Errored;
        self.current = None;
        self.release_call();

        let event = match &err {
            CursorError::Value(_) => {
                self.metrics.increment_mapping_errors();
                Event::ValueMappingFailed
            }
            CursorError::Remote(_) => {
                self.metrics.increment_stream_errors();
                Event::CursorStreamFailed
            }
            _ => {
                self.metrics.increment_filter_errors();
                Event::CursorFilterFailed
            }
        };
        log_event_with_fields(
            event,
            &[
                ("code", err.code()),
                ("error", &err.to_string()),
                ("table", self.table.name.as_str()),
            ],
        );
        err
    }

    fn release_call(&mut self) {
        if let Some(call_cancel) = self.call_cancel.take() {
            call_cancel.cancel();
        }
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
    }
}

impl Drop for PluginCursor {
    fn drop(&mut self) {
        self.close();
    }
}

impl VirtualCursor for PluginCursor {
    fn filter(&mut self, plan_token: &str, values: &[SqlValue]) -> CursorResult<()> {
        PluginCursor::filter(self, plan_token, values)
    }

    fn next(&mut self) -> CursorResult<()> {
        self.advance()
    }

    fn eof(&self) -> bool {
        PluginCursor::eof(self)
    }

    fn column(&self, index: usize, sink: &mut dyn ResultSink) -> CursorResult<()> {
        PluginCursor::column(self, index, sink)
    }

    fn rowid(&self) -> CursorResult<i64> {
        Ok(PluginCursor::rowid(self))
    }

    fn close(&mut self) {
        PluginCursor::close(self)
    }
}

/// Engine values are bound at 1-based slots
fn bound_value(values: &[SqlValue], slot: usize) -> Option<&SqlValue> {
    slot.checked_sub(1).and_then(|i| values.get(i))
}

fn write_value(column_type: ColumnType, value: &RemoteValue, sink: &mut dyn ResultSink) {
    match value {
        RemoteValue::Null => sink.result_null(),
        RemoteValue::Bool(b) => sink.result_int(i64::from(*b)),
        RemoteValue::Int(i) => sink.result_int(*i),
        RemoteValue::Double(f) => sink.result_float(*f),
        RemoteValue::Json(text) => {
            sink.result_text(text);
            sink.result_subtype(JSON_SUBTYPE);
        }
        RemoteValue::String(text) => {
            sink.result_text(text);
            if column_type == ColumnType::Json {
                sink.result_subtype(JSON_SUBTYPE);
            }
        }
        RemoteValue::Timestamp(ts) => sink.result_text(&format_timestamp(ts)),
        RemoteValue::IpAddr(ip) => sink.result_text(&ip.to_string()),
        RemoteValue::Cidr(text) | RemoteValue::Ltree(text) => sink.result_text(text),
    }
}
