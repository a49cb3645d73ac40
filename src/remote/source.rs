//! Outbound remote source contract

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;

use tokio_util::sync::CancellationToken;

use super::errors::{RemoteError, RemoteResult};
use super::request::ExecuteRequest;
use super::stream::{channel, Row, RowStream};
use crate::schema::Schema;

/// The plugin side of the bridge
///
/// `execute` returns as soon as the call is established; rows arrive on the
/// stream. Implementations stop producing once `cancel` fires.
pub trait RemoteSource: Send + Sync {
    fn get_schema(&self, connection: &str) -> RemoteResult<Schema>;

    fn execute(&self, request: ExecuteRequest, cancel: CancellationToken)
        -> RemoteResult<RowStream>;
}

/// In-memory source that replays canned rows
///
/// Every request is recorded. A non-negative request limit truncates the
/// replayed rows, as a real plugin would. Rows go through a channel sized
/// by the request's `stream_buffer`; when they do not fit, a producer
/// thread feeds them until the stream closes or the call is cancelled.
#[derive(Debug, Default)]
pub struct StaticSource {
    schema: Schema,
    rows: HashMap<String, Vec<RemoteResult<Row>>>,
    execute_error: Option<RemoteError>,
    requests: Mutex<Vec<ExecuteRequest>>,
}

impl StaticSource {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            ..Default::default()
        }
    }

    pub fn with_rows(mut self, table: impl Into<String>, rows: Vec<Row>) -> Self {
        self.rows
            .insert(table.into(), rows.into_iter().map(Ok).collect());
        self
    }

    /// Rows followed by a stream error
    pub fn with_rows_then_error(
        mut self,
        table: impl Into<String>,
        rows: Vec<Row>,
        error: RemoteError,
    ) -> Self {
        let mut items: Vec<RemoteResult<Row>> = rows.into_iter().map(Ok).collect();
        items.push(Err(error));
        self.rows.insert(table.into(), items);
        self
    }

    /// Every execute call fails up front
    pub fn failing_execute(mut self, error: RemoteError) -> Self {
        self.execute_error = Some(error);
        self
    }

    pub fn requests(&self) -> Vec<ExecuteRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn last_request(&self) -> Option<ExecuteRequest> {
        self.requests
            .lock()
            .ok()
            .and_then(|requests| requests.last().cloned())
    }
}

impl RemoteSource for StaticSource {
    fn get_schema(&self, _connection: &str) -> RemoteResult<Schema> {
        Ok(self.schema.clone())
    }

    fn execute(
        &self,
        request: ExecuteRequest,
        cancel: CancellationToken,
    ) -> RemoteResult<RowStream> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if cancel.is_cancelled() {
            return Err(RemoteError::Cancelled);
        }
        if let Some(err) = &self.execute_error {
            return Err(err.clone());
        }

        let mut items = self.rows.get(&request.table).cloned().unwrap_or_default();
        if request.is_bounded() {
            let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
            let rows_before_error = items.iter().take_while(|item| item.is_ok()).count();
            if limit < rows_before_error {
                items.truncate(limit);
            }
        }
        if items.len() <= request.stream_buffer {
            let (sender, stream) = channel(request.stream_buffer);
            for item in items {
                // Capacity covers every item
                let _ = sender.try_send(item);
            }
            return Ok(stream);
        }

        let (sender, stream) = channel(request.stream_buffer);
        thread::spawn(move || {
            for item in items {
                if cancel.is_cancelled() || sender.blocking_send(item).is_err() {
                    break;
                }
            }
        });
        Ok(stream)
    }
}
