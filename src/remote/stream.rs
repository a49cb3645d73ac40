//! Pull-based row stream
//!
//! The remote producer pushes rows into a bounded channel; the cursor pulls
//! them one at a time. A closed channel is end-of-stream. Errors travel in
//! band and end iteration for the consumer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::errors::RemoteResult;
use crate::value::RemoteValue;

/// One remote row, keyed by column name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: HashMap<String, RemoteValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: RemoteValue) -> Self {
        self.columns.insert(column.into(), value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: RemoteValue) {
        self.columns.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&RemoteValue> {
        self.columns.get(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Producer half handed to the remote source
pub type RowSender = mpsc::Sender<RemoteResult<Row>>;

/// Consumer half held by a cursor
#[derive(Debug)]
pub struct RowStream {
    receiver: mpsc::Receiver<RemoteResult<Row>>,
    capacity: usize,
}

/// Bounded row channel; a zero capacity is raised to one
pub fn channel(capacity: usize) -> (RowSender, RowStream) {
    let capacity = capacity.max(1);
    let (sender, receiver) = mpsc::channel(capacity);
    (sender, RowStream { receiver, capacity })
}

impl RowStream {
    /// Blocks until the next item or end-of-stream (`None`).
    ///
    /// Must not be called from inside an async runtime.
    pub fn next_row(&mut self) -> Option<RemoteResult<Row>> {
        self.receiver.blocking_recv()
    }

    /// Rows the producer may buffer ahead of the consumer
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stops accepting rows; buffered rows are discarded with the stream
    pub fn close(&mut self) {
        self.receiver.close();
    }
}
