//! Remote source subsystem
//!
//! The contract the bridge needs from the plugin: a schema description and a
//! cancellable streaming execute call. Rows are pulled, never pushed into
//! the engine.

mod errors;
mod request;
mod source;
mod stream;

pub use errors::{RemoteError, RemoteResult};
pub use request::{ConnectionData, ExecuteRequest, RemoteQual, UNBOUNDED_LIMIT};
pub use source::{RemoteSource, StaticSource};
pub use stream::{channel, Row, RowSender, RowStream};
