//! Schema subsystem
//!
//! Turns the plugin's table descriptions into local table declarations and
//! planning metadata, and holds them in a snapshot catalog.
//!
//! # Design Principles
//!
//! - Translation is pure; only a malformed schema fails
//! - Semantic column types are never lost, even when declared as TEXT
//! - Snapshots are immutable; refresh is an atomic pointer swap

mod catalog;
mod errors;
mod translator;
mod types;

pub use catalog::{RefreshOutcome, SchemaCatalog, TableSnapshot};
pub use errors::{SchemaError, SchemaResult};
pub use translator::{
    KeyColumnEntry, KeyColumnIndex, LocalColumn, LocalColumns, LocalType, SchemaTranslator,
    TranslatedTable,
};
pub use types::{
    ColumnDefinition, ColumnType, KeyColumn, KeyRequirement, Schema, SchemaMode, TableSchema,
};
