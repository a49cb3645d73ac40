//! Atomically swappable schema snapshots
//!
//! The catalog is initialised once and replaced wholesale on refresh.
//! Readers take an `Arc` to the snapshot current at call time and keep it;
//! a refresh never mutates a snapshot somebody else holds.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::errors::{SchemaError, SchemaResult};
use super::translator::{SchemaTranslator, TranslatedTable};
use super::types::{ColumnDefinition, Schema, SchemaMode, TableSchema};
use crate::observability::{log_event_with_fields, Event};

/// One table's schema plus its translation
#[derive(Debug)]
pub struct TableSnapshot {
    pub name: String,
    pub schema: TableSchema,
    pub translated: TranslatedTable,
}

impl TableSnapshot {
    pub fn new(name: impl Into<String>, schema: TableSchema) -> SchemaResult<Self> {
        let name = name.into();
        let translated = SchemaTranslator::translate(&name, &schema)?;
        Ok(Self {
            name,
            schema,
            translated,
        })
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDefinition> {
        self.schema.column(index)
    }

    pub fn create_table_statement(&self) -> String {
        self.translated.columns.create_table_statement(&self.name)
    }

    /// Same column names and types at the same positions
    pub fn same_layout(&self, other: &TableSnapshot) -> bool {
        let columns = &self.schema.columns;
        let others = &other.schema.columns;
        columns.len() == others.len()
            && columns
                .iter()
                .zip(others)
                .all(|(a, b)| a.name == b.name && a.column_type == b.column_type)
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    mode: SchemaMode,
    tables: BTreeMap<String, Arc<TableSnapshot>>,
}

impl CatalogState {
    fn build(schema: &Schema) -> SchemaResult<Self> {
        let mut tables = BTreeMap::new();
        for (name, table) in &schema.tables {
            tables.insert(
                name.clone(),
                Arc::new(TableSnapshot::new(name.clone(), table.clone())?),
            );
        }
        Ok(Self {
            mode: schema.mode,
            tables,
        })
    }
}

/// What a refresh did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New snapshot published
    Replaced,
    /// Static schema already loaded; nothing changed
    Skipped,
}

/// Shared, read-mostly schema catalog
#[derive(Debug)]
pub struct SchemaCatalog {
    state: ArcSwap<CatalogState>,
    loaded: AtomicBool,
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl SchemaCatalog {
    /// Catalog with no tables
    pub fn empty() -> Self {
        Self {
            state: ArcSwap::from_pointee(CatalogState::default()),
            loaded: AtomicBool::new(false),
        }
    }

    /// Catalog loaded from `schema`; fails if any table is malformed
    pub fn new(schema: &Schema) -> SchemaResult<Self> {
        let catalog = Self::empty();
        catalog.publish(schema)?;
        Ok(catalog)
    }

    /// Translates and publishes `schema` unconditionally
    pub fn publish(&self, schema: &Schema) -> SchemaResult<()> {
        let state = CatalogState::build(schema)?;
        let count = state.tables.len().to_string();
        self.state.store(Arc::new(state));
        let first = !self.loaded.swap(true, Ordering::AcqRel);
        let event = if first {
            Event::SchemaLoaded
        } else {
            Event::SchemaRefreshed
        };
        log_event_with_fields(event, &[("tables", &count)]);
        Ok(())
    }

    /// Publishes a re-fetched schema.
    ///
    /// Static schemas are only ever loaded once; dynamic ones replace the
    /// current snapshot.
    pub fn refresh(&self, schema: &Schema) -> SchemaResult<RefreshOutcome> {
        if self.is_loaded() && schema.mode == SchemaMode::Static {
            log_event_with_fields(Event::SchemaRefreshSkipped, &[("mode", "static")]);
            return Ok(RefreshOutcome::Skipped);
        }
        self.publish(schema)?;
        Ok(RefreshOutcome::Replaced)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub fn mode(&self) -> SchemaMode {
        self.state.load().mode
    }

    /// Snapshot of one table as of now
    pub fn table(&self, name: &str) -> SchemaResult<Arc<TableSnapshot>> {
        self.state
            .load()
            .tables
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))
    }

    /// Table names in the current snapshot, sorted
    pub fn table_names(&self) -> Vec<String> {
        self.state.load().tables.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ColumnType;

    fn schema_with(mode: SchemaMode, tables: &[&str]) -> Schema {
        tables.iter().fold(Schema::new(mode), |schema, name| {
            schema.with_table(
                *name,
                TableSchema::new(vec![ColumnDefinition::new("id", ColumnType::Int)]),
            )
        })
    }

    #[test]
    fn test_lookup_tables() {
        let catalog = SchemaCatalog::new(&schema_with(SchemaMode::Static, &["b", "a"])).unwrap();
        assert_eq!(catalog.table_names(), vec!["a", "b"]);
        assert_eq!(catalog.table("a").unwrap().name, "a");
        assert_eq!(
            catalog.table("c").unwrap_err(),
            SchemaError::UnknownTable("c".into())
        );
    }

    #[test]
    fn test_static_refresh_skipped() {
        let catalog = SchemaCatalog::new(&schema_with(SchemaMode::Static, &["a"])).unwrap();
        let outcome = catalog
            .refresh(&schema_with(SchemaMode::Static, &["z"]))
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert!(catalog.table("a").is_ok());
    }

    #[test]
    fn test_dynamic_refresh_keeps_pinned_snapshot() {
        let catalog = SchemaCatalog::new(&schema_with(SchemaMode::Dynamic, &["a"])).unwrap();
        let pinned = catalog.table("a").unwrap();

        let outcome = catalog
            .refresh(&schema_with(SchemaMode::Dynamic, &["b"]))
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Replaced);

        // New lookups see the replacement; the old snapshot is still intact
        assert!(catalog.table("a").is_err());
        assert!(catalog.table("b").is_ok());
        assert_eq!(pinned.column(0).unwrap().name, "id");
    }

    #[test]
    fn test_same_layout() {
        let columns = vec![
            ColumnDefinition::new("a", ColumnType::Int),
            ColumnDefinition::new("b", ColumnType::String),
        ];
        let base = TableSnapshot::new("t", TableSchema::new(columns.clone())).unwrap();

        let mut described = columns.clone();
        described[0].description = Some("primary".into());
        let described = TableSnapshot::new("t", TableSchema::new(described)).unwrap();
        assert!(base.same_layout(&described));

        let mut reordered = columns.clone();
        reordered.reverse();
        let reordered = TableSnapshot::new("t", TableSchema::new(reordered)).unwrap();
        assert!(!base.same_layout(&reordered));

        let mut retyped = columns;
        retyped[1].column_type = ColumnType::Cidr;
        let retyped = TableSnapshot::new("t", TableSchema::new(retyped)).unwrap();
        assert!(!base.same_layout(&retyped));
    }

    #[test]
    fn test_first_refresh_publishes_even_if_static() {
        let catalog = SchemaCatalog::empty();
        assert!(!catalog.is_loaded());

        let outcome = catalog
            .refresh(&schema_with(SchemaMode::Static, &["a"]))
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Replaced);
        assert!(catalog.is_loaded());
    }

    #[test]
    fn test_malformed_schema_keeps_previous_snapshot() {
        let catalog = SchemaCatalog::new(&schema_with(SchemaMode::Dynamic, &["a"])).unwrap();
        let broken = Schema::new(SchemaMode::Dynamic).with_table(
            "bad",
            TableSchema::new(vec![ColumnDefinition::new("", ColumnType::Int)]),
        );

        assert!(catalog.refresh(&broken).is_err());
        assert!(catalog.table("a").is_ok());
    }
}
