//! Engine-facing tables
//!
//! `PluginModule` owns the schema catalog, the remote source and the
//! shared counters. Each `PluginTable` plans against the catalog's current
//! snapshot while its columns match the ones declared at connect; each
//! cursor pins the snapshot it opened with.

mod errors;
mod module;
mod table;
mod traits;

pub use errors::{TableError, TableResult};
pub use module::PluginModule;
pub use table::PluginTable;
pub use traits::{VirtualCursor, VirtualTable};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::BridgeConfig;
    use crate::planner::{IndexConstraint, MAX_COST};
    use crate::remote::{RemoteError, RemoteSource, Row, StaticSource};
    use crate::schema::{
        ColumnDefinition, ColumnType, KeyColumn, RefreshOutcome, Schema, SchemaMode, TableSchema,
    };
    use crate::value::{CapturedResult, RemoteValue, SqlValue};

    fn regions_schema(mode: SchemaMode) -> Schema {
        Schema::new(mode).with_table(
            "regions",
            TableSchema::new(vec![
                ColumnDefinition::new("name", ColumnType::String),
                ColumnDefinition::new("enabled", ColumnType::Bool),
            ])
            .with_key_column(KeyColumn::required("name")),
        )
    }

    fn module(source: StaticSource) -> (PluginModule, Arc<StaticSource>) {
        let source = Arc::new(source);
        let remote: Arc<dyn RemoteSource> = source.clone();
        let module = PluginModule::load(remote, BridgeConfig::for_connection("cloud")).unwrap();
        (module, source)
    }

    #[test]
    fn test_connect_declares_table() {
        let (module, _) = module(StaticSource::new(regions_schema(SchemaMode::Static)));
        let (table, declaration) = module.connect("regions").unwrap();

        assert_eq!(table.name(), "regions");
        assert_eq!(
            declaration,
            "CREATE TABLE regions(name TEXT, enabled INTEGER)"
        );
        assert_eq!(module.connect("nope").err().unwrap().code(), "SCHEMA_UNKNOWN_TABLE");
    }

    #[test]
    fn test_plan_open_read() {
        let rows = vec![Row::new()
            .with("name", RemoteValue::String("eu-west-1".into()))
            .with("enabled", RemoteValue::Bool(false))];
        let (module, source) = module(
            StaticSource::new(regions_schema(SchemaMode::Static)).with_rows("regions", rows),
        );
        let (table, _) = module.connect("regions").unwrap();

        let plan = table.best_index(None, &[IndexConstraint::eq(0)]).unwrap();
        assert_eq!(plan.estimated_cost, 1.0);

        let mut cursor = table.open().unwrap();
        VirtualCursor::filter(&mut cursor, &plan.plan_token, &[SqlValue::Text("eu-west-1".into())])
            .unwrap();
        assert!(!VirtualCursor::eof(&cursor));

        let mut sink = CapturedResult::new();
        VirtualCursor::column(&cursor, 1, &mut sink).unwrap();
        assert_eq!(sink.value, Some(SqlValue::Integer(0)));
        assert_eq!(VirtualCursor::rowid(&cursor).unwrap(), 1);

        VirtualCursor::next(&mut cursor).unwrap();
        assert!(VirtualCursor::eof(&cursor));
        VirtualCursor::close(&mut cursor);

        let request = source.last_request().unwrap();
        assert_eq!(request.connection, "cloud");
        assert_eq!(
            request.quals_for("name")[0].value,
            RemoteValue::String("eu-west-1".into())
        );

        let metrics = module.metrics();
        assert_eq!(metrics.plans_created, 1);
        assert_eq!(metrics.open_cursors(), 0);
    }

    #[test]
    fn test_missing_required_key_counted() {
        let (module, _) = module(StaticSource::new(regions_schema(SchemaMode::Static)));
        let (table, _) = module.connect("regions").unwrap();

        let plan = table.best_index(None, &[]).unwrap();
        assert_eq!(plan.estimated_cost, MAX_COST);
        assert_eq!(module.metrics().plans_deprioritized, 1);
    }

    #[test]
    fn test_static_refresh_skipped() {
        let (module, _) = module(StaticSource::new(regions_schema(SchemaMode::Static)));
        assert_eq!(module.refresh().unwrap(), RefreshOutcome::Skipped);
        assert_eq!(module.table_names(), vec!["regions"]);
    }

    #[test]
    fn test_dynamic_refresh_replaces() {
        let (module, _) = module(StaticSource::new(regions_schema(SchemaMode::Dynamic)));
        assert_eq!(module.refresh().unwrap(), RefreshOutcome::Replaced);
    }

    /// Source whose schema can be swapped between refreshes
    struct ShiftingSource {
        schema: std::sync::Mutex<Schema>,
    }

    impl ShiftingSource {
        fn new(schema: Schema) -> Self {
            Self {
                schema: std::sync::Mutex::new(schema),
            }
        }

        fn replace(&self, schema: Schema) {
            *self.schema.lock().unwrap() = schema;
        }
    }

    impl RemoteSource for ShiftingSource {
        fn get_schema(&self, _connection: &str) -> crate::remote::RemoteResult<Schema> {
            Ok(self.schema.lock().unwrap().clone())
        }

        fn execute(
            &self,
            _request: crate::remote::ExecuteRequest,
            _cancel: tokio_util::sync::CancellationToken,
        ) -> crate::remote::RemoteResult<crate::remote::RowStream> {
            let (_, stream) = crate::remote::channel(1);
            Ok(stream)
        }
    }

    fn two_columns(columns: Vec<ColumnDefinition>) -> Schema {
        Schema::new(SchemaMode::Dynamic).with_table("t", TableSchema::new(columns))
    }

    #[test]
    fn test_reordered_refresh_rejects_stale_table() {
        let source = Arc::new(ShiftingSource::new(two_columns(vec![
            ColumnDefinition::new("a", ColumnType::Int),
            ColumnDefinition::new("b", ColumnType::String),
        ])));
        let remote: Arc<dyn RemoteSource> = source.clone();
        let module = PluginModule::load(remote, BridgeConfig::default()).unwrap();
        let (table, declaration) = module.connect("t").unwrap();
        assert_eq!(declaration, "CREATE TABLE t(a INTEGER, b TEXT)");

        source.replace(two_columns(vec![
            ColumnDefinition::new("x", ColumnType::Cidr),
            ColumnDefinition::new("a", ColumnType::Int),
            ColumnDefinition::new("b", ColumnType::String),
        ]));
        assert_eq!(module.refresh().unwrap(), RefreshOutcome::Replaced);

        let err = table.best_index(None, &[IndexConstraint::eq(0)]).unwrap_err();
        assert_eq!(err.code(), "TABLE_REDECLARED");
        assert_eq!(table.open().err().unwrap().code(), "TABLE_REDECLARED");

        // Reconnecting declares the new layout
        let (table, declaration) = module.connect("t").unwrap();
        assert_eq!(declaration, "CREATE TABLE t(x TEXT, a INTEGER, b TEXT)");
        let plan = table.best_index(None, &[IndexConstraint::eq(1)]).unwrap();
        assert_eq!(plan.context.quals[0].field_name, "a");
    }

    #[test]
    fn test_refresh_with_same_columns_keeps_table() {
        let columns = vec![
            ColumnDefinition::new("a", ColumnType::Int),
            ColumnDefinition::new("b", ColumnType::String),
        ];
        let source = Arc::new(ShiftingSource::new(two_columns(columns.clone())));
        let remote: Arc<dyn RemoteSource> = source.clone();
        let module = PluginModule::load(remote, BridgeConfig::default()).unwrap();
        let (table, _) = module.connect("t").unwrap();

        source.replace(
            Schema::new(SchemaMode::Dynamic).with_table(
                "t",
                TableSchema::new(columns).with_key_column(KeyColumn::optional("a")),
            ),
        );
        module.refresh().unwrap();

        // The refreshed key column is picked up
        let plan = table.best_index(None, &[IndexConstraint::eq(0)]).unwrap();
        assert_eq!(plan.estimated_cost, 1.0);
        assert_eq!(plan.context.quals[0].field_name, "a");
        assert!(table.open().is_ok());
    }

    #[test]
    fn test_dropped_table_unknown_after_refresh() {
        let source = Arc::new(ShiftingSource::new(two_columns(vec![ColumnDefinition::new(
            "a",
            ColumnType::Int,
        )])));
        let remote: Arc<dyn RemoteSource> = source.clone();
        let module = PluginModule::load(remote, BridgeConfig::default()).unwrap();
        let (table, _) = module.connect("t").unwrap();

        source.replace(Schema::new(SchemaMode::Dynamic));
        module.refresh().unwrap();

        assert_eq!(
            table.best_index(None, &[]).unwrap_err().code(),
            "SCHEMA_UNKNOWN_TABLE"
        );
    }

    #[test]
    fn test_load_propagates_schema_error() {
        struct Unavailable;

        impl RemoteSource for Unavailable {
            fn get_schema(&self, connection: &str) -> crate::remote::RemoteResult<Schema> {
                Err(RemoteError::SchemaUnavailable {
                    connection: connection.to_string(),
                    reason: "plugin not running".into(),
                })
            }

            fn execute(
                &self,
                _request: crate::remote::ExecuteRequest,
                _cancel: tokio_util::sync::CancellationToken,
            ) -> crate::remote::RemoteResult<crate::remote::RowStream> {
                Err(RemoteError::Cancelled)
            }
        }

        let err = PluginModule::load(Arc::new(Unavailable), BridgeConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.code(), "REMOTE_SCHEMA_UNAVAILABLE");
    }
}
