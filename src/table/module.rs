//! Module: the set of tables one plugin connection exposes

use std::sync::Arc;

use super::errors::TableResult;
use super::table::PluginTable;
use crate::config::BridgeConfig;
use crate::observability::{BridgeMetrics, MetricsSnapshot};
use crate::remote::RemoteSource;
use crate::schema::{RefreshOutcome, SchemaCatalog};

pub struct PluginModule {
    catalog: Arc<SchemaCatalog>,
    source: Arc<dyn RemoteSource>,
    config: Arc<BridgeConfig>,
    metrics: Arc<BridgeMetrics>,
}

impl PluginModule {
    /// Fetches the connection's schema and publishes it
    pub fn load(source: Arc<dyn RemoteSource>, config: BridgeConfig) -> TableResult<Self> {
        let schema = source.get_schema(&config.connection)?;
        let catalog = SchemaCatalog::new(&schema)?;
        Ok(Self {
            catalog: Arc::new(catalog),
            source,
            config: Arc::new(config),
            metrics: Arc::new(BridgeMetrics::new()),
        })
    }

    /// Re-fetches the schema; only dynamic schemas replace the snapshot
    pub fn refresh(&self) -> TableResult<RefreshOutcome> {
        let schema = self.source.get_schema(&self.config.connection)?;
        Ok(self.catalog.refresh(&schema)?)
    }

    /// Creates the engine table for `table` and its declaration.
    ///
    /// The table stays bound to the columns declared here. After a refresh
    /// that changes them it fails with `TABLE_REDECLARED` until it is
    /// connected again.
    pub fn connect(&self, table: &str) -> TableResult<(PluginTable, String)> {
        let snapshot = self.catalog.table(table)?;
        let declaration = snapshot.create_table_statement();
        let table = PluginTable::new(
            snapshot,
            self.catalog.clone(),
            self.source.clone(),
            self.config.clone(),
            self.metrics.clone(),
        );
        Ok((table, declaration))
    }

    pub fn table_names(&self) -> Vec<String> {
        self.catalog.table_names()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
