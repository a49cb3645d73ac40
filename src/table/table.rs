//! One engine-visible table backed by a plugin table

use std::sync::Arc;

use super::errors::{TableError, TableResult};
use super::traits::VirtualTable;
use crate::config::BridgeConfig;
use crate::cursor::PluginCursor;
use crate::observability::{log_event_with_fields, BridgeMetrics, Event};
use crate::planner::{ColumnMask, IndexConstraint, IndexPlan, QueryPlanner};
use crate::remote::RemoteSource;
use crate::schema::{SchemaCatalog, TableSnapshot};

pub struct PluginTable {
    name: String,
    /// Snapshot whose columns were declared to the engine
    declared: Arc<TableSnapshot>,
    catalog: Arc<SchemaCatalog>,
    source: Arc<dyn RemoteSource>,
    config: Arc<BridgeConfig>,
    metrics: Arc<BridgeMetrics>,
    planner: QueryPlanner,
}

impl PluginTable {
    pub(crate) fn new(
        declared: Arc<TableSnapshot>,
        catalog: Arc<SchemaCatalog>,
        source: Arc<dyn RemoteSource>,
        config: Arc<BridgeConfig>,
        metrics: Arc<BridgeMetrics>,
    ) -> Self {
        Self {
            name: declared.name.clone(),
            declared,
            catalog,
            source,
            config,
            metrics,
            planner: QueryPlanner::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current snapshot, as long as its columns still line up with the
    /// declaration. Engine column indexes are only meaningful against that
    /// layout.
    fn snapshot(&self) -> TableResult<Arc<TableSnapshot>> {
        let current = self.catalog.table(&self.name)?;
        if Arc::ptr_eq(&current, &self.declared) || current.same_layout(&self.declared) {
            return Ok(current);
        }

        log_event_with_fields(
            Event::TableRedeclared,
            &[
                ("current", &current.create_table_statement()),
                ("declared", &self.declared.create_table_statement()),
                ("table", self.name.as_str()),
            ],
        );
        Err(TableError::Redeclared(self.name.clone()))
    }
}

impl VirtualTable for PluginTable {
    type Cursor = PluginCursor;

    fn best_index(
        &self,
        columns_used: Option<ColumnMask>,
        constraints: &[IndexConstraint],
    ) -> TableResult<IndexPlan> {
        let snapshot = self.snapshot()?;
        let plan = self.planner.plan(&snapshot, columns_used, constraints)?;

        self.metrics.increment_plans();
        if plan.is_deprioritized() {
            self.metrics.increment_deprioritized();
        }
        Ok(plan)
    }

    /// The cursor pins the table snapshot current at open time
    fn open(&self) -> TableResult<PluginCursor> {
        let snapshot = self.snapshot()?;
        Ok(PluginCursor::open(
            snapshot,
            self.source.clone(),
            self.config.clone(),
            self.metrics.clone(),
        ))
    }
}
