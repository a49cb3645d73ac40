//! Pushdown planner
//!
//! Turns the engine's candidate constraints into argument-slot assignments,
//! a cost estimate and a plan token.
//!
//! Constraint handling (in input order):
//! 1. Unusable constraint: omitted, no slot
//! 2. LIMIT: next slot, recorded as the query limit
//! 3. OFFSET or rowid: omitted, no slot
//! 4. Anything else: next slot, recorded as a qual
//!
//! Planning never rejects a query. When a required key column is not
//! constrained the plan is kept at maximum cost so the engine prefers any
//! other shape.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::Serialize;

use super::columns::ColumnMask;
use super::constraint::{ConstraintOp, IndexConstraint};
use super::context::{Qual, QueryContext, QueryLimit};
use super::errors::{PlannerError, PlannerResult};
use super::operators::{QualOperator, MAX_COST};
use crate::observability::{event_enabled, log_event_with_fields, Event};
use crate::schema::{ColumnDefinition, TableSnapshot};

/// What the engine should do with one constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "usage", rename_all = "snake_case")]
pub enum ConstraintUsage {
    /// Not passed to filter; the engine evaluates it
    Omitted,
    /// Passed to filter at this 1-based slot
    Argument { argv_index: usize },
}

impl ConstraintUsage {
    pub fn argv_index(&self) -> Option<usize> {
        match self {
            ConstraintUsage::Omitted => None,
            ConstraintUsage::Argument { argv_index } => Some(*argv_index),
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, ConstraintUsage::Omitted)
    }
}

/// Result of one planning call
#[derive(Debug, Clone, Serialize)]
pub struct IndexPlan {
    pub plan_id: i64,
    pub estimated_cost: f64,
    /// One entry per input constraint, same order
    pub constraint_usage: Vec<ConstraintUsage>,
    /// Opaque token returned to the cursor at filter time
    pub plan_token: String,
    #[serde(skip)]
    pub context: QueryContext,
    /// Required key columns no constraint refers to
    pub missing_required_keys: Vec<String>,
}

impl IndexPlan {
    pub fn is_deprioritized(&self) -> bool {
        !self.missing_required_keys.is_empty()
    }
}

/// Planner for one table
///
/// Owns the plan id counter; ids are unique per table for the life of the
/// planner.
#[derive(Debug, Default)]
pub struct QueryPlanner {
    next_plan_id: AtomicI64,
}

impl QueryPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans one access shape.
    ///
    /// `columns_used` of `None` requests every column.
    pub fn plan(
        &self,
        table: &TableSnapshot,
        columns_used: Option<ColumnMask>,
        constraints: &[IndexConstraint],
    ) -> PlannerResult<IndexPlan> {
        let plan_id = self.next_plan_id.fetch_add(1, Ordering::Relaxed) + 1;

        match self.build(table, plan_id, columns_used, constraints) {
            Ok(plan) => {
                log_event_with_fields(
                    Event::PlanCreated,
                    &[
                        ("table", table.name.as_str()),
                        ("plan_id", &plan.plan_id.to_string()),
                        ("cost", &plan.estimated_cost.to_string()),
                        ("quals", &plan.context.quals.len().to_string()),
                    ],
                );
                Ok(plan)
            }
            Err(err) => {
                log_event_with_fields(
                    Event::PlanFailed,
                    &[
                        ("table", table.name.as_str()),
                        ("code", err.code()),
                        ("error", &err.to_string()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn build(
        &self,
        table: &TableSnapshot,
        plan_id: i64,
        columns_used: Option<ColumnMask>,
        constraints: &[IndexConstraint],
    ) -> PlannerResult<IndexPlan> {
        let names = table.schema.columns.iter().map(|c| c.name.as_str());
        let columns = match columns_used {
            Some(mask) => mask.select(names),
            None => names.map(str::to_string).collect(),
        };

        let mut context = QueryContext::new(columns);
        let mut usage = Vec::with_capacity(constraints.len());
        let mut estimated_cost = MAX_COST;
        let mut next_slot = 0usize;

        for (index, constraint) in constraints.iter().enumerate() {
            if event_enabled(Event::PlanConstraint) {
                log_event_with_fields(
                    Event::PlanConstraint,
                    &[
                        ("index", &index.to_string()),
                        ("column", &constraint.column.to_string()),
                        ("op", &constraint.op.code().to_string()),
                        ("usable", if constraint.usable { "true" } else { "false" }),
                    ],
                );
            }

            if !constraint.usable {
                usage.push(ConstraintUsage::Omitted);
                continue;
            }

            if constraint.op == ConstraintOp::Limit {
                next_slot += 1;
                context.limit = Some(QueryLimit::new(next_slot));
                usage.push(ConstraintUsage::Argument {
                    argv_index: next_slot,
                });
                continue;
            }

            if constraint.op.is_pseudo() || constraint.is_rowid() {
                usage.push(ConstraintUsage::Omitted);
                continue;
            }

            let column = resolve_column(table, index, constraint)?;
            let operator = QualOperator::for_constraint(constraint.op);

            let qual_cost = if table
                .translated
                .key_columns
                .supports(&column.name, operator.symbol)
            {
                operator.cost
            } else {
                MAX_COST
            };
            estimated_cost = estimated_cost.min(qual_cost);

            next_slot += 1;
            context.quals.push(Qual {
                argv_index: next_slot,
                field_name: column.name.clone(),
                operator: operator.symbol.to_string(),
                column_definition: column.clone(),
            });
            usage.push(ConstraintUsage::Argument {
                argv_index: next_slot,
            });
        }

        let missing_required_keys = missing_required_keys(table, constraints);
        if !missing_required_keys.is_empty() {
            estimated_cost = MAX_COST;
            log_event_with_fields(
                Event::PlanRequiredKeyMissing,
                &[
                    ("table", table.name.as_str()),
                    ("columns", &missing_required_keys.join(",")),
                ],
            );
        }

        let plan_token = context.encode()?;

        Ok(IndexPlan {
            plan_id,
            estimated_cost,
            constraint_usage: usage,
            plan_token,
            context,
            missing_required_keys,
        })
    }
}

fn resolve_column<'t>(
    table: &'t TableSnapshot,
    index: usize,
    constraint: &IndexConstraint,
) -> PlannerResult<&'t ColumnDefinition> {
    usize::try_from(constraint.column)
        .ok()
        .and_then(|position| table.column(position))
        .ok_or_else(|| {
            PlannerError::malformed(
                index,
                format!(
                    "column {} out of range for table '{}' with {} columns",
                    constraint.column,
                    table.name,
                    table.schema.column_count()
                ),
            )
        })
}

/// Required key columns that no column constraint refers to.
///
/// Usable and unusable constraints both count; the engine may offer the
/// predicate in another shape.
fn missing_required_keys(table: &TableSnapshot, constraints: &[IndexConstraint]) -> Vec<String> {
    let required = table.translated.key_columns.required_columns();
    if required.is_empty() {
        return Vec::new();
    }

    let referenced: HashSet<&str> = constraints
        .iter()
        .filter(|c| !c.is_rowid() && !c.op.is_pseudo())
        .filter_map(|c| usize::try_from(c.column).ok())
        .filter_map(|position| table.column(position))
        .map(|column| column.name.as_str())
        .collect();

    required
        .iter()
        .filter(|name| !referenced.contains(name.as_str()))
        .cloned()
        .collect()
}
