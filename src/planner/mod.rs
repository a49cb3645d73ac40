//! Pushdown planner
//!
//! Decides, for one engine planning call, which constraints are forwarded
//! to the remote source, at which argument slots, and at what cost.
//!
//! # Cost Tiers (lower is preferred)
//!
//! 1. Equality on an advertised key column
//! 2. Range comparison on an advertised key column
//! 3. Everything else, or any plan missing a required key column
//!
//! Planning is deterministic for a given table snapshot, apart from the
//! plan id.

mod columns;
mod constraint;
mod context;
mod errors;
mod operators;
mod planner;

pub use columns::{ColumnMask, COLUMN_MASK_WIDTH, OVERFLOW_BIT};
pub use constraint::{ConstraintOp, IndexConstraint, ROWID_COLUMN};
pub use context::{Qual, QueryContext, QueryLimit};
pub use errors::{PlannerError, PlannerResult};
pub use operators::{QualOperator, EQUALITY_COST, MAX_COST, NOOP, RANGE_COST};
pub use planner::{ConstraintUsage, IndexPlan, QueryPlanner};
