//! Engine operator → plugin operator symbol and pushdown cost
//!
//! Cost tiers (lower is better):
//! 1. equality on a key column that accepts "=": 1
//! 2. range comparison on a key column that accepts it: 10
//! 3. anything else: `MAX_COST` (full remote scan)

use super::constraint::ConstraintOp;

/// Cost of a plan with no useful pushdown
pub const MAX_COST: f64 = f64::MAX;
pub const EQUALITY_COST: f64 = 1.0;
pub const RANGE_COST: f64 = 10.0;

/// Symbol for operators the plugin has no equivalent of
pub const NOOP: &str = "NOOP";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualOperator {
    pub symbol: &'static str,
    pub cost: f64,
}

impl QualOperator {
    pub fn for_constraint(op: ConstraintOp) -> Self {
        match op {
            ConstraintOp::Eq => Self::new("=", EQUALITY_COST),
            ConstraintOp::Gt => Self::new(">", RANGE_COST),
            ConstraintOp::Ge => Self::new(">=", RANGE_COST),
            ConstraintOp::Lt => Self::new("<", RANGE_COST),
            ConstraintOp::Le => Self::new("<=", RANGE_COST),
            _ => Self::new(NOOP, MAX_COST),
        }
    }

    fn new(symbol: &'static str, cost: f64) -> Self {
        Self { symbol, cost }
    }

    pub fn is_noop(&self) -> bool {
        self.symbol == NOOP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        let symbols: Vec<_> = [
            ConstraintOp::Eq,
            ConstraintOp::Gt,
            ConstraintOp::Ge,
            ConstraintOp::Lt,
            ConstraintOp::Le,
        ]
        .into_iter()
        .map(|op| QualOperator::for_constraint(op).symbol)
        .collect();
        assert_eq!(symbols, vec!["=", ">", ">=", "<", "<="]);
    }

    #[test]
    fn test_equality_cheaper_than_range() {
        assert!(
            QualOperator::for_constraint(ConstraintOp::Eq).cost
                < QualOperator::for_constraint(ConstraintOp::Lt).cost
        );
    }

    #[test]
    fn test_unsupported_is_noop() {
        for op in [ConstraintOp::Like, ConstraintOp::Ne, ConstraintOp::Other(150)] {
            let q = QualOperator::for_constraint(op);
            assert!(q.is_noop());
            assert_eq!(q.cost, MAX_COST);
        }
    }
}
