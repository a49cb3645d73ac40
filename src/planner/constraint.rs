//! Engine-supplied constraints for one planning call

use serde::{Deserialize, Serialize};

/// Column index the engine uses for the implicit row identifier
pub const ROWID_COLUMN: i32 = -1;

/// Constraint operator as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintOp {
    Eq,
    Gt,
    Le,
    Lt,
    Ge,
    Match,
    Like,
    Glob,
    Regexp,
    Ne,
    IsNot,
    IsNotNull,
    IsNull,
    Is,
    /// Row-limit pseudo-constraint
    Limit,
    /// Row-offset pseudo-constraint
    Offset,
    /// Any code this crate does not name
    Other(u8),
}

impl ConstraintOp {
    /// Decodes the engine's numeric operator code
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => ConstraintOp::Eq,
            4 => ConstraintOp::Gt,
            8 => ConstraintOp::Le,
            16 => ConstraintOp::Lt,
            32 => ConstraintOp::Ge,
            64 => ConstraintOp::Match,
            65 => ConstraintOp::Like,
            66 => ConstraintOp::Glob,
            67 => ConstraintOp::Regexp,
            68 => ConstraintOp::Ne,
            69 => ConstraintOp::IsNot,
            70 => ConstraintOp::IsNotNull,
            71 => ConstraintOp::IsNull,
            72 => ConstraintOp::Is,
            73 => ConstraintOp::Limit,
            74 => ConstraintOp::Offset,
            other => ConstraintOp::Other(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            ConstraintOp::Eq => 2,
            ConstraintOp::Gt => 4,
            ConstraintOp::Le => 8,
            ConstraintOp::Lt => 16,
            ConstraintOp::Ge => 32,
            ConstraintOp::Match => 64,
            ConstraintOp::Like => 65,
            ConstraintOp::Glob => 66,
            ConstraintOp::Regexp => 67,
            ConstraintOp::Ne => 68,
            ConstraintOp::IsNot => 69,
            ConstraintOp::IsNotNull => 70,
            ConstraintOp::IsNull => 71,
            ConstraintOp::Is => 72,
            ConstraintOp::Limit => 73,
            ConstraintOp::Offset => 74,
            ConstraintOp::Other(code) => *code,
        }
    }

    /// LIMIT and OFFSET do not refer to a column
    pub fn is_pseudo(&self) -> bool {
        matches!(self, ConstraintOp::Limit | ConstraintOp::Offset)
    }
}

/// One candidate predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConstraint {
    /// Declared column position, or `ROWID_COLUMN`
    pub column: i32,
    pub op: ConstraintOp,
    #[serde(default = "default_usable")]
    pub usable: bool,
}

fn default_usable() -> bool {
    true
}

impl IndexConstraint {
    pub fn new(column: i32, op: ConstraintOp) -> Self {
        Self {
            column,
            op,
            usable: true,
        }
    }

    pub fn eq(column: i32) -> Self {
        Self::new(column, ConstraintOp::Eq)
    }

    pub fn limit() -> Self {
        Self::new(0, ConstraintOp::Limit)
    }

    pub fn rowid(op: ConstraintOp) -> Self {
        Self::new(ROWID_COLUMN, op)
    }

    pub fn unusable(mut self) -> Self {
        self.usable = false;
        self
    }

    pub fn is_rowid(&self) -> bool {
        self.column == ROWID_COLUMN
    }
}
