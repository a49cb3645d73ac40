//! Requested-column bitmask
//!
//! The engine reports used columns as a 64-bit mask. Bit `i` selects column
//! `i` for `i < 63`. Bit 63 is the overflow bit: it selects column 63 and
//! every column beyond it. Past the mask width, projection is all-or-nothing.

use serde::{Deserialize, Serialize};

/// Number of bits in the mask
pub const COLUMN_MASK_WIDTH: usize = 64;
/// Bit that stands for "column 63 and everything after it"
pub const OVERFLOW_BIT: usize = COLUMN_MASK_WIDTH - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMask(u64);

impl ColumnMask {
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Mask selecting every column
    pub fn all() -> Self {
        Self(u64::MAX)
    }

    /// Mask with the given column positions set; positions past the width
    /// set the overflow bit
    pub fn from_columns(columns: &[usize]) -> Self {
        let bits = columns
            .iter()
            .fold(0u64, |acc, &i| acc | (1u64 << i.min(OVERFLOW_BIT)));
        Self(bits)
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn is_selected(&self, index: usize) -> bool {
        let bit = index.min(OVERFLOW_BIT);
        self.0 & (1u64 << bit) != 0
    }

    /// Names of the selected columns, in declared order
    pub fn select<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .enumerate()
            .filter(|(i, _)| self.is_selected(*i))
            .map(|(_, name)| name.to_string())
            .collect()
    }
}
