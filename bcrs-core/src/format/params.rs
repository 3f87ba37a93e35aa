//! Parameters of the implicit build mode

use super::constants::{DEFAULT_AVG_ENTRIES_PER_ROW, DEFAULT_OVERFLOW_FRACTION};
use crate::validation::{implicit_capacity, validate_implicit_params};
use crate::Result;

/// Sizing of the implicit build buffer
///
/// Every row owns `avg_entries_per_row` primary slots. Entries beyond that go
/// to a shared overflow region; the total number of buffered entries may not
/// exceed `avg_entries_per_row * rows * (1 + overflow_fraction)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImplicitBuildParams {
    /// Expected number of nonzero blocks per row
    pub avg_entries_per_row: usize,
    /// Extra space relative to `avg_entries_per_row * rows`
    pub overflow_fraction: f64,
}

impl ImplicitBuildParams {
    /// Create validated parameters
    pub fn new(avg_entries_per_row: usize, overflow_fraction: f64) -> Result<Self> {
        validate_implicit_params(avg_entries_per_row, overflow_fraction)?;
        Ok(Self {
            avg_entries_per_row,
            overflow_fraction,
        })
    }

    /// Set the average entries per row
    pub fn with_avg_entries_per_row(mut self, avg_entries_per_row: usize) -> Self {
        self.avg_entries_per_row = avg_entries_per_row;
        self
    }

    /// Set the overflow fraction
    pub fn with_overflow_fraction(mut self, overflow_fraction: f64) -> Self {
        self.overflow_fraction = overflow_fraction;
        self
    }

    /// Check the parameters, e.g. after builder-style updates
    pub fn validate(&self) -> Result<()> {
        validate_implicit_params(self.avg_entries_per_row, self.overflow_fraction)
    }

    /// Total number of entries a matrix with `rows` rows may buffer
    pub fn capacity(&self, rows: usize) -> usize {
        implicit_capacity(rows, self.avg_entries_per_row, self.overflow_fraction)
    }
}

impl Default for ImplicitBuildParams {
    fn default() -> Self {
        Self {
            avg_entries_per_row: DEFAULT_AVG_ENTRIES_PER_ROW,
            overflow_fraction: DEFAULT_OVERFLOW_FRACTION,
        }
    }
}
