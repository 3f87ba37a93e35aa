//! Format constants for BCRS containers

/// Maximum nesting depth walked by the multi-index access engine
pub const MAX_DEPTH: usize = 16;

/// Overflow fraction used when none is given explicitly
pub const DEFAULT_OVERFLOW_FRACTION: f64 = 0.1;

/// Average entries per row used when none is given explicitly
pub const DEFAULT_AVG_ENTRIES_PER_ROW: usize = 8;
