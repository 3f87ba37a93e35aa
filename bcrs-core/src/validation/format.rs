//! Validation of implicit build parameters and buffer sizing

use crate::BcrsError;

/// Validate the implicit build parameters
///
/// The average must be positive and the overflow fraction finite and
/// non-negative.
pub fn validate_implicit_params(
    avg_entries_per_row: usize,
    overflow_fraction: f64,
) -> Result<(), BcrsError> {
    if avg_entries_per_row == 0 {
        return Err(BcrsError::InvalidParameter {
            name: "avg_entries_per_row",
            reason: "must be positive",
        });
    }
    if !overflow_fraction.is_finite() {
        return Err(BcrsError::InvalidParameter {
            name: "overflow_fraction",
            reason: "must be finite",
        });
    }
    if overflow_fraction < 0.0 {
        return Err(BcrsError::InvalidParameter {
            name: "overflow_fraction",
            reason: "must not be negative",
        });
    }
    Ok(())
}

/// Number of entries an implicit build of `rows` rows may buffer
///
/// `avg * rows` primary slots plus `floor(avg * rows * overflow_fraction)`
/// overflow slots.
pub fn implicit_capacity(rows: usize, avg_entries_per_row: usize, overflow_fraction: f64) -> usize {
    let primary = rows.saturating_mul(avg_entries_per_row);
    // truncation is floor for the non-negative fractions accepted above
    let overflow = (primary as f64 * overflow_fraction) as usize;
    primary.saturating_add(overflow)
}
