//! Error types for BCRS operations

/// Errors that can occur while building or traversing block containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BcrsError {
    /// Operation not permitted in the current build stage
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// A random-mode row received more indices than its declared size
    #[error("row {row} already holds its declared {size} indices")]
    RowFull { row: usize, size: usize },
    /// Implicit build buffered more entries than were allocated
    #[error(
        "implicit build overflow exhausted: {required} entries exceed capacity {capacity}; \
         increase the average entries per row or the overflow fraction"
    )]
    OverflowExhausted { required: usize, capacity: usize },
    /// A construction parameter is out of range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    /// Operand sizes disagree
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    /// Index out of bounds
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// Coordinate outside the sparsity pattern
    #[error("entry ({row}, {col}) is not in the sparsity pattern")]
    NotInPattern { row: usize, col: usize },
    /// Position not stored in a sparse vector
    #[error("position {index} is not stored in the sparse vector")]
    AbsentEntry { index: usize },
    /// A scalar was requested but the index stopped at a block
    #[error("index stopped at depth {depth} on a block, not a scalar")]
    NotALeaf { depth: usize },
    /// Multi-index longer than the supported recursion depth
    #[error("multi-index of length {depth} exceeds maximum depth {max}")]
    DepthExceeded { depth: usize, max: usize },
}

/// Broad classification of [`BcrsError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Misuse of the construction protocol
    StateViolation,
    /// Allocated storage was too small
    CapacityExhaustion,
    /// Rejected parameter value
    InvalidParameter,
    /// Incompatible operand sizes
    DimensionMismatch,
    /// Failed lookup inside a container
    Access,
}

impl BcrsError {
    /// Get the category of this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            BcrsError::InvalidState(_) | BcrsError::RowFull { .. } => ErrorCategory::StateViolation,
            BcrsError::OverflowExhausted { .. } => ErrorCategory::CapacityExhaustion,
            BcrsError::InvalidParameter { .. } => ErrorCategory::InvalidParameter,
            BcrsError::DimensionMismatch { .. } => ErrorCategory::DimensionMismatch,
            BcrsError::IndexOutOfBounds { .. }
            | BcrsError::NotInPattern { .. }
            | BcrsError::AbsentEntry { .. }
            | BcrsError::NotALeaf { .. }
            | BcrsError::DepthExceeded { .. } => ErrorCategory::Access,
        }
    }
}

/// Result type for BCRS operations
pub type Result<T> = core::result::Result<T, BcrsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            BcrsError::InvalidState("built").category(),
            ErrorCategory::StateViolation
        );
        assert_eq!(
            BcrsError::OverflowExhausted {
                required: 19,
                capacity: 10
            }
            .category(),
            ErrorCategory::CapacityExhaustion
        );
        assert_eq!(
            BcrsError::NotInPattern { row: 1, col: 2 }.category(),
            ErrorCategory::Access
        );
    }
}
