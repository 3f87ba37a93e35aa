//! Block sparse matrix abstraction
//!
//! This module defines the read-only interface shared by sparse matrices
//! regardless of how their pattern was built.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Core sparse matrix trait for pattern-agnostic access
///
/// Positions are block coordinates.
pub trait SparseMatrix {
    /// The block type stored in this matrix
    type Block;

    /// Get the block at the specified position
    ///
    /// Returns `None` if the position is outside the sparsity pattern, out of
    /// bounds, or the matrix is not built.
    fn get_block(&self, row: usize, col: usize) -> Option<&Self::Block>;

    /// Get matrix dimensions in blocks as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of stored blocks
    fn nnz(&self) -> usize;
}

/// Extension trait for pattern queries (requires alloc feature)
#[cfg(feature = "alloc")]
pub trait PatternOperations: SparseMatrix {
    /// Column indices of all stored blocks in a row, ascending
    fn row_pattern(&self, row_index: usize) -> Vec<usize>;

    /// Row indices of all stored blocks in a column, ascending
    fn col_pattern(&self, col_index: usize) -> Vec<usize>;
}
