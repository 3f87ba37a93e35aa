//! BCRS - Block Compressed Row Storage with Hierarchical Traversal
//!
//! This library provides block sparse matrices whose entries may themselves
//! be blocks, together with generic engines that walk arbitrarily nested
//! vectors and matrices by multi-index or as flat scalar sequences.
//!
//! ## Architecture
//!
//! BCRS follows a clean definition/implementation separation:
//!
//! - **bcrs-core**: Build modes, parameters, errors, container traits and
//!   multi-indices (`no_std`, no matrix logic)
//! - **bcrs**: The matrix, its build protocols, block types and the
//!   traversal engines
//!
//! ## Quick Start
//!
//! ```rust
//! use bcrs::{BcrsMatrix, Result};
//!
//! fn example() -> Result<()> {
//!     // Assemble a tridiagonal-ish matrix in any order
//!     let mut matrix = BcrsMatrix::<f64>::implicit(3, 3, 2, 0.1)?;
//!     for i in (0..3).rev() {
//!         *matrix.entry(i, i)? += 2.0;
//!         if i > 0 {
//!             *matrix.entry(i, i - 1)? -= 1.0;
//!         }
//!     }
//!     let stats = matrix.compress()?;
//!     assert_eq!(stats.maximum, 2);
//!     assert_eq!(matrix.get(1, 0)?, &-1.0);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Three build modes**: fixed patterns from a [`MatrixIndexSet`], random
//!   row-size/index declaration, implicit buffered insertion with overflow
//! - **Multi-index access**: reach any sub-block of a nested container with
//!   [`apply_at_index`] and friends
//! - **Flat traversal**: [`flat_vector_for_each`] and
//!   [`flat_matrix_for_each`] across static, dynamic, sparse and
//!   heterogeneous nesting
//! - **Solver export**: scalar CSR/CSC arrays via [`to_scalar_csr`] and
//!   [`to_scalar_csc`]

// Re-export core abstractions and format definitions
pub use bcrs_core::{
    // Core traits
    BlockRole, BlockShape, ChildVisitor, ChildVisitorMut, Field, FlatMatrix, FlatVector,
    IndexAccess, PatternOperations, SparseMatrix,
    // Format definitions
    BuildMode, BuildStage, CompressionStatistics, DataType, ImplicitBuildParams, MatrixFormat,
    // Multi-indices
    IndexPath, MultiIndex,
    // Error handling
    BcrsError, ErrorCategory, Result,
};

// Implementation modules
pub mod access;
pub mod blocks;
pub mod export;
pub mod foreach;
pub mod index_set;
pub mod matrix;
pub mod multitype;
pub mod scalar_product;
pub mod size;
pub mod sparse_vector;

// Public exports
pub use access::{
    apply_at_index, apply_at_index_mut, apply_at_index_zip, for_each_index, for_each_index_mut,
    set_at, value_at, AtIndex, AtIndexMut, AtIndexZip, IndexCursor,
};
pub use blocks::{DynMatrix, FieldMatrix};
pub use export::{to_scalar_csc, to_scalar_csr, ScalarCompressed};
pub use foreach::{
    flat_matrix_for_each, flat_matrix_for_each_mut, flat_vector_for_each,
    flat_vector_for_each_mut,
};
pub use index_set::MatrixIndexSet;
pub use matrix::{BcrsMatrix, CsrView, ImplicitMatrixBuilder, ImplicitRow, Row, RowMut};
pub use multitype::{FlatMatrixRow, MultiTypeBlockMatrix, MultiTypeBlockVector};
pub use scalar_product::{
    axpy, dot, dot_skipping, fill, flat_mv, infinity_norm, masked_dot, scale, two_norm,
    two_norm2,
};
pub use size::{num_cols, num_entries, num_rows};
pub use sparse_vector::SparseVector;
