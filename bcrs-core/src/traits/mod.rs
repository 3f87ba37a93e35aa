//! Abstract interfaces for block containers
//!
//! This module defines the trait abstractions used by the matrix core and the
//! traversal engines. Implementations for scalars and standard containers
//! live in [`crate::impls`].

pub mod access;
pub mod element;
pub mod flat;
pub mod matrix;
pub mod shape;

pub use access::{BlockRole, ChildVisitor, ChildVisitorMut, IndexAccess};
pub use element::Field;
pub use flat::{FlatMatrix, FlatVector};
#[cfg(feature = "alloc")]
pub use matrix::PatternOperations;
pub use matrix::SparseMatrix;
pub use shape::BlockShape;
