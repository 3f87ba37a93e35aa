//! Flat traversal of nested vectors and matrices
//!
//! These functions visit every scalar of a nested container together with
//! its position in the flattened container. Sparse containers contribute
//! only their stored scalars but their full dimension.

use bcrs_core::{FlatMatrix, FlatVector};

/// Call `f(value, offset)` for every stored scalar of `vector`
///
/// Offsets are strictly increasing. Returns the flat dimension.
pub fn flat_vector_for_each<V, F>(vector: &V, mut f: F) -> usize
where
    V: FlatVector + ?Sized,
    F: FnMut(&V::Scalar, usize),
{
    vector.flat_for_each(0, &mut f)
}

/// Mutable counterpart of [`flat_vector_for_each`]
pub fn flat_vector_for_each_mut<V, F>(vector: &mut V, mut f: F) -> usize
where
    V: FlatVector + ?Sized,
    F: FnMut(&mut V::Scalar, usize),
{
    vector.flat_for_each_mut(0, &mut f)
}

/// Call `f(value, row, col)` for every structurally present scalar of `matrix`
///
/// Returns the dense flat shape `(rows, cols)`.
pub fn flat_matrix_for_each<M, F>(matrix: &M, mut f: F) -> (usize, usize)
where
    M: FlatMatrix + ?Sized,
    F: FnMut(&M::Scalar, usize, usize),
{
    matrix.flat_for_each(0, 0, &mut f)
}

/// Mutable counterpart of [`flat_matrix_for_each`]
pub fn flat_matrix_for_each_mut<M, F>(matrix: &mut M, mut f: F) -> (usize, usize)
where
    M: FlatMatrix + ?Sized,
    F: FnMut(&mut M::Scalar, usize, usize),
{
    matrix.flat_for_each_mut(0, 0, &mut f)
}
