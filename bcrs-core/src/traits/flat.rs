//! Flat views of nested vectors and matrices
//!
//! A nested vector of dimension `n` is viewed as `n` consecutive scalars; a
//! nested matrix as a dense `rows x cols` scalar grid of which only the
//! structurally present entries are visited.

use super::element::Field;

/// Nested vector enumerable as a flat scalar sequence
pub trait FlatVector {
    /// Scalar type at the leaves
    type Scalar: Field;

    /// Flat dimension known from the type alone
    const STATIC_DIM: Option<usize>;

    /// Call `f` with every stored scalar and its flat offset
    ///
    /// Offsets start at `offset` and increase strictly. Returns the flat
    /// dimension of `self`, counting positions a sparse container does not
    /// store.
    fn flat_for_each(&self, offset: usize, f: &mut dyn FnMut(&Self::Scalar, usize)) -> usize;

    /// Mutable counterpart of [`FlatVector::flat_for_each`]
    fn flat_for_each_mut(
        &mut self,
        offset: usize,
        f: &mut dyn FnMut(&mut Self::Scalar, usize),
    ) -> usize;

    /// Flat dimension of `self`
    fn flat_dim(&self) -> usize {
        match Self::STATIC_DIM {
            Some(dim) => dim,
            None => self.flat_for_each(0, &mut |_, _| {}),
        }
    }
}

/// Nested matrix enumerable as a flat scalar grid
pub trait FlatMatrix {
    /// Scalar type at the leaves
    type Scalar: Field;

    /// Flat shape known from the type alone
    const STATIC_SHAPE: Option<(usize, usize)>;

    /// Call `f` with every structurally present scalar and its flat position
    ///
    /// Positions are offset by `(row_offset, col_offset)`. Returns the dense
    /// flat shape `(rows, cols)` of `self`.
    fn flat_for_each(
        &self,
        row_offset: usize,
        col_offset: usize,
        f: &mut dyn FnMut(&Self::Scalar, usize, usize),
    ) -> (usize, usize);

    /// Mutable counterpart of [`FlatMatrix::flat_for_each`]
    fn flat_for_each_mut(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        f: &mut dyn FnMut(&mut Self::Scalar, usize, usize),
    ) -> (usize, usize);

    /// Dense flat shape of `self`
    fn flat_shape(&self) -> (usize, usize) {
        match Self::STATIC_SHAPE {
            Some(shape) => shape,
            None => self.flat_for_each(0, 0, &mut |_, _, _| {}),
        }
    }
}
