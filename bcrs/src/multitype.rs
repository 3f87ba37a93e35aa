//! Heterogeneous block containers
//!
//! [`MultiTypeBlockVector`] and [`MultiTypeBlockMatrix`] wrap tuples whose
//! positions have different types. Position `i` is dispatched by a `match`
//! over the tuple fields rather than by a loop, and all positions must share
//! one scalar type. Implementations exist for tuples of one to eight
//! positions.

use bcrs_core::{
    BcrsError, BlockRole, BlockShape, ChildVisitor, ChildVisitorMut, Field, FlatMatrix,
    FlatVector, IndexAccess, Result,
};

/// Block vector whose blocks have distinct types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiTypeBlockVector<T>(pub T);

/// Block matrix whose rows have distinct types
///
/// Every row is a [`MultiTypeBlockVector`] of matrix blocks. Block-row
/// heights are taken from the first block of each row and block-column
/// widths from the first row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiTypeBlockMatrix<T>(pub T);

/// One row of a [`MultiTypeBlockMatrix`] viewed as flat scalars
pub trait FlatMatrixRow {
    /// Scalar type at the leaves
    type Scalar: Field;

    /// Flat width of every block of the row
    fn block_widths(&self) -> Vec<usize>;

    /// Visit every scalar of the row
    ///
    /// `col_starts[k]` is the flat column where block `k` starts. Returns the
    /// flat height of the row.
    fn flat_row_for_each(
        &self,
        row_offset: usize,
        col_starts: &[usize],
        f: &mut dyn FnMut(&Self::Scalar, usize, usize),
    ) -> usize;

    /// Mutable counterpart of [`FlatMatrixRow::flat_row_for_each`]
    fn flat_row_for_each_mut(
        &mut self,
        row_offset: usize,
        col_starts: &[usize],
        f: &mut dyn FnMut(&mut Self::Scalar, usize, usize),
    ) -> usize;
}

const fn sum_static_dims(dims: &[Option<usize>]) -> Option<usize> {
    let mut total = 0;
    let mut k = 0;
    while k < dims.len() {
        match dims[k] {
            Some(dim) => total += dim,
            None => return None,
        }
        k += 1;
    }
    Some(total)
}

fn column_starts(col_offset: usize, widths: &[usize]) -> Vec<usize> {
    let mut starts = Vec::with_capacity(widths.len() + 1);
    let mut next = col_offset;
    starts.push(next);
    for width in widths {
        next += width;
        starts.push(next);
    }
    starts
}

fn col_start(col_starts: &[usize], k: usize) -> usize {
    col_starts
        .get(k)
        .or(col_starts.last())
        .copied()
        .unwrap_or(0)
}

fn total_width(col_starts: &[usize], col_offset: usize) -> usize {
    col_starts.last().map_or(0, |end| end - col_offset)
}

macro_rules! impl_static_access {
    ($wrapper:ident; $n:expr; $T0:ident => $i0:tt $(, $T:ident => $i:tt)*) => {
        impl<$T0: IndexAccess $(, $T: IndexAccess<Scalar = $T0::Scalar>)*> IndexAccess
            for $wrapper<($T0, $($T,)*)>
        {
            type Scalar = $T0::Scalar;
            const ROLE: BlockRole = BlockRole::Static;

            fn num_children(&self) -> usize {
                $n
            }

            fn apply_child<V>(&self, i: usize, visitor: V) -> Result<V::Output>
            where
                V: ChildVisitor<Self::Scalar>,
            {
                match i {
                    $i0 => visitor.visit(&self.0.$i0),
                    $($i => visitor.visit(&self.0.$i),)*
                    _ => Err(BcrsError::IndexOutOfBounds { index: i, len: $n }),
                }
            }

            fn apply_child_mut<V>(&mut self, i: usize, visitor: V) -> Result<V::Output>
            where
                V: ChildVisitorMut<Self::Scalar>,
            {
                match i {
                    $i0 => visitor.visit_mut(&mut self.0.$i0),
                    $($i => visitor.visit_mut(&mut self.0.$i),)*
                    _ => Err(BcrsError::IndexOutOfBounds { index: i, len: $n }),
                }
            }

            fn for_each_scalar(&self, f: &mut dyn FnMut(&Self::Scalar)) {
                self.0.$i0.for_each_scalar(f);
                $(self.0.$i.for_each_scalar(f);)*
            }

            fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut Self::Scalar)) {
                self.0.$i0.for_each_scalar_mut(f);
                $(self.0.$i.for_each_scalar_mut(f);)*
            }
        }
    };
}

macro_rules! impl_multitype {
    ($n:expr; $T0:ident => $i0:tt $(, $T:ident => $i:tt)*) => {
        impl_static_access!(MultiTypeBlockVector; $n; $T0 => $i0 $(, $T => $i)*);
        impl_static_access!(MultiTypeBlockMatrix; $n; $T0 => $i0 $(, $T => $i)*);

        impl<$T0: FlatVector $(, $T: FlatVector<Scalar = $T0::Scalar>)*> FlatVector
            for MultiTypeBlockVector<($T0, $($T,)*)>
        {
            type Scalar = $T0::Scalar;
            const STATIC_DIM: Option<usize> =
                sum_static_dims(&[$T0::STATIC_DIM $(, $T::STATIC_DIM)*]);

            fn flat_for_each(
                &self,
                offset: usize,
                f: &mut dyn FnMut(&Self::Scalar, usize),
            ) -> usize {
                let mut next = offset;
                next += self.0.$i0.flat_for_each(next, f);
                $(next += self.0.$i.flat_for_each(next, f);)*
                next - offset
            }

            fn flat_for_each_mut(
                &mut self,
                offset: usize,
                f: &mut dyn FnMut(&mut Self::Scalar, usize),
            ) -> usize {
                let mut next = offset;
                next += self.0.$i0.flat_for_each_mut(next, f);
                $(next += self.0.$i.flat_for_each_mut(next, f);)*
                next - offset
            }
        }

        impl<$T0: FlatMatrix $(, $T: FlatMatrix<Scalar = $T0::Scalar>)*> FlatMatrixRow
            for MultiTypeBlockVector<($T0, $($T,)*)>
        {
            type Scalar = $T0::Scalar;

            fn block_widths(&self) -> Vec<usize> {
                vec![self.0.$i0.flat_shape().1 $(, self.0.$i.flat_shape().1)*]
            }

            fn flat_row_for_each(
                &self,
                row_offset: usize,
                col_starts: &[usize],
                f: &mut dyn FnMut(&Self::Scalar, usize, usize),
            ) -> usize {
                let (height, _) =
                    self.0.$i0.flat_for_each(row_offset, col_start(col_starts, $i0), f);
                $(self.0.$i.flat_for_each(row_offset, col_start(col_starts, $i), f);)*
                height
            }

            fn flat_row_for_each_mut(
                &mut self,
                row_offset: usize,
                col_starts: &[usize],
                f: &mut dyn FnMut(&mut Self::Scalar, usize, usize),
            ) -> usize {
                let (height, _) =
                    self.0.$i0.flat_for_each_mut(row_offset, col_start(col_starts, $i0), f);
                $(self.0.$i.flat_for_each_mut(row_offset, col_start(col_starts, $i), f);)*
                height
            }
        }

        impl<$T0: FlatMatrixRow $(, $T: FlatMatrixRow<Scalar = $T0::Scalar>)*> FlatMatrix
            for MultiTypeBlockMatrix<($T0, $($T,)*)>
        {
            type Scalar = $T0::Scalar;
            const STATIC_SHAPE: Option<(usize, usize)> = None;

            fn flat_for_each(
                &self,
                row_offset: usize,
                col_offset: usize,
                f: &mut dyn FnMut(&Self::Scalar, usize, usize),
            ) -> (usize, usize) {
                let starts = column_starts(col_offset, &self.0.$i0.block_widths());
                let mut next = row_offset;
                next += self.0.$i0.flat_row_for_each(next, &starts, f);
                $(next += self.0.$i.flat_row_for_each(next, &starts, f);)*
                (next - row_offset, total_width(&starts, col_offset))
            }

            fn flat_for_each_mut(
                &mut self,
                row_offset: usize,
                col_offset: usize,
                f: &mut dyn FnMut(&mut Self::Scalar, usize, usize),
            ) -> (usize, usize) {
                let starts = column_starts(col_offset, &self.0.$i0.block_widths());
                let mut next = row_offset;
                next += self.0.$i0.flat_row_for_each_mut(next, &starts, f);
                $(next += self.0.$i.flat_row_for_each_mut(next, &starts, f);)*
                (next - row_offset, total_width(&starts, col_offset))
            }
        }

        impl<$T0 $(, $T)*> BlockShape for MultiTypeBlockVector<($T0, $($T,)*)> {
            fn num_rows(&self) -> usize {
                $n
            }
        }

        impl<$T0: BlockShape $(, $T)*> BlockShape for MultiTypeBlockMatrix<($T0, $($T,)*)> {
            fn num_rows(&self) -> usize {
                $n
            }

            fn num_cols(&self) -> usize {
                self.0.$i0.num_rows()
            }
        }
    };
}

impl_multitype!(1; A0 => 0);
impl_multitype!(2; A0 => 0, A1 => 1);
impl_multitype!(3; A0 => 0, A1 => 1, A2 => 2);
impl_multitype!(4; A0 => 0, A1 => 1, A2 => 2, A3 => 3);
impl_multitype!(5; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4);
impl_multitype!(6; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5);
impl_multitype!(7; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6);
impl_multitype!(8; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6, A7 => 7);
