use crate::error::BcrsError;
use crate::traits::{
    BlockRole, BlockShape, ChildVisitor, ChildVisitorMut, FlatMatrix, FlatVector, IndexAccess,
};
use crate::Result;

macro_rules! impl_scalar_leaf {
    ($($t:ty),*) => {
        $(
            impl IndexAccess for $t {
                type Scalar = $t;
                const ROLE: BlockRole = BlockRole::Scalar;

                fn num_children(&self) -> usize {
                    0
                }

                fn apply_child<V>(&self, i: usize, _visitor: V) -> Result<V::Output>
                where
                    V: ChildVisitor<$t>,
                {
                    Err(BcrsError::IndexOutOfBounds { index: i, len: 0 })
                }

                fn apply_child_mut<V>(&mut self, i: usize, _visitor: V) -> Result<V::Output>
                where
                    V: ChildVisitorMut<$t>,
                {
                    Err(BcrsError::IndexOutOfBounds { index: i, len: 0 })
                }

                fn as_scalar(&self) -> Option<&$t> {
                    Some(self)
                }

                fn as_scalar_mut(&mut self) -> Option<&mut $t> {
                    Some(self)
                }

                fn for_each_scalar(&self, f: &mut dyn FnMut(&$t)) {
                    f(self)
                }

                fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut $t)) {
                    f(self)
                }
            }

            impl FlatVector for $t {
                type Scalar = $t;
                const STATIC_DIM: Option<usize> = Some(1);

                fn flat_for_each(&self, offset: usize, f: &mut dyn FnMut(&$t, usize)) -> usize {
                    f(self, offset);
                    1
                }

                fn flat_for_each_mut(
                    &mut self,
                    offset: usize,
                    f: &mut dyn FnMut(&mut $t, usize),
                ) -> usize {
                    f(self, offset);
                    1
                }
            }

            impl FlatMatrix for $t {
                type Scalar = $t;
                const STATIC_SHAPE: Option<(usize, usize)> = Some((1, 1));

                fn flat_for_each(
                    &self,
                    row_offset: usize,
                    col_offset: usize,
                    f: &mut dyn FnMut(&$t, usize, usize),
                ) -> (usize, usize) {
                    f(self, row_offset, col_offset);
                    (1, 1)
                }

                fn flat_for_each_mut(
                    &mut self,
                    row_offset: usize,
                    col_offset: usize,
                    f: &mut dyn FnMut(&mut $t, usize, usize),
                ) -> (usize, usize) {
                    f(self, row_offset, col_offset);
                    (1, 1)
                }
            }

            impl BlockShape for $t {
                fn num_rows(&self) -> usize {
                    1
                }
            }
        )*
    };
}

impl_scalar_leaf!(f32, f64, i32, i64);
