use alloc::vec::Vec;

use crate::traits::{BlockRole, BlockShape, ChildVisitor, ChildVisitorMut, FlatVector, IndexAccess};
use crate::Result;

impl<T: IndexAccess> IndexAccess for Vec<T> {
    type Scalar = T::Scalar;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        self.len()
    }

    fn apply_child<V>(&self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<T::Scalar>,
    {
        self.as_slice().apply_child(i, visitor)
    }

    fn apply_child_mut<V>(&mut self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<T::Scalar>,
    {
        self.as_mut_slice().apply_child_mut(i, visitor)
    }

    fn for_each_scalar(&self, f: &mut dyn FnMut(&T::Scalar)) {
        self.as_slice().for_each_scalar(f)
    }

    fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut T::Scalar)) {
        self.as_mut_slice().for_each_scalar_mut(f)
    }
}

impl<T: FlatVector> FlatVector for Vec<T> {
    type Scalar = T::Scalar;
    const STATIC_DIM: Option<usize> = None;

    fn flat_for_each(&self, offset: usize, f: &mut dyn FnMut(&T::Scalar, usize)) -> usize {
        self.as_slice().flat_for_each(offset, f)
    }

    fn flat_for_each_mut(
        &mut self,
        offset: usize,
        f: &mut dyn FnMut(&mut T::Scalar, usize),
    ) -> usize {
        self.as_mut_slice().flat_for_each_mut(offset, f)
    }

    fn flat_dim(&self) -> usize {
        self.as_slice().flat_dim()
    }
}

impl<T> BlockShape for Vec<T> {
    fn num_rows(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_vec_of_dynamic_blocks() {
        let v: Vec<Vec<f64>> = vec![vec![1.0, 2.0, 3.0], vec![4.0], vec![]];
        assert_eq!(v.flat_dim(), 4);
        let mut total = 0.0;
        v.for_each_scalar(&mut |x| total += *x);
        assert_eq!(total, 10.0);
        assert_eq!(v.num_rows(), 3);
    }
}
