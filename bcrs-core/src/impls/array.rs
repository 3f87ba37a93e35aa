use crate::traits::{BlockRole, BlockShape, ChildVisitor, ChildVisitorMut, FlatVector, IndexAccess};
use crate::validation::check_index;
use crate::Result;

impl<T: IndexAccess> IndexAccess for [T] {
    type Scalar = T::Scalar;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        self.len()
    }

    fn apply_child<V>(&self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<T::Scalar>,
    {
        check_index(i, self.len())?;
        visitor.visit(&self[i])
    }

    fn apply_child_mut<V>(&mut self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<T::Scalar>,
    {
        check_index(i, self.len())?;
        visitor.visit_mut(&mut self[i])
    }

    fn for_each_scalar(&self, f: &mut dyn FnMut(&T::Scalar)) {
        for child in self {
            child.for_each_scalar(f);
        }
    }

    fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut T::Scalar)) {
        for child in self {
            child.for_each_scalar_mut(f);
        }
    }
}

impl<T: FlatVector> FlatVector for [T] {
    type Scalar = T::Scalar;
    const STATIC_DIM: Option<usize> = None;

    fn flat_for_each(&self, offset: usize, f: &mut dyn FnMut(&T::Scalar, usize)) -> usize {
        let mut next = offset;
        for child in self {
            next += child.flat_for_each(next, f);
        }
        next - offset
    }

    fn flat_for_each_mut(
        &mut self,
        offset: usize,
        f: &mut dyn FnMut(&mut T::Scalar, usize),
    ) -> usize {
        let mut next = offset;
        for child in self {
            next += child.flat_for_each_mut(next, f);
        }
        next - offset
    }

    fn flat_dim(&self) -> usize {
        match T::STATIC_DIM {
            Some(dim) => dim * self.len(),
            None => self.iter().map(FlatVector::flat_dim).sum(),
        }
    }
}

impl<T> BlockShape for [T] {
    fn num_rows(&self) -> usize {
        self.len()
    }
}

impl<T: IndexAccess, const N: usize> IndexAccess for [T; N] {
    type Scalar = T::Scalar;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        N
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

impl<T: FlatVector, const N: usize> FlatVector for [T; N] {
    type Scalar = T::Scalar;
    const STATIC_DIM: Option<usize> = match T::STATIC_DIM {
        Some(dim) => Some(dim * N),
        None => None,
    };

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
}

impl<T, const N: usize> BlockShape for [T; N] {
    fn num_rows(&self) -> usize {
        N
    }
}
