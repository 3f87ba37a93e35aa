//! Sparse block vector storing only its nonzero positions

use bcrs_core::{
    check_dimensions, check_index, BcrsError, BlockRole, BlockShape, ChildVisitor, ChildVisitorMut, FlatVector,
    IndexAccess, Result,
};

/// Vector of `size` blocks of which only some positions are stored
///
/// Positions are kept sorted. Traversal visits the stored blocks only, but
/// reports the flat dimension of the whole vector.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector<T> {
    size: usize,
    positions: Vec<usize>,
    entries: Vec<T>,
    capacity: Option<usize>,
    block_dim: Option<usize>,
}

impl<T> SparseVector<T> {
    /// Empty vector of `size` blocks
    pub fn new(size: usize) -> Self {
        Self {
            size,
            positions: Vec::new(),
            entries: Vec::new(),
            capacity: None,
            block_dim: None,
        }
    }

    /// Empty vector that stores at most `capacity` blocks
    pub fn with_capacity(size: usize, capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            capacity: Some(capacity),
            ..Self::new(size)
        }
    }

    /// Declare the flat dimension of every block
    ///
    /// Needed when blocks are dynamically sized and the vector may be empty.
    pub fn with_block_dim(mut self, block_dim: usize) -> Self {
        self.block_dim = Some(block_dim);
        self
    }

    /// Number of block positions, stored or not
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored blocks
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no block is stored
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Maximum number of stored blocks, if bounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Stored positions in ascending order
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Remove the block at position `i`
    pub fn remove(&mut self, i: usize) -> Option<T> {
        let k = self.positions.binary_search(&i).ok()?;
        self.positions.remove(k);
        Some(self.entries.remove(k))
    }

    /// Block at position `i`, if stored
    pub fn get(&self, i: usize) -> Option<&T> {
        let k = self.positions.binary_search(&i).ok()?;
        Some(&self.entries[k])
    }

    /// Mutable block at position `i`, if stored
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        let k = self.positions.binary_search(&i).ok()?;
        Some(&mut self.entries[k])
    }

    /// Block at position `i`
    ///
    /// Fails with `AbsentEntry` for an unstored position inside the vector.
    pub fn value(&self, i: usize) -> Result<&T> {
        check_index(i, self.size)?;
        self.get(i).ok_or(BcrsError::AbsentEntry { index: i })
    }

    /// Mutable counterpart of [`SparseVector::value`]
    pub fn value_mut(&mut self, i: usize) -> Result<&mut T> {
        check_index(i, self.size)?;
        self.get_mut(i).ok_or(BcrsError::AbsentEntry { index: i })
    }

    /// Stored `(position, block)` pairs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.positions.iter().copied().zip(self.entries.iter())
    }

    /// Mutable counterpart of [`SparseVector::iter`]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> + '_ {
        self.positions.iter().copied().zip(self.entries.iter_mut())
    }

    fn ensure_room(&self) -> Result<()> {
        match self.capacity {
            Some(capacity) if self.positions.len() >= capacity => Err(BcrsError::InvalidState(
                "sparse vector capacity exhausted",
            )),
            _ => Ok(()),
        }
    }
}

impl<T: FlatVector> SparseVector<T> {
    /// Build from `(position, block)` pairs in any order
    pub fn from_entries<I>(size: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let mut vector = Self::new(size);
        for (i, block) in entries {
            vector.insert(i, block)?;
        }
        Ok(vector)
    }

    /// Store `block` at position `i`, returning the block it replaces
    ///
    /// Fails with `DimensionMismatch` if the block's flat dimension differs
    /// from the one the vector's other blocks already fix.
    pub fn insert(&mut self, i: usize, block: T) -> Result<Option<T>> {
        check_index(i, self.size)?;
        match self.positions.binary_search(&i) {
            Ok(k) => {
                self.check_block_dim(&block, Some(k))?;
                Ok(Some(std::mem::replace(&mut self.entries[k], block)))
            }
            Err(k) => {
                self.ensure_room()?;
                self.check_block_dim(&block, None)?;
                self.positions.insert(k, i);
                self.entries.insert(k, block);
                Ok(None)
            }
        }
    }

    /// Block at position `i`, inserting a default block if absent
    pub fn entry(&mut self, i: usize) -> Result<&mut T>
    where
        T: Default,
    {
        check_index(i, self.size)?;
        let k = match self.positions.binary_search(&i) {
            Ok(k) => k,
            Err(k) => {
                self.ensure_room()?;
                let block = T::default();
                self.check_block_dim(&block, None)?;
                self.positions.insert(k, i);
                self.entries.insert(k, block);
                k
            }
        };
        Ok(&mut self.entries[k])
    }

    /// Flat dimension of one block
    ///
    /// Taken from the block type when it is static, else from
    /// [`SparseVector::with_block_dim`], else from the first non-empty
    /// stored block.
    pub fn block_dim(&self) -> usize {
        self.established_dim(None).unwrap_or(0)
    }

    fn established_dim(&self, skip: Option<usize>) -> Option<usize> {
        T::STATIC_DIM.or(self.block_dim).or_else(|| {
            self.entries
                .iter()
                .enumerate()
                .filter(|&(k, _)| Some(k) != skip)
                .map(|(_, block)| block.flat_dim())
                .find(|&dim| dim > 0)
        })
    }

    // Empty blocks hold no scalars and fit any dimension.
    fn check_block_dim(&self, block: &T, skip: Option<usize>) -> Result<()> {
        let found = block.flat_dim();
        match self.established_dim(skip) {
            Some(expected) if found > 0 => {
                check_dimensions("sparse vector block", expected, found)
            }
            _ => Ok(()),
        }
    }
}

impl<T: IndexAccess> IndexAccess for SparseVector<T> {
    type Scalar = T::Scalar;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        self.size
    }

    fn apply_child<V>(&self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<T::Scalar>,
    {
        visitor.visit(self.value(i)?)
    }

    fn apply_child_mut<V>(&mut self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<T::Scalar>,
    {
        visitor.visit_mut(self.value_mut(i)?)
    }

    fn for_each_scalar(&self, f: &mut dyn FnMut(&T::Scalar)) {
        for block in &self.entries {
            block.for_each_scalar(f);
        }
    }

    fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut T::Scalar)) {
        for block in &mut self.entries {
            block.for_each_scalar_mut(f);
        }
    }
}

impl<T: FlatVector> FlatVector for SparseVector<T> {
    type Scalar = T::Scalar;
    const STATIC_DIM: Option<usize> = None;

    fn flat_for_each(&self, offset: usize, f: &mut dyn FnMut(&T::Scalar, usize)) -> usize {
        let block_dim = self.block_dim();
        for (i, block) in self.iter() {
            block.flat_for_each(offset + i * block_dim, f);
        }
        self.size * block_dim
    }

    fn flat_for_each_mut(
        &mut self,
        offset: usize,
        f: &mut dyn FnMut(&mut T::Scalar, usize),
    ) -> usize {
        let block_dim = self.block_dim();
        for (i, block) in self.iter_mut() {
            block.flat_for_each_mut(offset + i * block_dim, f);
        }
        self.size * block_dim
    }

    fn flat_dim(&self) -> usize {
        self.size * self.block_dim()
    }
}

impl<T> BlockShape for SparseVector<T> {
    fn num_rows(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_positions_sorted() {
        let mut v = SparseVector::with_capacity(10, 2);
        assert_eq!(v.insert(5, 3.0), Ok(None));
        assert_eq!(v.insert(2, 7.0), Ok(None));
        assert_eq!(v.insert(5, 4.0), Ok(Some(3.0)));
        assert_eq!(v.positions(), &[2, 5]);
        assert!(matches!(v.insert(7, 1.0), Err(BcrsError::InvalidState(_))));
        assert_eq!(
            v.insert(10, 1.0),
            Err(BcrsError::IndexOutOfBounds { index: 10, len: 10 })
        );
    }

    #[test]
    fn test_absent_positions() {
        let mut v = SparseVector::from_entries(4, [(1, 2.0)]).unwrap();
        assert_eq!(v.value(1), Ok(&2.0));
        assert_eq!(v.value(0), Err(BcrsError::AbsentEntry { index: 0 }));
        *v.entry(0).unwrap() += 1.5;
        assert_eq!(v.get(0), Some(&1.5));
        assert_eq!(v.remove(1), Some(2.0));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_dynamic_block_dim() {
        let empty = SparseVector::<Vec<f64>>::new(5).with_block_dim(3);
        assert_eq!(empty.flat_dim(), 15);

        let v = SparseVector::from_entries(5, [(3, vec![1.0, 2.0])]).unwrap();
        let mut offsets = Vec::new();
        assert_eq!(v.flat_for_each(0, &mut |_, k| offsets.push(k)), 10);
        assert_eq!(offsets, vec![6, 7]);
    }

    #[test]
    fn test_blocks_of_different_length_rejected() {
        assert_eq!(
            SparseVector::from_entries(2, [(0, vec![1.0]), (1, vec![2.0, 3.0, 4.0])]),
            Err(BcrsError::DimensionMismatch {
                context: "sparse vector block",
                expected: 1,
                found: 3,
            })
        );

        let mut v = SparseVector::new(4).with_block_dim(2);
        v.insert(1, vec![1.0, 2.0]).unwrap();
        assert!(v.insert(2, vec![1.0]).is_err());
        assert_eq!(v.len(), 1);

        // a default block is empty until filled
        v.entry(3).unwrap().extend([5.0, 6.0]);
        let mut offsets = Vec::new();
        assert_eq!(v.flat_for_each(0, &mut |_, k| offsets.push(k)), 8);
        assert_eq!(offsets, vec![2, 3, 6, 7]);
    }

    #[test]
    fn test_replacing_the_only_block_resizes() {
        let mut v = SparseVector::from_entries(3, [(0, vec![1.0])]).unwrap();
        assert_eq!(v.insert(0, vec![1.0, 2.0]), Ok(Some(vec![1.0])));
        assert_eq!(v.flat_dim(), 6);
    }
}
