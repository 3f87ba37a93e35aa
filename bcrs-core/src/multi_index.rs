//! Multi-indices addressing positions in nested containers
//!
//! A multi-index is a path from the root of a nested container: entry `k`
//! selects a child at depth `k`. A path shorter than the nesting depth selects
//! a whole sub-block.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use crate::{BcrsError, Result};

/// Fixed-capacity multi-index
///
/// Holds at most `N` indices; pushing past `N` fails with `DepthExceeded`.
#[derive(Debug, Clone, Copy)]
pub struct MultiIndex<const N: usize> {
    indices: [usize; N],
    len: usize,
}

impl<const N: usize> MultiIndex<N> {
    /// Maximum number of indices
    pub const CAPACITY: usize = N;

    /// Create an empty multi-index
    pub const fn new() -> Self {
        Self {
            indices: [0; N],
            len: 0,
        }
    }

    /// Create a multi-index from a slice of at most `N` indices
    pub fn from_slice(indices: &[usize]) -> Result<Self> {
        if indices.len() > N {
            return Err(BcrsError::DepthExceeded {
                depth: indices.len(),
                max: N,
            });
        }
        let mut result = Self::new();
        result.indices[..indices.len()].copy_from_slice(indices);
        result.len = indices.len();
        Ok(result)
    }

    /// Append an index
    pub fn push(&mut self, index: usize) -> Result<()> {
        if self.len == N {
            return Err(BcrsError::DepthExceeded {
                depth: N + 1,
                max: N,
            });
        }
        self.indices[self.len] = index;
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last index
    pub fn pop(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.indices[self.len])
    }

    /// Number of indices
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the multi-index addresses the root itself
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The indices as a slice
    pub fn as_slice(&self) -> &[usize] {
        &self.indices[..self.len]
    }

    /// Index at depth `depth`
    pub fn get(&self, depth: usize) -> Option<usize> {
        self.as_slice().get(depth).copied()
    }
}

impl<const N: usize> Default for MultiIndex<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PartialEq for MultiIndex<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize> Eq for MultiIndex<N> {}

impl<const N: usize> Hash for MultiIndex<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<const N: usize> core::fmt::Display for MultiIndex<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "(")?;
        for (k, index) in self.as_slice().iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, ")")
    }
}

/// Anything usable as a path into a nested container
pub trait IndexPath {
    /// Whether this is a plain flat index
    ///
    /// Flat indices are handed to the visitor together with the root block
    /// instead of being walked.
    const FLAT: bool;

    /// Upper bound on the path length known from the type
    const MAX_LEN: usize;

    /// The indices, outermost first
    fn path(&self) -> &[usize];
}

impl IndexPath for usize {
    const FLAT: bool = true;
    const MAX_LEN: usize = 1;

    fn path(&self) -> &[usize] {
        core::slice::from_ref(self)
    }
}

impl<const N: usize> IndexPath for [usize; N] {
    const FLAT: bool = false;
    const MAX_LEN: usize = N;

    fn path(&self) -> &[usize] {
        self
    }
}

impl<const N: usize> IndexPath for MultiIndex<N> {
    const FLAT: bool = false;
    const MAX_LEN: usize = N;

    fn path(&self) -> &[usize] {
        self.as_slice()
    }
}

impl IndexPath for [usize] {
    const FLAT: bool = false;
    const MAX_LEN: usize = usize::MAX;

    fn path(&self) -> &[usize] {
        self
    }
}

#[cfg(feature = "alloc")]
impl IndexPath for Vec<usize> {
    const FLAT: bool = false;
    const MAX_LEN: usize = usize::MAX;

    fn path(&self) -> &[usize] {
        self
    }
}

impl<T: IndexPath + ?Sized> IndexPath for &T {
    const FLAT: bool = T::FLAT;
    const MAX_LEN: usize = T::MAX_LEN;

    fn path(&self) -> &[usize] {
        (**self).path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop() {
        let mut index = MultiIndex::<2>::new();
        assert!(index.is_empty());
        index.push(3).unwrap();
        index.push(1).unwrap();
        assert_eq!(index.as_slice(), &[3, 1]);
        assert_eq!(
            index.push(0),
            Err(BcrsError::DepthExceeded { depth: 3, max: 2 })
        );
        assert_eq!(index.pop(), Some(1));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(0), Some(3));
        assert_eq!(index.get(1), None);
    }

    #[test]
    fn test_equality_ignores_unused_slots() {
        let mut a = MultiIndex::<3>::from_slice(&[1, 2, 7]).unwrap();
        a.pop();
        let b = MultiIndex::<3>::from_slice(&[1, 2]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_slice_too_long() {
        assert!(matches!(
            MultiIndex::<1>::from_slice(&[0, 0]),
            Err(BcrsError::DepthExceeded { depth: 2, max: 1 })
        ));
    }

    #[test]
    fn test_index_paths() {
        assert!(<usize as IndexPath>::FLAT);
        assert_eq!(5usize.path(), &[5]);
        assert!(!<[usize; 2] as IndexPath>::FLAT);
        assert_eq!([4usize, 2].path(), &[4, 2]);
        assert_eq!(<MultiIndex<4> as IndexPath>::MAX_LEN, 4);
    }
}
