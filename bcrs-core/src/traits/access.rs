//! Child access for nested block containers
//!
//! A nested container is walked one level at a time. Every level is a scalar
//! leaf, a block indexed at runtime, or a block whose positions have distinct
//! types. Children are handed to a visitor instead of being returned, which
//! lets heterogeneous blocks dispatch each position to a different type.

use super::element::Field;
use crate::Result;

/// Kind of a level in a nested container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRole {
    /// Leaf scalar; indexing stops here
    Scalar,
    /// Children share one type and are selected by runtime index
    Dynamic,
    /// Each position has its own type
    Static,
}

/// Consumer of a borrowed child block
pub trait ChildVisitor<K> {
    /// Value produced by the visit
    type Output;

    /// Called with the child selected by [`IndexAccess::apply_child`]
    fn visit<C>(self, child: &C) -> Result<Self::Output>
    where
        C: IndexAccess<Scalar = K> + ?Sized;
}

/// Consumer of a mutably borrowed child block
pub trait ChildVisitorMut<K> {
    /// Value produced by the visit
    type Output;

    /// Called with the child selected by [`IndexAccess::apply_child_mut`]
    fn visit_mut<C>(self, child: &mut C) -> Result<Self::Output>
    where
        C: IndexAccess<Scalar = K> + ?Sized;
}

/// One level of a nested container
pub trait IndexAccess {
    /// Scalar type stored at the leaves
    type Scalar: Field;

    /// Kind of this level
    const ROLE: BlockRole;

    /// Number of directly addressable children
    ///
    /// Zero for scalar leaves.
    fn num_children(&self) -> usize;

    /// Hand child `i` to `visitor`
    ///
    /// Fails with `IndexOutOfBounds` if `i >= num_children()`, or with
    /// `NotInPattern` / `AbsentEntry` for sparse containers that do not store
    /// the position.
    fn apply_child<V>(&self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<Self::Scalar>;

    /// Hand child `i` mutably to `visitor`
    fn apply_child_mut<V>(&mut self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<Self::Scalar>;

    /// The scalar value if this level is a leaf
    fn as_scalar(&self) -> Option<&Self::Scalar> {
        None
    }

    /// The mutable scalar value if this level is a leaf
    fn as_scalar_mut(&mut self) -> Option<&mut Self::Scalar> {
        None
    }

    /// Visit every stored scalar below this level
    fn for_each_scalar(&self, f: &mut dyn FnMut(&Self::Scalar));

    /// Visit every stored scalar below this level mutably
    fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut Self::Scalar));
}
