//! Multi-index access into nested containers
//!
//! [`apply_at_index`] walks a container one level per index. The walk stops
//! when the index is exhausted or a scalar leaf is reached, and the visitor
//! is called with the block found there and a cursor into the index. A plain
//! `usize` index is not walked: the visitor receives the root block and the
//! whole index.

use bcrs_core::{
    BcrsError, BlockRole, ChildVisitor, ChildVisitorMut, Field, IndexAccess, IndexPath, Result,
    MAX_DEPTH,
};

/// Position of a walk inside its multi-index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCursor<'a> {
    index: &'a [usize],
    depth: usize,
}

impl<'a> IndexCursor<'a> {
    /// The full index
    pub fn index(&self) -> &'a [usize] {
        self.index
    }

    /// Number of indices consumed by the walk
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Indices consumed to reach the visited block
    pub fn consumed(&self) -> &'a [usize] {
        &self.index[..self.depth]
    }

    /// Indices not consumed by the walk
    pub fn rest(&self) -> &'a [usize] {
        &self.index[self.depth..]
    }
}

/// Functor called where a walk stops
pub trait AtIndex<K> {
    /// Called with the block the walk stopped at
    fn reached<C>(&mut self, block: &C, cursor: IndexCursor<'_>) -> Result<()>
    where
        C: IndexAccess<Scalar = K> + ?Sized;
}

/// Mutable counterpart of [`AtIndex`]
pub trait AtIndexMut<K> {
    /// Called with the block the walk stopped at
    fn reached_mut<C>(&mut self, block: &mut C, cursor: IndexCursor<'_>) -> Result<()>
    where
        C: IndexAccess<Scalar = K> + ?Sized;
}

/// Functor called where a walk over two aligned containers stops
pub trait AtIndexZip<Ka, Kb> {
    /// Called with the blocks of both containers at the same position
    fn reached<A, B>(&mut self, a: &A, b: &B, cursor: IndexCursor<'_>) -> Result<()>
    where
        A: IndexAccess<Scalar = Ka> + ?Sized,
        B: IndexAccess<Scalar = Kb> + ?Sized;
}

fn check_depth<P: IndexPath + ?Sized>(path: &[usize]) -> Result<()> {
    let max = MAX_DEPTH.min(P::MAX_LEN);
    if path.len() > max {
        return Err(BcrsError::DepthExceeded {
            depth: path.len(),
            max,
        });
    }
    Ok(())
}

/// Walk `block` along `index` and call `visitor` where the walk stops
pub fn apply_at_index<P, C, A>(index: &P, block: &C, visitor: &mut A) -> Result<()>
where
    P: IndexPath + ?Sized,
    C: IndexAccess + ?Sized,
    A: AtIndex<C::Scalar> + ?Sized,
{
    let path = index.path();
    if P::FLAT {
        return visitor.reached(block, IndexCursor { index: path, depth: 0 });
    }
    check_depth::<P>(path)?;
    descend(block, path, 0, visitor)
}

/// Mutable counterpart of [`apply_at_index`]
pub fn apply_at_index_mut<P, C, A>(index: &P, block: &mut C, visitor: &mut A) -> Result<()>
where
    P: IndexPath + ?Sized,
    C: IndexAccess + ?Sized,
    A: AtIndexMut<C::Scalar> + ?Sized,
{
    let path = index.path();
    if P::FLAT {
        return visitor.reached_mut(block, IndexCursor { index: path, depth: 0 });
    }
    check_depth::<P>(path)?;
    descend_mut(block, path, 0, visitor)
}

/// Apply [`apply_at_index`] for every index in order
///
/// Stops at the first error.
pub fn for_each_index<I, C, A>(indices: I, block: &C, visitor: &mut A) -> Result<()>
where
    I: IntoIterator,
    I::Item: IndexPath,
    C: IndexAccess + ?Sized,
    A: AtIndex<C::Scalar> + ?Sized,
{
    for index in indices {
        apply_at_index(&index, block, visitor)?;
    }
    Ok(())
}

/// Mutable counterpart of [`for_each_index`]
pub fn for_each_index_mut<I, C, A>(indices: I, block: &mut C, visitor: &mut A) -> Result<()>
where
    I: IntoIterator,
    I::Item: IndexPath,
    C: IndexAccess + ?Sized,
    A: AtIndexMut<C::Scalar> + ?Sized,
{
    for index in indices {
        apply_at_index_mut(&index, block, visitor)?;
    }
    Ok(())
}

/// Walk two aligned containers along `index`
///
/// `a` is walked first; `b` is then walked along the indices `a` consumed,
/// and `visitor` receives both blocks.
pub fn apply_at_index_zip<P, CA, CB, Z>(index: &P, a: &CA, b: &CB, visitor: &mut Z) -> Result<()>
where
    P: IndexPath + ?Sized,
    CA: IndexAccess + ?Sized,
    CB: IndexAccess + ?Sized,
    Z: AtIndexZip<CA::Scalar, CB::Scalar> + ?Sized,
{
    let mut first = ZipFirst { b, visitor };
    apply_at_index(index, a, &mut first)
}

/// Scalar at `index`
///
/// Fails with `NotALeaf` if the walk stops at a block.
pub fn value_at<P, C>(index: &P, block: &C) -> Result<C::Scalar>
where
    P: IndexPath + ?Sized,
    C: IndexAccess + ?Sized,
{
    let mut read = ReadLeaf(None);
    apply_at_index(index, block, &mut read)?;
    read.0.ok_or(BcrsError::NotALeaf { depth: 0 })
}

/// Overwrite the scalar at `index`
///
/// Fails with `NotALeaf` if the walk stops at a block.
pub fn set_at<P, C>(index: &P, block: &mut C, value: C::Scalar) -> Result<()>
where
    P: IndexPath + ?Sized,
    C: IndexAccess + ?Sized,
{
    apply_at_index_mut(index, block, &mut WriteLeaf(value))
}

fn descend<C, A>(block: &C, path: &[usize], depth: usize, visitor: &mut A) -> Result<()>
where
    C: IndexAccess + ?Sized,
    A: AtIndex<C::Scalar> + ?Sized,
{
    if depth == path.len() || matches!(C::ROLE, BlockRole::Scalar) {
        return visitor.reached(block, IndexCursor { index: path, depth });
    }
    block.apply_child(
        path[depth],
        Descend {
            path,
            depth: depth + 1,
            visitor,
        },
    )
}

fn descend_mut<C, A>(block: &mut C, path: &[usize], depth: usize, visitor: &mut A) -> Result<()>
where
    C: IndexAccess + ?Sized,
    A: AtIndexMut<C::Scalar> + ?Sized,
{
    if depth == path.len() || matches!(C::ROLE, BlockRole::Scalar) {
        return visitor.reached_mut(block, IndexCursor { index: path, depth });
    }
    block.apply_child_mut(
        path[depth],
        Descend {
            path,
            depth: depth + 1,
            visitor,
        },
    )
}

struct Descend<'p, 'v, A: ?Sized> {
    path: &'p [usize],
    depth: usize,
    visitor: &'v mut A,
}

impl<K, A: AtIndex<K> + ?Sized> ChildVisitor<K> for Descend<'_, '_, A> {
    type Output = ();

    fn visit<C>(self, child: &C) -> Result<()>
    where
        C: IndexAccess<Scalar = K> + ?Sized,
    {
        descend(child, self.path, self.depth, self.visitor)
    }
}

impl<K, A: AtIndexMut<K> + ?Sized> ChildVisitorMut<K> for Descend<'_, '_, A> {
    type Output = ();

    fn visit_mut<C>(self, child: &mut C) -> Result<()>
    where
        C: IndexAccess<Scalar = K> + ?Sized,
    {
        descend_mut(child, self.path, self.depth, self.visitor)
    }
}

struct ZipFirst<'b, 'z, CB: ?Sized, Z: ?Sized> {
    b: &'b CB,
    visitor: &'z mut Z,
}

impl<Ka, CB, Z> AtIndex<Ka> for ZipFirst<'_, '_, CB, Z>
where
    CB: IndexAccess + ?Sized,
    Z: AtIndexZip<Ka, CB::Scalar> + ?Sized,
{
    fn reached<CA>(&mut self, a: &CA, cursor: IndexCursor<'_>) -> Result<()>
    where
        CA: IndexAccess<Scalar = Ka> + ?Sized,
    {
        let mut second = ZipSecond {
            a,
            cursor,
            visitor: &mut *self.visitor,
        };
        descend(self.b, cursor.consumed(), 0, &mut second)
    }
}

struct ZipSecond<'a, 'c, 'z, CA: ?Sized, Z: ?Sized> {
    a: &'a CA,
    cursor: IndexCursor<'c>,
    visitor: &'z mut Z,
}

impl<Kb, CA, Z> AtIndex<Kb> for ZipSecond<'_, '_, '_, CA, Z>
where
    CA: IndexAccess + ?Sized,
    Z: AtIndexZip<CA::Scalar, Kb> + ?Sized,
{
    fn reached<CB>(&mut self, b: &CB, _cursor: IndexCursor<'_>) -> Result<()>
    where
        CB: IndexAccess<Scalar = Kb> + ?Sized,
    {
        self.visitor.reached(self.a, b, self.cursor)
    }
}

struct ReadLeaf<K>(Option<K>);

impl<K: Field> AtIndex<K> for ReadLeaf<K> {
    fn reached<C>(&mut self, block: &C, cursor: IndexCursor<'_>) -> Result<()>
    where
        C: IndexAccess<Scalar = K> + ?Sized,
    {
        if let Some(value) = block.as_scalar() {
            self.0 = Some(*value);
            return Ok(());
        }
        // a flat index arrives unwalked
        if !cursor.rest().is_empty() && cursor.depth() == 0 {
            return apply_at_index(cursor.rest(), block, self);
        }
        Err(BcrsError::NotALeaf {
            depth: cursor.depth(),
        })
    }
}

struct WriteLeaf<K>(K);

impl<K: Field> AtIndexMut<K> for WriteLeaf<K> {
    fn reached_mut<C>(&mut self, block: &mut C, cursor: IndexCursor<'_>) -> Result<()>
    where
        C: IndexAccess<Scalar = K> + ?Sized,
    {
        if let Some(slot) = block.as_scalar_mut() {
            *slot = self.0;
            return Ok(());
        }
        if !cursor.rest().is_empty() && cursor.depth() == 0 {
            return apply_at_index_mut(cursor.rest(), block, self);
        }
        Err(BcrsError::NotALeaf {
            depth: cursor.depth(),
        })
    }
}
