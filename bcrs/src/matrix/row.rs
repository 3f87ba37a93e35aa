//! Row views of a built matrix

use bcrs_core::{
    check_index, BcrsError, BlockRole, ChildVisitor, ChildVisitorMut, IndexAccess, Result,
};
use rayon::prelude::*;

use super::BcrsMatrix;

/// Borrowed compressed arrays of a built matrix
#[derive(Debug, Clone, Copy)]
pub struct CsrView<'a, B> {
    /// Row start offsets, `n + 1` entries
    pub row_ptr: &'a [usize],
    /// Column index of every stored block, ascending within a row
    pub col_idx: &'a [usize],
    /// Stored blocks aligned with `col_idx`
    pub values: &'a [B],
}

/// Read-only view of one row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a, B> {
    index: usize,
    m: usize,
    cols: &'a [usize],
    values: &'a [B],
}

impl<'a, B> Row<'a, B> {
    /// Row index within the matrix
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of stored blocks
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    /// Whether the row stores no blocks
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Column indices of the stored blocks
    pub fn columns(&self) -> &'a [usize] {
        self.cols
    }

    /// Stored blocks in column order
    pub fn values(&self) -> &'a [B] {
        self.values
    }

    /// Block in column `j`, if stored
    pub fn get(&self, j: usize) -> Option<&'a B> {
        self.cols.binary_search(&j).ok().map(|k| &self.values[k])
    }

    /// Block in column `j`
    pub fn block(&self, j: usize) -> Result<&'a B> {
        check_index(j, self.m)?;
        self.get(j).ok_or(BcrsError::NotInPattern {
            row: self.index,
            col: j,
        })
    }

    /// Stored `(column, block)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a B)> + 'a {
        self.cols.iter().copied().zip(self.values.iter())
    }
}

/// Mutable view of one row
#[derive(Debug)]
pub struct RowMut<'a, B> {
    index: usize,
    m: usize,
    cols: &'a [usize],
    values: &'a mut [B],
}

impl<B> RowMut<'_, B> {
    /// Row index within the matrix
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of stored blocks
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    /// Whether the row stores no blocks
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Column indices of the stored blocks
    pub fn columns(&self) -> &[usize] {
        self.cols
    }

    /// Block in column `j`, if stored
    pub fn get(&self, j: usize) -> Option<&B> {
        self.cols.binary_search(&j).ok().map(|k| &self.values[k])
    }

    /// Mutable block in column `j`, if stored
    pub fn get_mut(&mut self, j: usize) -> Option<&mut B> {
        match self.cols.binary_search(&j) {
            Ok(k) => Some(&mut self.values[k]),
            Err(_) => None,
        }
    }

    /// Mutable block in column `j`
    pub fn block_mut(&mut self, j: usize) -> Result<&mut B> {
        check_index(j, self.m)?;
        let row = self.index;
        self.get_mut(j)
            .ok_or(BcrsError::NotInPattern { row, col: j })
    }

    /// Stored `(column, block)` pairs in column order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut B)> + '_ {
        self.cols.iter().copied().zip(self.values.iter_mut())
    }
}

impl<B> BcrsMatrix<B> {
    /// View of row `i`
    pub fn row(&self, i: usize) -> Result<Row<'_, B>> {
        self.ensure_built()?;
        check_index(i, self.n)?;
        let range = self.row_range(i);
        Ok(Row {
            index: i,
            m: self.m,
            cols: &self.col_idx[range.clone()],
            values: &self.values[range],
        })
    }

    /// Mutable view of row `i`
    pub fn row_mut(&mut self, i: usize) -> Result<RowMut<'_, B>> {
        self.ensure_built()?;
        check_index(i, self.n)?;
        let range = self.row_range(i);
        Ok(RowMut {
            index: i,
            m: self.m,
            cols: &self.col_idx[range.clone()],
            values: &mut self.values[range],
        })
    }

    /// Views of all rows in order
    pub fn rows(&self) -> Result<impl Iterator<Item = Row<'_, B>> + '_> {
        self.ensure_built()?;
        Ok((0..self.n).map(move |i| {
            let range = self.row_range(i);
            Row {
                index: i,
                m: self.m,
                cols: &self.col_idx[range.clone()],
                values: &self.values[range],
            }
        }))
    }

    /// Borrow the compressed arrays
    pub fn as_csr(&self) -> Result<CsrView<'_, B>> {
        self.ensure_built()?;
        Ok(CsrView {
            row_ptr: &self.row_ptr,
            col_idx: &self.col_idx,
            values: &self.values,
        })
    }

    /// Run `f` on every row in parallel
    ///
    /// Rows are disjoint, so each call receives exclusive access to its
    /// blocks.
    pub fn par_for_each_row_mut<F>(&mut self, f: F) -> Result<()>
    where
        B: Send,
        F: Fn(RowMut<'_, B>) + Send + Sync,
    {
        self.ensure_built()?;
        self.split_rows_mut().into_par_iter().for_each(f);
        Ok(())
    }

    fn split_rows_mut(&mut self) -> Vec<RowMut<'_, B>> {
        let mut rest: &mut [B] = &mut self.values;
        let mut rows = Vec::with_capacity(self.n);
        for i in 0..self.n {
            let range = self.row_ptr[i]..self.row_ptr[i + 1];
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            rows.push(RowMut {
                index: i,
                m: self.m,
                cols: &self.col_idx[range],
                values: head,
            });
        }
        rows
    }
}

impl<B: IndexAccess> IndexAccess for Row<'_, B> {
    type Scalar = B::Scalar;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        self.m
    }

    fn apply_child<V>(&self, j: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<B::Scalar>,
    {
        visitor.visit(self.block(j)?)
    }

    fn apply_child_mut<V>(&mut self, _j: usize, _visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<B::Scalar>,
    {
        Err(BcrsError::InvalidState("row view is read-only"))
    }

    fn for_each_scalar(&self, f: &mut dyn FnMut(&B::Scalar)) {
        for block in self.values {
            block.for_each_scalar(f);
        }
    }

    /// Row views are read-only: no scalar is visited, and debug builds
    /// panic. Use [`RowMut`] to write through a row.
    fn for_each_scalar_mut(&mut self, _f: &mut dyn FnMut(&mut B::Scalar)) {
        debug_assert!(false, "row view is read-only");
    }
}

impl<B: IndexAccess> IndexAccess for RowMut<'_, B> {
    type Scalar = B::Scalar;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        self.m
    }

    fn apply_child<V>(&self, j: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<B::Scalar>,
    {
        check_index(j, self.m)?;
        match self.get(j) {
            Some(block) => visitor.visit(block),
            None => Err(BcrsError::NotInPattern {
                row: self.index,
                col: j,
            }),
        }
    }

    fn apply_child_mut<V>(&mut self, j: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<B::Scalar>,
    {
        visitor.visit_mut(self.block_mut(j)?)
    }

    fn for_each_scalar(&self, f: &mut dyn FnMut(&B::Scalar)) {
        for block in self.values.iter() {
            block.for_each_scalar(f);
        }
    }

    fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut B::Scalar)) {
        for block in self.values.iter_mut() {
            block.for_each_scalar_mut(f);
        }
    }
}

impl<B: IndexAccess> IndexAccess for BcrsMatrix<B> {
    type Scalar = B::Scalar;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        self.n
    }

    fn apply_child<V>(&self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<B::Scalar>,
    {
        visitor.visit(&self.row(i)?)
    }

    fn apply_child_mut<V>(&mut self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<B::Scalar>,
    {
        visitor.visit_mut(&mut self.row_mut(i)?)
    }

    fn for_each_scalar(&self, f: &mut dyn FnMut(&B::Scalar)) {
        if !self.is_built() {
            return;
        }
        for block in &self.values {
            block.for_each_scalar(f);
        }
    }

    fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut B::Scalar)) {
        if !self.is_built() {
            return;
        }
        for block in &mut self.values {
            block.for_each_scalar_mut(f);
        }
    }
}
