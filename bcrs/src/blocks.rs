//! Dense blocks stored inside sparse containers
//!
//! [`FieldMatrix`] has its shape in the type; [`DynMatrix`] carries it at
//! runtime and is used for matrices whose block sizes vary.

use std::ops::{AddAssign, MulAssign};

use bcrs_core::{
    check_dimensions, check_index, BlockRole, BlockShape, ChildVisitor, ChildVisitorMut, Field,
    FlatMatrix, IndexAccess, Result,
};

/// Dense `R x C` block with statically known shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMatrix<K, const R: usize, const C: usize>(pub [[K; C]; R]);

impl<K: Field, const R: usize, const C: usize> FieldMatrix<K, R, C> {
    /// Block with every entry set to `value`
    pub fn filled(value: K) -> Self {
        Self([[value; C]; R])
    }

    /// Block with `value` on the diagonal and zero elsewhere
    pub fn diagonal(value: K) -> Self {
        let mut block = Self::default();
        for k in 0..R.min(C) {
            block.0[k][k] = value;
        }
        block
    }

    /// Identity block (ones on the diagonal)
    pub fn identity() -> Self {
        Self::diagonal(K::ONE)
    }

    /// Entry at `(r, c)`
    pub fn get(&self, r: usize, c: usize) -> Option<&K> {
        self.0.get(r).and_then(|row| row.get(c))
    }

    /// Mutable entry at `(r, c)`
    pub fn get_mut(&mut self, r: usize, c: usize) -> Option<&mut K> {
        self.0.get_mut(r).and_then(|row| row.get_mut(c))
    }

    /// `y += A x`
    pub fn umv(&self, x: &[K; C], y: &mut [K; R]) {
        for (yi, row) in y.iter_mut().zip(&self.0) {
            for (a, b) in row.iter().zip(x) {
                *yi += *a * *b;
            }
        }
    }
}

impl<K: Field, const R: usize, const C: usize> Default for FieldMatrix<K, R, C> {
    fn default() -> Self {
        Self::filled(K::ZERO)
    }
}

impl<K: Field, const R: usize, const C: usize> AddAssign for FieldMatrix<K, R, C> {
    fn add_assign(&mut self, rhs: Self) {
        for (row, other) in self.0.iter_mut().zip(rhs.0) {
            for (a, b) in row.iter_mut().zip(other) {
                *a += b;
            }
        }
    }
}

impl<K: Field, const R: usize, const C: usize> MulAssign<K> for FieldMatrix<K, R, C> {
    fn mul_assign(&mut self, rhs: K) {
        for a in self.0.iter_mut().flatten() {
            *a *= rhs;
        }
    }
}

impl<K, const R: usize, const C: usize> IndexAccess for FieldMatrix<K, R, C>
where
    K: Field + IndexAccess<Scalar = K>,
{
    type Scalar = K;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        R
    }

    fn apply_child<V>(&self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<K>,
    {
        self.0.apply_child(i, visitor)
    }

    fn apply_child_mut<V>(&mut self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<K>,
    {
        self.0.apply_child_mut(i, visitor)
    }

    fn for_each_scalar(&self, f: &mut dyn FnMut(&K)) {
        self.0.iter().flatten().for_each(f)
    }

    fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut K)) {
        self.0.iter_mut().flatten().for_each(f)
    }
}

impl<K: Field, const R: usize, const C: usize> FlatMatrix for FieldMatrix<K, R, C> {
    type Scalar = K;
    const STATIC_SHAPE: Option<(usize, usize)> = Some((R, C));

    fn flat_for_each(
        &self,
        row_offset: usize,
        col_offset: usize,
        f: &mut dyn FnMut(&K, usize, usize),
    ) -> (usize, usize) {
        for (r, row) in self.0.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                f(value, row_offset + r, col_offset + c);
            }
        }
        (R, C)
    }

    fn flat_for_each_mut(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        f: &mut dyn FnMut(&mut K, usize, usize),
    ) -> (usize, usize) {
        for (r, row) in self.0.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                f(value, row_offset + r, col_offset + c);
            }
        }
        (R, C)
    }
}

impl<K, const R: usize, const C: usize> BlockShape for FieldMatrix<K, R, C> {
    fn num_rows(&self) -> usize {
        R
    }

    fn num_cols(&self) -> usize {
        C
    }
}

/// Dense block with runtime shape, stored row-major
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynMatrix<K> {
    rows: usize,
    cols: usize,
    data: Vec<K>,
}

impl<K: Field> DynMatrix<K> {
    /// Zero block of the given shape
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![K::ZERO; rows * cols],
        }
    }

    /// Block from row vectors of equal length
    pub fn from_rows(rows: Vec<Vec<K>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            check_dimensions("DynMatrix::from_rows", cols, row.len())?;
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Entry at `(r, c)`
    pub fn get(&self, r: usize, c: usize) -> Option<&K> {
        if r >= self.rows || c >= self.cols {
            return None;
        }
        self.data.get(r * self.cols + c)
    }

    /// Mutable entry at `(r, c)`
    pub fn get_mut(&mut self, r: usize, c: usize) -> Option<&mut K> {
        if r >= self.rows || c >= self.cols {
            return None;
        }
        self.data.get_mut(r * self.cols + c)
    }

    /// Entry-wise `self += other`
    ///
    /// An empty block takes the shape of `other`; otherwise shapes must agree.
    pub fn try_add_assign(&mut self, other: &Self) -> Result<()> {
        if self.rows == 0 && self.cols == 0 {
            *self = other.clone();
            return Ok(());
        }
        check_dimensions("DynMatrix rows", self.rows, other.rows)?;
        check_dimensions("DynMatrix cols", self.cols, other.cols)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += *b;
        }
        Ok(())
    }

    fn row_slice(&self, r: usize) -> &[K] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }
}

impl<K> IndexAccess for DynMatrix<K>
where
    K: Field + IndexAccess<Scalar = K>,
{
    type Scalar = K;
    const ROLE: BlockRole = BlockRole::Dynamic;

    fn num_children(&self) -> usize {
        self.rows
    }

    fn apply_child<V>(&self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitor<K>,
    {
        check_index(i, self.rows)?;
        visitor.visit(self.row_slice(i))
    }

    fn apply_child_mut<V>(&mut self, i: usize, visitor: V) -> Result<V::Output>
    where
        V: ChildVisitorMut<K>,
    {
        check_index(i, self.rows)?;
        let cols = self.cols;
        visitor.visit_mut(&mut self.data[i * cols..(i + 1) * cols])
    }

    fn for_each_scalar(&self, f: &mut dyn FnMut(&K)) {
        self.data.iter().for_each(f)
    }

    fn for_each_scalar_mut(&mut self, f: &mut dyn FnMut(&mut K)) {
        self.data.iter_mut().for_each(f)
    }
}

impl<K: Field> FlatMatrix for DynMatrix<K> {
    type Scalar = K;
    const STATIC_SHAPE: Option<(usize, usize)> = None;

    fn flat_for_each(
        &self,
        row_offset: usize,
        col_offset: usize,
        f: &mut dyn FnMut(&K, usize, usize),
    ) -> (usize, usize) {
        for r in 0..self.rows {
            for (c, value) in self.row_slice(r).iter().enumerate() {
                f(value, row_offset + r, col_offset + c);
            }
        }
        (self.rows, self.cols)
    }

    fn flat_for_each_mut(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        f: &mut dyn FnMut(&mut K, usize, usize),
    ) -> (usize, usize) {
        let cols = self.cols.max(1);
        for (k, value) in self.data.iter_mut().enumerate() {
            f(value, row_offset + k / cols, col_offset + k % cols);
        }
        (self.rows, self.cols)
    }

    fn flat_shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl<K> BlockShape for DynMatrix<K> {
    fn num_rows(&self) -> usize {
        self.rows
    }

    fn num_cols(&self) -> usize {
        self.cols
    }
}
