//! Sparsity pattern accumulation before matrix allocation
//!
//! A [`MatrixIndexSet`] collects `(row, col)` coordinates in any order and
//! exports them as the fixed pattern of a [`BcrsMatrix`].

use std::collections::BTreeSet;

use bcrs_core::{check_dimensions, check_index, BcrsError, BuildMode, BuildStage, Result};
use tracing::debug;

use crate::matrix::BcrsMatrix;

/// Row-wise set of nonzero block coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixIndexSet {
    cols: usize,
    indices: Vec<BTreeSet<usize>>,
}

impl MatrixIndexSet {
    /// Create an empty pattern of the given block dimensions
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            indices: vec![BTreeSet::new(); rows],
        }
    }

    /// Reset to an empty pattern of the given block dimensions
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.cols = cols;
        self.indices.clear();
        self.indices.resize(rows, BTreeSet::new());
    }

    /// Add coordinate `(i, j)`; adding it again has no effect
    pub fn add(&mut self, i: usize, j: usize) -> Result<()> {
        check_index(i, self.indices.len())?;
        check_index(j, self.cols)?;
        self.indices[i].insert(j);
        Ok(())
    }

    /// Number of block rows
    pub fn rows(&self) -> usize {
        self.indices.len()
    }

    /// Number of block columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of distinct coordinates
    pub fn size(&self) -> usize {
        self.indices.iter().map(BTreeSet::len).sum()
    }

    /// Number of distinct columns in row `i`
    pub fn row_size(&self, i: usize) -> Result<usize> {
        check_index(i, self.indices.len())?;
        Ok(self.indices[i].len())
    }

    /// Columns of row `i` in ascending order
    pub fn column_indices(&self, i: usize) -> Result<impl Iterator<Item = usize> + '_> {
        check_index(i, self.indices.len())?;
        Ok(self.indices[i].iter().copied())
    }

    /// Merge the pattern of a built matrix, shifted by the given offsets
    pub fn import<B>(
        &mut self,
        matrix: &BcrsMatrix<B>,
        row_offset: usize,
        col_offset: usize,
    ) -> Result<()> {
        for row in matrix.rows()? {
            for &j in row.columns() {
                self.add(row.index() + row_offset, j + col_offset)?;
            }
        }
        Ok(())
    }

    /// Install the collected pattern into `matrix`
    ///
    /// An unsized matrix takes the dimensions of the index set; a sized one
    /// must match them. The matrix ends up built in fixed mode with every
    /// value at its default.
    pub fn export_idx<B: Default>(&self, matrix: &mut BcrsMatrix<B>) -> Result<()> {
        if matrix.build_stage().is_building() {
            return Err(BcrsError::InvalidState(
                "cannot export a pattern into a matrix under construction",
            ));
        }
        if matrix.build_stage() == BuildStage::Uninitialized {
            matrix.set_build_mode(BuildMode::Fixed)?;
            matrix.set_size(self.rows(), self.cols, 0)?;
        } else {
            check_dimensions("export_idx rows", matrix.n(), self.rows())?;
            check_dimensions("export_idx cols", matrix.m(), self.cols)?;
        }

        let mut row_ptr = Vec::with_capacity(self.rows() + 1);
        let mut col_idx = Vec::with_capacity(self.size());
        row_ptr.push(0);
        for row in &self.indices {
            col_idx.extend(row.iter().copied());
            row_ptr.push(col_idx.len());
        }
        debug!(
            rows = self.rows(),
            cols = self.cols,
            nnz = col_idx.len(),
            "exporting index set pattern"
        );
        matrix.install_pattern(BuildMode::Fixed, row_ptr, col_idx);
        Ok(())
    }
}
