//! Block compressed row storage matrix
//!
//! A [`BcrsMatrix`] is built in two phases: the sparsity pattern is fixed
//! first, then values are written into it. The pattern comes from one of
//! three build modes:
//!
//! - **fixed**: exported from a [`MatrixIndexSet`](crate::MatrixIndexSet)
//! - **random**: row sizes, then column indices, declared explicitly
//! - **implicit**: unordered `entry(i, j)` insertion followed by `compress()`
//!
//! Rows, values and traversal are only available once the matrix is built.

mod flat;
mod implicit;
mod random;
mod row;

pub use implicit::{ImplicitMatrixBuilder, ImplicitRow};
pub use row::{CsrView, Row, RowMut};

use bcrs_core::{
    BcrsError, BlockShape, BuildMode, BuildStage, ImplicitBuildParams, IndexAccess,
    PatternOperations, Result, SparseMatrix,
};
use tracing::trace;

use implicit::ImplicitBuffer;
use random::RandomBuffer;

/// Sparse matrix of blocks `B` in compressed row storage
///
/// The matrix owns its arrays. It deliberately does not implement `Clone`:
/// copying is fallible while a build is in progress, see
/// [`BcrsMatrix::try_clone`].
#[derive(Debug)]
pub struct BcrsMatrix<B> {
    n: usize,
    m: usize,
    mode: BuildMode,
    stage: BuildStage,
    params: Option<ImplicitBuildParams>,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<B>,
    implicit: Option<ImplicitBuffer<B>>,
    random: Option<RandomBuffer>,
}

impl<B> Default for BcrsMatrix<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> BcrsMatrix<B> {
    /// Create an empty, unsized matrix with no build mode
    pub fn new() -> Self {
        Self {
            n: 0,
            m: 0,
            mode: BuildMode::Unspecified,
            stage: BuildStage::Uninitialized,
            params: None,
            row_ptr: Vec::new(),
            col_idx: Vec::new(),
            values: Vec::new(),
            implicit: None,
            random: None,
        }
    }

    /// Create a sized matrix in the given build mode
    ///
    /// `nnz` is a capacity hint for random mode and must be zero in implicit
    /// mode.
    pub fn with_size(rows: usize, cols: usize, nnz: usize, mode: BuildMode) -> Result<Self> {
        let mut matrix = Self::new();
        matrix.set_build_mode(mode)?;
        matrix.set_size(rows, cols, nnz)?;
        Ok(matrix)
    }

    /// Create a sized matrix with implicit build parameters
    ///
    /// Implicit parameters are only meaningful in [`BuildMode::Implicit`];
    /// any other mode is rejected.
    pub fn with_implicit_params(
        rows: usize,
        cols: usize,
        avg_entries_per_row: usize,
        overflow_fraction: f64,
        mode: BuildMode,
    ) -> Result<Self> {
        if mode != BuildMode::Implicit {
            return Err(BcrsError::InvalidParameter {
                name: "mode",
                reason: "implicit build parameters require the implicit build mode",
            });
        }
        let mut matrix = Self::new();
        matrix.set_build_mode(mode)?;
        matrix.set_implicit_build_params(avg_entries_per_row, overflow_fraction)?;
        matrix.set_size(rows, cols, 0)?;
        Ok(matrix)
    }

    /// Shorthand for an implicit-mode matrix
    pub fn implicit(
        rows: usize,
        cols: usize,
        avg_entries_per_row: usize,
        overflow_fraction: f64,
    ) -> Result<Self> {
        Self::with_implicit_params(
            rows,
            cols,
            avg_entries_per_row,
            overflow_fraction,
            BuildMode::Implicit,
        )
    }

    /// Choose the build mode; only allowed before the matrix is sized
    pub fn set_build_mode(&mut self, mode: BuildMode) -> Result<()> {
        if self.stage != BuildStage::Uninitialized {
            return Err(BcrsError::InvalidState(
                "build mode can only be set before the matrix is sized",
            ));
        }
        self.mode = mode;
        Ok(())
    }

    /// Set the implicit build parameters; only allowed before the matrix is sized
    pub fn set_implicit_build_params(
        &mut self,
        avg_entries_per_row: usize,
        overflow_fraction: f64,
    ) -> Result<()> {
        if self.stage != BuildStage::Uninitialized {
            return Err(BcrsError::InvalidState(
                "implicit build parameters can only be set before the matrix is sized",
            ));
        }
        self.params = Some(ImplicitBuildParams::new(
            avg_entries_per_row,
            overflow_fraction,
        )?);
        Ok(())
    }

    /// Size the matrix and enter the first build stage of its mode
    ///
    /// Any previous pattern, values or buffered entries are discarded. In
    /// implicit mode `nnz` must be zero; the buffer is sized from the implicit
    /// build parameters.
    pub fn set_size(&mut self, rows: usize, cols: usize, nnz: usize) -> Result<()> {
        let next = match self.mode {
            BuildMode::Implicit => {
                if nnz != 0 {
                    return Err(BcrsError::InvalidParameter {
                        name: "nnz",
                        reason: "must be zero in implicit build mode",
                    });
                }
                let params = self.params.unwrap_or_default();
                self.params = Some(params);
                self.implicit = Some(ImplicitBuffer::new(rows, cols, params)?);
                self.random = None;
                BuildStage::ImplicitBuilding
            }
            BuildMode::Random => {
                self.implicit = None;
                self.random = Some(RandomBuffer::new(rows, nnz));
                BuildStage::RowSizes
            }
            BuildMode::Fixed | BuildMode::Unspecified => {
                self.implicit = None;
                self.random = None;
                BuildStage::Allocated
            }
        };
        self.n = rows;
        self.m = cols;
        self.row_ptr.clear();
        self.col_idx.clear();
        self.values.clear();
        self.set_stage(next);
        Ok(())
    }

    /// Drop size, pattern and values; mode and parameters are kept
    pub fn clear(&mut self) {
        self.n = 0;
        self.m = 0;
        self.row_ptr = Vec::new();
        self.col_idx = Vec::new();
        self.values = Vec::new();
        self.implicit = None;
        self.random = None;
        self.set_stage(BuildStage::Uninitialized);
    }

    /// Number of block rows
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of block columns
    pub fn m(&self) -> usize {
        self.m
    }

    /// Number of stored blocks; zero until the matrix is built
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Current build mode
    pub fn build_mode(&self) -> BuildMode {
        self.mode
    }

    /// Current build stage
    pub fn build_stage(&self) -> BuildStage {
        self.stage
    }

    /// Whether the pattern is final and rows are accessible
    pub fn is_built(&self) -> bool {
        self.stage.is_built()
    }

    /// Implicit build parameters, if any were set or defaulted
    pub fn implicit_params(&self) -> Option<ImplicitBuildParams> {
        self.params
    }

    /// Number of entries the implicit buffer accepts before `compress()` fails
    pub fn implicit_capacity(&self) -> Option<usize> {
        self.implicit.as_ref().map(ImplicitBuffer::capacity)
    }

    /// Whether block `(i, j)` is part of the pattern of a built matrix
    pub fn exists(&self, i: usize, j: usize) -> bool {
        self.position(i, j).is_some()
    }

    /// Block at `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> Result<&B> {
        self.ensure_built()?;
        let k = self.locate(i, j)?;
        Ok(&self.values[k])
    }

    /// Mutable block at `(i, j)`
    pub fn get_mut(&mut self, i: usize, j: usize) -> Result<&mut B> {
        self.ensure_built()?;
        let k = self.locate(i, j)?;
        Ok(&mut self.values[k])
    }

    /// Set every stored scalar to `value`
    pub fn fill(&mut self, value: B::Scalar) -> Result<()>
    where
        B: IndexAccess,
    {
        self.ensure_built()?;
        for block in &mut self.values {
            block.for_each_scalar_mut(&mut |x| *x = value);
        }
        Ok(())
    }

    /// Deep copy of a matrix that is not under construction
    pub fn try_clone(&self) -> Result<Self>
    where
        B: Clone,
    {
        if self.stage.is_building() {
            return Err(BcrsError::InvalidState(
                "cannot copy a matrix while it is being built",
            ));
        }
        Ok(Self {
            n: self.n,
            m: self.m,
            mode: self.mode,
            stage: self.stage,
            params: self.params,
            row_ptr: self.row_ptr.clone(),
            col_idx: self.col_idx.clone(),
            values: self.values.clone(),
            implicit: None,
            random: None,
        })
    }

    /// Replace `self` with a deep copy of `other`
    ///
    /// Fails if either matrix is under construction.
    pub fn assign_from(&mut self, other: &Self) -> Result<()>
    where
        B: Clone,
    {
        if self.stage.is_building() {
            return Err(BcrsError::InvalidState(
                "cannot assign to a matrix while it is being built",
            ));
        }
        *self = other.try_clone()?;
        Ok(())
    }

    pub(crate) fn ensure_built(&self) -> Result<()> {
        if !self.stage.is_built() {
            return Err(BcrsError::InvalidState(
                "matrix is not built; finish the build before accessing rows",
            ));
        }
        Ok(())
    }

    pub(crate) fn set_stage(&mut self, stage: BuildStage) {
        trace!(mode = %self.mode, from = %self.stage, to = %stage, "build stage transition");
        self.stage = stage;
    }

    /// Install a finished pattern with default values and mark the matrix built
    pub(crate) fn install_pattern(
        &mut self,
        mode: BuildMode,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
    ) where
        B: Default,
    {
        self.mode = mode;
        self.values = std::iter::repeat_with(B::default)
            .take(col_idx.len())
            .collect();
        self.row_ptr = row_ptr;
        self.col_idx = col_idx;
        self.implicit = None;
        self.random = None;
        self.set_stage(BuildStage::Built);
    }

    /// Storage position of `(i, j)` if the matrix is built and stores it
    fn position(&self, i: usize, j: usize) -> Option<usize> {
        if !self.stage.is_built() || i >= self.n {
            return None;
        }
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        self.col_idx[start..end]
            .binary_search(&j)
            .ok()
            .map(|k| start + k)
    }

    fn locate(&self, i: usize, j: usize) -> Result<usize> {
        bcrs_core::check_index(i, self.n)?;
        bcrs_core::check_index(j, self.m)?;
        self.position(i, j)
            .ok_or(BcrsError::NotInPattern { row: i, col: j })
    }

    fn row_range(&self, i: usize) -> std::ops::Range<usize> {
        self.row_ptr[i]..self.row_ptr[i + 1]
    }
}

impl<B> SparseMatrix for BcrsMatrix<B> {
    type Block = B;

    fn get_block(&self, row: usize, col: usize) -> Option<&B> {
        self.position(row, col).map(|k| &self.values[k])
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.n, self.m)
    }

    fn nnz(&self) -> usize {
        self.col_idx.len()
    }
}

impl<B> PatternOperations for BcrsMatrix<B> {
    fn row_pattern(&self, row_index: usize) -> Vec<usize> {
        if !self.stage.is_built() || row_index >= self.n {
            return Vec::new();
        }
        self.col_idx[self.row_range(row_index)].to_vec()
    }

    fn col_pattern(&self, col_index: usize) -> Vec<usize> {
        (0..self.n)
            .filter(|&i| self.exists(i, col_index))
            .collect()
    }
}

impl<B> BlockShape for BcrsMatrix<B> {
    fn num_rows(&self) -> usize {
        self.n
    }

    fn num_cols(&self) -> usize {
        self.m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix_is_uninitialized() {
        let matrix = BcrsMatrix::<f64>::new();
        assert_eq!(matrix.build_mode(), BuildMode::Unspecified);
        assert_eq!(matrix.build_stage(), BuildStage::Uninitialized);
        assert_eq!(matrix.dimensions(), (0, 0));
        assert!(matches!(matrix.get(0, 0), Err(BcrsError::InvalidState(_))));
    }

    #[test]
    fn test_build_mode_locked_after_sizing() {
        let mut matrix = BcrsMatrix::<f64>::new();
        matrix.set_build_mode(BuildMode::Random).unwrap();
        matrix.set_size(3, 3, 0).unwrap();
        assert_eq!(matrix.build_stage(), BuildStage::RowSizes);
        assert!(matches!(
            matrix.set_build_mode(BuildMode::Implicit),
            Err(BcrsError::InvalidState(_))
        ));
    }

    #[test]
    fn test_clear_returns_to_uninitialized() {
        let mut matrix = BcrsMatrix::<f64>::implicit(4, 4, 2, 0.5).unwrap();
        *matrix.entry(1, 1).unwrap() = 1.0;
        matrix.compress().unwrap();
        matrix.clear();
        assert_eq!(matrix.build_stage(), BuildStage::Uninitialized);
        assert_eq!(matrix.build_mode(), BuildMode::Implicit);
        assert_eq!(matrix.nnz(), 0);
        matrix.set_implicit_build_params(3, 0.0).unwrap();
    }

    #[test]
    fn test_fill_and_try_clone_are_independent() {
        let mut matrix = BcrsMatrix::<f64>::implicit(2, 2, 2, 0.0).unwrap();
        *matrix.entry(0, 0).unwrap() = 1.0;
        *matrix.entry(1, 0).unwrap() = 2.0;
        matrix.compress().unwrap();

        let mut copy = matrix.try_clone().unwrap();
        copy.fill(3.0).unwrap();
        assert_eq!(*copy.get(1, 0).unwrap(), 3.0);
        assert_eq!(*matrix.get(1, 0).unwrap(), 2.0);
        assert_eq!(
            matrix.get(0, 1),
            Err(BcrsError::NotInPattern { row: 0, col: 1 })
        );
    }

    #[test]
    fn test_patterns() {
        let mut matrix = BcrsMatrix::<f64>::implicit(3, 3, 2, 0.0).unwrap();
        for (i, j) in [(0, 2), (0, 0), (2, 2), (1, 0)] {
            *matrix.entry(i, j).unwrap() += 1.0;
        }
        matrix.compress().unwrap();
        assert_eq!(matrix.row_pattern(0), vec![0, 2]);
        assert_eq!(matrix.col_pattern(0), vec![0, 1]);
        assert_eq!(matrix.col_pattern(1), Vec::<usize>::new());
        assert_eq!(matrix.get_block(2, 2), Some(&1.0));
        assert_eq!(matrix.get_block(2, 1), None);
    }
}
