//! Scalar compressed layouts for direct solvers
//!
//! Block matrices are flattened into plain CSR or CSC arrays of scalars, the
//! form external factorization libraries consume. Block row-major storage is
//! converted entry by entry through the flat matrix traversal.

use bcrs_core::{DataType, Field, FlatMatrix, MatrixFormat, Result};
use tracing::debug;

use crate::BcrsMatrix;

/// Scalar matrix in compressed row or column form
///
/// For [`MatrixFormat::Csr`] `ptr` has `rows + 1` entries and `idx` holds
/// column indices; for [`MatrixFormat::Csc`] `ptr` has `cols + 1` entries
/// and `idx` holds row indices. Indices are sorted within each row or column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarCompressed<K> {
    pub format: MatrixFormat,
    pub data_type: DataType,
    pub rows: usize,
    pub cols: usize,
    pub ptr: Vec<usize>,
    pub idx: Vec<usize>,
    pub values: Vec<K>,
}

impl<K> ScalarCompressed<K> {
    /// Number of stored scalars
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// Flatten any flat matrix into scalar CSR
pub fn to_scalar_csr<M>(matrix: &M) -> ScalarCompressed<M::Scalar>
where
    M: FlatMatrix + ?Sized,
{
    compress_triplets(matrix, MatrixFormat::Csr)
}

/// Flatten any flat matrix into scalar CSC
pub fn to_scalar_csc<M>(matrix: &M) -> ScalarCompressed<M::Scalar>
where
    M: FlatMatrix + ?Sized,
{
    compress_triplets(matrix, MatrixFormat::Csc)
}

fn compress_triplets<M>(matrix: &M, format: MatrixFormat) -> ScalarCompressed<M::Scalar>
where
    M: FlatMatrix + ?Sized,
{
    // (major, minor, value): rows first for CSR, columns first for CSC
    let mut triplets = Vec::new();
    let (rows, cols) = matrix.flat_for_each(0, 0, &mut |value, r, c| match format {
        MatrixFormat::Csr => triplets.push((r, c, *value)),
        MatrixFormat::Csc => triplets.push((c, r, *value)),
    });
    triplets.sort_by_key(|&(major, minor, _)| (major, minor));
    merge_duplicates(&mut triplets);

    let majors = match format {
        MatrixFormat::Csr => rows,
        MatrixFormat::Csc => cols,
    };
    let mut ptr = vec![0; majors + 1];
    for &(major, _, _) in &triplets {
        ptr[major + 1] += 1;
    }
    for k in 0..majors {
        ptr[k + 1] += ptr[k];
    }
    let (idx, values) = triplets
        .into_iter()
        .map(|(_, minor, value)| (minor, value))
        .unzip();

    let compressed = ScalarCompressed {
        format,
        data_type: M::Scalar::data_type(),
        rows,
        cols,
        ptr,
        idx,
        values,
    };
    debug!(
        format = %format,
        rows,
        cols,
        nnz = compressed.nnz(),
        "flattened block matrix"
    );
    compressed
}

fn merge_duplicates<K: Field>(triplets: &mut Vec<(usize, usize, K)>) {
    triplets.dedup_by(|next, kept| {
        let same = next.0 == kept.0 && next.1 == kept.1;
        if same {
            kept.2 += next.2;
        }
        same
    });
}

impl<B: FlatMatrix> BcrsMatrix<B> {
    /// Scalar CSR arrays of a built matrix
    ///
    /// Fails if dynamically sized blocks disagree on their extents.
    pub fn to_scalar_csr(&self) -> Result<ScalarCompressed<B::Scalar>> {
        self.ensure_built()?;
        self.check_block_extents()?;
        Ok(to_scalar_csr(self))
    }

    /// Scalar CSC arrays of a built matrix
    pub fn to_scalar_csc(&self) -> Result<ScalarCompressed<B::Scalar>> {
        self.ensure_built()?;
        self.check_block_extents()?;
        Ok(to_scalar_csc(self))
    }
}
