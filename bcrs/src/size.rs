//! Sizes of nested containers
//!
//! `num_*` count scalars of the flattened container; `entries`, `rows` and
//! `cols` count blocks at the outermost level only.

use bcrs_core::{BlockShape, FlatMatrix, FlatVector};

/// Flat scalar dimension of a vector
pub fn num_entries<V: FlatVector + ?Sized>(vector: &V) -> usize {
    vector.flat_dim()
}

/// Flat scalar row count of a matrix
pub fn num_rows<M: FlatMatrix + ?Sized>(matrix: &M) -> usize {
    matrix.flat_shape().0
}

/// Flat scalar column count of a matrix
pub fn num_cols<M: FlatMatrix + ?Sized>(matrix: &M) -> usize {
    matrix.flat_shape().1
}

/// Number of blocks of a vector
pub fn entries<V: BlockShape + ?Sized>(vector: &V) -> usize {
    vector.num_rows()
}

/// Number of block rows
pub fn rows<M: BlockShape + ?Sized>(matrix: &M) -> usize {
    matrix.num_rows()
}

/// Number of block columns
pub fn cols<M: BlockShape + ?Sized>(matrix: &M) -> usize {
    matrix.num_cols()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BcrsMatrix, FieldMatrix, MultiTypeBlockVector};

    #[test]
    fn test_block_and_scalar_counts_differ() {
        let v = vec![[0.0f64; 3]; 4];
        assert_eq!(entries(&v), 4);
        assert_eq!(num_entries(&v), 12);

        let mixed = MultiTypeBlockVector((vec![0.0f64; 2], [0.0f64; 5]));
        assert_eq!(entries(&mixed), 2);
        assert_eq!(num_entries(&mixed), 7);
    }

    #[test]
    fn test_matrix_counts() {
        let mut m = BcrsMatrix::<FieldMatrix<f64, 2, 3>>::implicit(4, 5, 1, 0.0).unwrap();
        *m.entry(0, 0).unwrap() = FieldMatrix::filled(1.0);
        m.compress().unwrap();
        assert_eq!((rows(&m), cols(&m)), (4, 5));
        assert_eq!((num_rows(&m), num_cols(&m)), (8, 15));
    }
}
