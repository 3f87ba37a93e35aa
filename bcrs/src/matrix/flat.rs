//! Flat scalar view of a block matrix

use bcrs_core::{check_dimensions, FlatMatrix, Result};

use super::BcrsMatrix;

impl<B: FlatMatrix> BcrsMatrix<B> {
    /// Flat height of every block row and flat width of every block column
    ///
    /// Statically sized blocks give every row and column the same extent.
    /// Otherwise extents are read from the stored non-empty blocks, and a row
    /// or column without one takes the first extent observed elsewhere.
    /// Empty blocks (as left in pattern slots never written) carry no extent.
    pub fn block_extents(&self) -> (Vec<usize>, Vec<usize>) {
        if let Some((height, width)) = B::STATIC_SHAPE {
            return (vec![height; self.n], vec![width; self.m]);
        }
        let mut heights = vec![None; self.n];
        let mut widths = vec![None; self.m];
        if self.is_built() {
            for (i, height) in heights.iter_mut().enumerate() {
                for k in self.row_range(i) {
                    let (rows, cols) = self.values[k].flat_shape();
                    if rows == 0 && cols == 0 {
                        continue;
                    }
                    height.get_or_insert(rows);
                    widths[self.col_idx[k]].get_or_insert(cols);
                }
            }
        }
        (resolve_extents(heights), resolve_extents(widths))
    }

    /// Check that every non-empty block fits its block row and column
    ///
    /// Fails with `DimensionMismatch` when two blocks of one block row
    /// disagree on their height, or two blocks of one block column on their
    /// width. Flat positions of such a matrix would overlap.
    pub fn check_block_extents(&self) -> Result<()> {
        if B::STATIC_SHAPE.is_some() || !self.is_built() {
            return Ok(());
        }
        let (heights, widths) = self.block_extents();
        for (i, &height) in heights.iter().enumerate() {
            for k in self.row_range(i) {
                let (rows, cols) = self.values[k].flat_shape();
                if rows == 0 && cols == 0 {
                    continue;
                }
                check_dimensions("block row height", height, rows)?;
                check_dimensions("block column width", widths[self.col_idx[k]], cols)?;
            }
        }
        Ok(())
    }
}

fn resolve_extents(extents: Vec<Option<usize>>) -> Vec<usize> {
    let fallback = extents.iter().flatten().next().copied().unwrap_or(0);
    extents
        .into_iter()
        .map(|extent| extent.unwrap_or(fallback))
        .collect()
}

fn offsets(extents: &[usize]) -> Vec<usize> {
    extents
        .iter()
        .scan(0, |next, &extent| {
            let start = *next;
            *next += extent;
            Some(start)
        })
        .collect()
}

impl<B: FlatMatrix> FlatMatrix for BcrsMatrix<B> {
    type Scalar = B::Scalar;
    const STATIC_SHAPE: Option<(usize, usize)> = None;

    fn flat_for_each(
        &self,
        row_offset: usize,
        col_offset: usize,
        f: &mut dyn FnMut(&B::Scalar, usize, usize),
    ) -> (usize, usize) {
        let (heights, widths) = self.block_extents();
        let row_starts = offsets(&heights);
        let col_starts = offsets(&widths);
        if self.is_built() {
            for (i, row_start) in row_starts.iter().enumerate() {
                for k in self.row_range(i) {
                    let col_start = col_starts[self.col_idx[k]];
                    self.values[k].flat_for_each(
                        row_offset + row_start,
                        col_offset + col_start,
                        f,
                    );
                }
            }
        }
        (heights.iter().sum(), widths.iter().sum())
    }

    fn flat_for_each_mut(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        f: &mut dyn FnMut(&mut B::Scalar, usize, usize),
    ) -> (usize, usize) {
        let (heights, widths) = self.block_extents();
        let row_starts = offsets(&heights);
        let col_starts = offsets(&widths);
        if self.is_built() {
            for (i, row_start) in row_starts.iter().enumerate() {
                for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                    let col_start = col_starts[self.col_idx[k]];
                    self.values[k].flat_for_each_mut(
                        row_offset + row_start,
                        col_offset + col_start,
                        f,
                    );
                }
            }
        }
        (heights.iter().sum(), widths.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DynMatrix, MatrixIndexSet};
    use bcrs_core::BcrsError;

    fn dyn_pattern() -> BcrsMatrix<DynMatrix<f64>> {
        let mut mis = MatrixIndexSet::new(2, 2);
        mis.add(0, 0).unwrap();
        mis.add(0, 1).unwrap();
        mis.add(1, 1).unwrap();
        let mut matrix = BcrsMatrix::new();
        mis.export_idx(&mut matrix).unwrap();
        matrix
    }

    #[test]
    fn test_scalar_matrix_positions() {
        let mut matrix = BcrsMatrix::<f64>::implicit(3, 4, 2, 0.0).unwrap();
        *matrix.entry(0, 3).unwrap() = 1.0;
        *matrix.entry(2, 0).unwrap() = 2.0;
        matrix.compress().unwrap();

        let mut seen = Vec::new();
        let shape = matrix.flat_for_each(0, 0, &mut |v, r, c| seen.push((*v, r, c)));
        assert_eq!(shape, (3, 4));
        assert_eq!(seen, vec![(1.0, 0, 3), (2.0, 2, 0)]);
    }

    #[test]
    fn test_unbuilt_matrix_visits_nothing() {
        let matrix = BcrsMatrix::<f64>::implicit(2, 2, 1, 0.0).unwrap();
        let mut count = 0;
        assert_eq!(matrix.flat_for_each(0, 0, &mut |_, _, _| count += 1), (2, 2));
        assert_eq!(count, 0);
        assert!(matches!(matrix.get(0, 0), Err(BcrsError::InvalidState(_))));
    }

    #[test]
    fn test_unfilled_dynamic_blocks_carry_no_extent() {
        let mut matrix = dyn_pattern();
        *matrix.get_mut(0, 1).unwrap() = DynMatrix::from_rows(vec![vec![1.0; 2]; 2]).unwrap();
        *matrix.get_mut(1, 1).unwrap() = DynMatrix::from_rows(vec![vec![10.0; 2]; 2]).unwrap();

        assert_eq!(matrix.block_extents(), (vec![2, 2], vec![2, 2]));
        assert_eq!(matrix.check_block_extents(), Ok(()));

        let mut seen = Vec::new();
        let shape = matrix.flat_for_each(0, 0, &mut |v, r, c| seen.push((*v, r, c)));
        assert_eq!(shape, (4, 4));
        assert_eq!(seen.len(), 8);
        assert!(seen[..4].iter().all(|&(v, r, c)| v == 1.0 && r < 2 && c >= 2));
        assert!(seen[4..].iter().all(|&(v, r, c)| v == 10.0 && r >= 2 && c >= 2));
    }

    #[test]
    fn test_disagreeing_block_widths_rejected() {
        let mut matrix = dyn_pattern();
        *matrix.get_mut(0, 1).unwrap() = DynMatrix::zeros(2, 2);
        *matrix.get_mut(1, 1).unwrap() = DynMatrix::zeros(2, 3);
        assert_eq!(
            matrix.check_block_extents(),
            Err(BcrsError::DimensionMismatch {
                context: "block column width",
                expected: 2,
                found: 3,
            })
        );
    }
}
