//! Random build mode: row sizes first, then column indices

use bcrs_core::{check_index, BcrsError, BuildMode, BuildStage, Result};

use super::BcrsMatrix;

/// Pattern collected during a random-mode build
#[derive(Debug)]
pub(crate) struct RandomBuffer {
    row_sizes: Vec<usize>,
    rows: Vec<Vec<usize>>,
    nnz_hint: usize,
}

impl RandomBuffer {
    pub(crate) fn new(rows: usize, nnz_hint: usize) -> Self {
        Self {
            row_sizes: vec![0; rows],
            rows: Vec::new(),
            nnz_hint,
        }
    }
}

impl<B> BcrsMatrix<B> {
    fn random_buffer(
        &mut self,
        stage: BuildStage,
        operation: &'static str,
    ) -> Result<&mut RandomBuffer> {
        if self.mode != BuildMode::Random || self.stage != stage {
            return Err(BcrsError::InvalidState(operation));
        }
        self.random
            .as_mut()
            .ok_or(BcrsError::InvalidState("random build buffer is missing"))
    }

    /// Declare the number of blocks in row `i`
    pub fn set_row_size(&mut self, i: usize, size: usize) -> Result<()> {
        let m = self.m;
        let buffer = self.random_buffer(
            BuildStage::RowSizes,
            "set_row_size() is only available while collecting row sizes",
        )?;
        check_index(i, buffer.row_sizes.len())?;
        if size > m {
            return Err(BcrsError::InvalidParameter {
                name: "size",
                reason: "row size exceeds the number of columns",
            });
        }
        buffer.row_sizes[i] = size;
        Ok(())
    }

    /// Declared number of blocks in row `i`
    pub fn row_size(&self, i: usize) -> Result<usize> {
        check_index(i, self.n)?;
        match (&self.random, self.stage.is_built()) {
            (Some(buffer), false) => Ok(buffer.row_sizes[i]),
            (_, true) => Ok(self.row_ptr[i + 1] - self.row_ptr[i]),
            (None, false) => Err(BcrsError::InvalidState(
                "row sizes are only known during a random build or once built",
            )),
        }
    }

    /// Finish declaring row sizes and start collecting column indices
    pub fn end_row_sizes(&mut self) -> Result<()> {
        let buffer = self.random_buffer(
            BuildStage::RowSizes,
            "end_row_sizes() requires the row size stage of a random build",
        )?;
        let total: usize = buffer.row_sizes.iter().sum();
        buffer.rows = buffer
            .row_sizes
            .iter()
            .map(|&size| Vec::with_capacity(size))
            .collect();
        buffer.nnz_hint = buffer.nnz_hint.max(total);
        self.set_stage(BuildStage::Indices);
        Ok(())
    }

    /// Add column `j` to the pattern of row `i`
    ///
    /// Adding a column twice is a no-op. Fails with `RowFull` once the row
    /// holds its declared number of distinct columns.
    pub fn add_index(&mut self, i: usize, j: usize) -> Result<()> {
        let m = self.m;
        let buffer = self.random_buffer(
            BuildStage::Indices,
            "add_index() is only available while collecting column indices",
        )?;
        check_index(i, buffer.rows.len())?;
        check_index(j, m)?;
        let size = buffer.row_sizes[i];
        let row = &mut buffer.rows[i];
        if row.contains(&j) {
            return Ok(());
        }
        if row.len() == size {
            return Err(BcrsError::RowFull { row: i, size });
        }
        row.push(j);
        Ok(())
    }

    /// Add several columns to the pattern of row `i`
    pub fn set_indices<I>(&mut self, i: usize, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        for j in columns {
            self.add_index(i, j)?;
        }
        Ok(())
    }

    /// Finish a random build
    ///
    /// Rows that received fewer columns than declared are compacted. All
    /// values start at their default.
    pub fn end_indices(&mut self) -> Result<()>
    where
        B: Default,
    {
        let buffer = self.random_buffer(
            BuildStage::Indices,
            "end_indices() requires the index stage of a random build",
        )?;
        let rows = std::mem::take(&mut buffer.rows);
        let nnz_hint = buffer.nnz_hint;

        let mut row_ptr = Vec::with_capacity(rows.len() + 1);
        let mut col_idx = Vec::with_capacity(nnz_hint);
        row_ptr.push(0);
        for mut row in rows {
            row.sort_unstable();
            col_idx.extend_from_slice(&row);
            row_ptr.push(col_idx.len());
        }
        self.install_pattern(BuildMode::Random, row_ptr, col_idx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_matrix() -> BcrsMatrix<f64> {
        BcrsMatrix::with_size(3, 3, 0, BuildMode::Random).unwrap()
    }

    #[test]
    fn test_random_build_protocol() {
        let mut matrix = random_matrix();
        matrix.set_row_size(0, 2).unwrap();
        matrix.set_row_size(1, 1).unwrap();
        matrix.set_row_size(2, 2).unwrap();
        matrix.end_row_sizes().unwrap();

        matrix.set_indices(0, [2, 0]).unwrap();
        matrix.add_index(1, 1).unwrap();
        matrix.add_index(1, 1).unwrap();
        matrix.add_index(2, 2).unwrap();
        matrix.end_indices().unwrap();

        assert!(matrix.is_built());
        assert_eq!(matrix.nnz(), 4);
        assert_eq!(matrix.row_size(2).unwrap(), 1);
        assert!(matrix.exists(0, 0));
        assert!(!matrix.exists(0, 1));
        *matrix.get_mut(0, 2).unwrap() = 4.0;
        assert_eq!(*matrix.get(0, 2).unwrap(), 4.0);
        assert_eq!(
            matrix.get_mut(2, 0),
            Err(BcrsError::NotInPattern { row: 2, col: 0 })
        );
    }

    #[test]
    fn test_row_full() {
        let mut matrix = random_matrix();
        matrix.set_row_size(0, 1).unwrap();
        matrix.end_row_sizes().unwrap();
        matrix.add_index(0, 0).unwrap();
        assert_eq!(
            matrix.add_index(0, 1),
            Err(BcrsError::RowFull { row: 0, size: 1 })
        );
    }

    #[test]
    fn test_stage_order_enforced() {
        let mut matrix = random_matrix();
        assert!(matches!(
            matrix.add_index(0, 0),
            Err(BcrsError::InvalidState(_))
        ));
        matrix.end_row_sizes().unwrap();
        assert!(matches!(
            matrix.set_row_size(0, 1),
            Err(BcrsError::InvalidState(_))
        ));
        assert!(matches!(matrix.get(0, 0), Err(BcrsError::InvalidState(_))));
        assert!(matrix.try_clone().is_err());
    }
}
