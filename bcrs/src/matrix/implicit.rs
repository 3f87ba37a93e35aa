//! Implicit build mode: buffered `entry(i, j)` insertion and compression

use bcrs_core::{
    check_index, BcrsError, BuildMode, BuildStage, CompressionStatistics, ImplicitBuildParams,
    Result,
};
use hashbrown::HashMap;
use tracing::{debug, warn};

use super::BcrsMatrix;

/// Entries buffered during an implicit build
///
/// Every row owns `avg_entries_per_row` primary slots. Further entries of a
/// full row go to the shared overflow map, so a row's overflow entries only
/// exist once its primary slots are exhausted.
#[derive(Debug)]
pub(crate) struct ImplicitBuffer<B> {
    params: ImplicitBuildParams,
    rows: Vec<Vec<(usize, B)>>,
    overflow: HashMap<(usize, usize), B>,
}

fn reserve_failed(name: &'static str) -> BcrsError {
    BcrsError::InvalidParameter {
        name,
        reason: "implicit build buffer cannot be allocated",
    }
}

impl<B> ImplicitBuffer<B> {
    /// Buffer for a `rows x cols` matrix
    ///
    /// Reserves at most `cols` primary slots per row and no more overflow
    /// slots than primary ones; the rest grows on demand.
    pub(crate) fn new(rows: usize, cols: usize, params: ImplicitBuildParams) -> Result<Self> {
        let per_row = params.avg_entries_per_row.min(cols);
        let spare = params
            .capacity(rows)
            .saturating_sub(rows.saturating_mul(params.avg_entries_per_row))
            .min(rows.saturating_mul(per_row));

        let mut buffered = Vec::new();
        buffered
            .try_reserve_exact(rows)
            .map_err(|_| reserve_failed("rows"))?;
        for _ in 0..rows {
            let mut row = Vec::new();
            row.try_reserve_exact(per_row)
                .map_err(|_| reserve_failed("avg_entries_per_row"))?;
            buffered.push(row);
        }
        let mut overflow = HashMap::new();
        overflow
            .try_reserve(spare)
            .map_err(|_| reserve_failed("overflow_fraction"))?;

        Ok(Self {
            params,
            rows: buffered,
            overflow,
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.params.capacity(self.rows.len())
    }

    fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum::<usize>() + self.overflow.len()
    }

    fn slot(&mut self, i: usize, j: usize) -> &mut B
    where
        B: Default,
    {
        let row = &mut self.rows[i];
        if let Some(k) = row.iter().position(|(col, _)| *col == j) {
            return &mut row[k].1;
        }
        if row.len() < self.params.avg_entries_per_row {
            let k = row.len();
            row.push((j, B::default()));
            return &mut row[k].1;
        }
        self.overflow.entry((i, j)).or_default()
    }
}

impl<B> BcrsMatrix<B> {
    /// Slot of block `(i, j)` during an implicit build
    ///
    /// The first call for a coordinate creates a default-valued slot; later
    /// calls return the same slot, so `*entry(i, j)? += x` accumulates.
    pub fn entry(&mut self, i: usize, j: usize) -> Result<&mut B>
    where
        B: Default,
    {
        if self.mode != BuildMode::Implicit {
            return Err(BcrsError::InvalidState(
                "entry() requires the implicit build mode",
            ));
        }
        if self.stage != BuildStage::ImplicitBuilding {
            return Err(BcrsError::InvalidState(
                "entry() is only available while the implicit build is in progress",
            ));
        }
        check_index(i, self.n)?;
        check_index(j, self.m)?;
        let buffer = self
            .implicit
            .as_mut()
            .ok_or(BcrsError::InvalidState("implicit buffer is missing"))?;
        Ok(buffer.slot(i, j))
    }

    /// Finish an implicit build
    ///
    /// Sorts every row by column, writes the compressed arrays and returns
    /// the build statistics. If more entries were buffered than the
    /// parameters allow, fails with `OverflowExhausted` and leaves the buffer
    /// untouched.
    pub fn compress(&mut self) -> Result<CompressionStatistics> {
        if self.mode != BuildMode::Implicit || self.stage != BuildStage::ImplicitBuilding {
            return Err(BcrsError::InvalidState(
                "compress() requires an implicit build in progress",
            ));
        }
        let (required, capacity) = match self.implicit.as_ref() {
            Some(buffer) => (buffer.len(), buffer.capacity()),
            None => return Err(BcrsError::InvalidState("implicit buffer is missing")),
        };
        if required > capacity {
            warn!(required, capacity, "implicit build overflow exhausted");
            return Err(BcrsError::OverflowExhausted { required, capacity });
        }
        let Some(buffer) = self.implicit.take() else {
            return Err(BcrsError::InvalidState("implicit buffer is missing"));
        };

        let overflow_total = buffer.overflow.len();
        let mut spill: Vec<((usize, usize), B)> = buffer.overflow.into_iter().collect();
        spill.sort_unstable_by_key(|(coord, _)| *coord);
        let mut spill = spill.into_iter().peekable();

        let mut row_ptr = Vec::with_capacity(self.n + 1);
        let mut col_idx = Vec::with_capacity(required);
        let mut values = Vec::with_capacity(required);
        let mut counts = Vec::with_capacity(self.n);
        row_ptr.push(0);
        for (i, mut row) in buffer.rows.into_iter().enumerate() {
            while let Some(((_, j), block)) = spill.next_if(|((r, _), _)| *r == i) {
                row.push((j, block));
            }
            row.sort_unstable_by_key(|(col, _)| *col);
            counts.push(row.len());
            for (j, block) in row {
                col_idx.push(j);
                values.push(block);
            }
            row_ptr.push(col_idx.len());
        }

        self.row_ptr = row_ptr;
        self.col_idx = col_idx;
        self.values = values;
        self.set_stage(BuildStage::Built);

        let stats = CompressionStatistics::from_row_counts(counts, overflow_total, capacity);
        debug!(
            avg = stats.avg,
            maximum = stats.maximum,
            overflow_total = stats.overflow_total,
            mem_ratio = stats.mem_ratio,
            "compressed implicit build"
        );
        Ok(stats)
    }
}

/// Row-wise facade over a matrix in an implicit build
///
/// `builder.row(i)?.entry(j)?` is equivalent to `matrix.entry(i, j)?`.
pub struct ImplicitMatrixBuilder<'a, B> {
    matrix: &'a mut BcrsMatrix<B>,
}

impl<'a, B: Default> ImplicitMatrixBuilder<'a, B> {
    /// Wrap a matrix whose implicit build is in progress
    pub fn new(matrix: &'a mut BcrsMatrix<B>) -> Result<Self> {
        if matrix.mode != BuildMode::Implicit || matrix.stage != BuildStage::ImplicitBuilding {
            return Err(BcrsError::InvalidState(
                "matrix must be in implicit build mode with its size set",
            ));
        }
        Ok(Self { matrix })
    }

    /// Configure an unsized matrix for an implicit build and wrap it
    pub fn with_size(
        matrix: &'a mut BcrsMatrix<B>,
        rows: usize,
        cols: usize,
        avg_entries_per_row: usize,
        overflow_fraction: f64,
    ) -> Result<Self> {
        if matrix.stage != BuildStage::Uninitialized {
            return Err(BcrsError::InvalidState(
                "matrix must not be sized before configuring an implicit build",
            ));
        }
        matrix.set_build_mode(BuildMode::Implicit)?;
        matrix.set_implicit_build_params(avg_entries_per_row, overflow_fraction)?;
        matrix.set_size(rows, cols, 0)?;
        Ok(Self { matrix })
    }

    /// Proxy for row `i`
    pub fn row(&mut self, i: usize) -> Result<ImplicitRow<'_, B>> {
        check_index(i, self.matrix.n)?;
        Ok(ImplicitRow {
            matrix: &mut *self.matrix,
            row: i,
        })
    }

    /// Number of block rows
    pub fn n(&self) -> usize {
        self.matrix.n
    }

    /// Number of block columns
    pub fn m(&self) -> usize {
        self.matrix.m
    }
}

/// Row proxy handed out by [`ImplicitMatrixBuilder::row`]
pub struct ImplicitRow<'a, B> {
    matrix: &'a mut BcrsMatrix<B>,
    row: usize,
}

impl<B: Default> ImplicitRow<'_, B> {
    /// Slot of the block in column `j` of this row
    pub fn entry(&mut self, j: usize) -> Result<&mut B> {
        self.matrix.entry(self.row, j)
    }

    /// Index of this row
    pub fn index(&self) -> usize {
        self.row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_slots_fill_before_overflow() {
        let params = ImplicitBuildParams::new(2, 0.5).unwrap();
        let mut buffer = ImplicitBuffer::<f64>::new(2, 3, params).unwrap();
        *buffer.slot(0, 0) += 1.0;
        *buffer.slot(0, 1) += 1.0;
        *buffer.slot(0, 2) += 1.0;
        *buffer.slot(0, 2) += 1.0;
        assert_eq!(buffer.rows[0].len(), 2);
        assert_eq!(buffer.overflow.get(&(0, 2)), Some(&2.0));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.capacity(), 6);
    }

    #[test]
    fn test_compress_sorts_rows() {
        let mut matrix = BcrsMatrix::<f64>::implicit(2, 4, 1, 2.0).unwrap();
        *matrix.entry(0, 3).unwrap() = 3.0;
        *matrix.entry(0, 1).unwrap() = 1.0;
        *matrix.entry(0, 2).unwrap() = 2.0;
        let stats = matrix.compress().unwrap();
        assert_eq!(stats.maximum, 3);
        assert_eq!(stats.overflow_total, 2);
        let view = matrix.as_csr().unwrap();
        assert_eq!(view.row_ptr, &[0, 3, 3]);
        assert_eq!(view.col_idx, &[1, 2, 3]);
        assert_eq!(view.values, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_overflow_failure_keeps_buffer() {
        let mut matrix = BcrsMatrix::<f64>::implicit(2, 2, 1, 0.0).unwrap();
        for j in 0..2 {
            *matrix.entry(0, j).unwrap() = 1.0;
        }
        *matrix.entry(1, 1).unwrap() = 1.0;
        assert_eq!(
            matrix.compress(),
            Err(BcrsError::OverflowExhausted {
                required: 3,
                capacity: 2
            })
        );
        assert_eq!(matrix.build_stage(), BuildStage::ImplicitBuilding);
        assert_eq!(*matrix.entry(0, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_huge_parameters_reserve_bounded_buffer() {
        let mut matrix = BcrsMatrix::<f64>::implicit(10, 10, 3, 1e18).unwrap();
        assert_eq!(matrix.implicit_capacity(), Some(usize::MAX));
        for i in 0..10 {
            for j in 0..10 {
                *matrix.entry(i, j).unwrap() = 1.0;
            }
        }
        let stats = matrix.compress().unwrap();
        assert_eq!(stats.maximum, 10);
        assert_eq!(stats.overflow_total, 70);

        let params = ImplicitBuildParams::new(usize::MAX, 0.5).unwrap();
        let buffer = ImplicitBuffer::<f64>::new(4, 4, params).unwrap();
        assert!(buffer.rows.iter().all(|row| row.capacity() <= 4));
        assert!(buffer.overflow.capacity() <= 64);
    }

    #[test]
    fn test_builder_rejects_unsized_matrix() {
        let mut matrix = BcrsMatrix::<f64>::new();
        assert!(ImplicitMatrixBuilder::new(&mut matrix).is_err());
        let mut builder = ImplicitMatrixBuilder::with_size(&mut matrix, 3, 3, 2, 0.0).unwrap();
        *builder.row(2).unwrap().entry(1).unwrap() = 5.0;
        assert!(builder.row(3).is_err());
        matrix.compress().unwrap();
        assert_eq!(*matrix.get(2, 1).unwrap(), 5.0);
    }
}
