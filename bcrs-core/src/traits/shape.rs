//! Block counts of containers

/// Number of blocks along each axis
///
/// For vectors `num_cols` is 1. Counts are in blocks, not scalars; see
/// [`FlatVector`](super::FlatVector) and [`FlatMatrix`](super::FlatMatrix)
/// for scalar dimensions.
pub trait BlockShape {
    /// Number of block rows
    fn num_rows(&self) -> usize;

    /// Number of block columns
    fn num_cols(&self) -> usize {
        1
    }
}
