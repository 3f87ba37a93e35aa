//! Statistics reported by `compress()`

/// Diagnostics of an implicit build, returned by compression
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressionStatistics {
    /// Average number of entries per row actually stored
    pub avg: f64,
    /// Largest number of entries observed in a single row
    pub maximum: usize,
    /// Number of entries that did not fit into their row's primary slots
    pub overflow_total: usize,
    /// Stored entries divided by allocated capacity
    pub mem_ratio: f64,
}

impl CompressionStatistics {
    /// Derive statistics from per-row counts
    pub fn from_row_counts<I>(row_counts: I, overflow_total: usize, capacity: usize) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut rows = 0usize;
        let mut total = 0usize;
        let mut maximum = 0usize;
        for count in row_counts {
            rows += 1;
            total += count;
            maximum = maximum.max(count);
        }

        let avg = if rows == 0 {
            0.0
        } else {
            total as f64 / rows as f64
        };
        let mem_ratio = if capacity == 0 {
            0.0
        } else {
            total as f64 / capacity as f64
        };

        Self {
            avg,
            maximum,
            overflow_total,
            mem_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row_counts() {
        let stats = CompressionStatistics::from_row_counts([4, 3, 3, 4, 3, 3, 4, 4, 3, 2], 4, 33);
        assert!((stats.avg - 3.3).abs() < 1e-12);
        assert_eq!(stats.maximum, 4);
        assert_eq!(stats.overflow_total, 4);
        assert!((stats.mem_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix() {
        let stats = CompressionStatistics::from_row_counts(core::iter::empty(), 0, 0);
        assert_eq!(stats, CompressionStatistics::default());
    }
}
