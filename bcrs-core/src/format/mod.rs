//! Storage format definitions for block compressed row storage
//!
//! This module contains pure data definitions describing how a BCRS matrix is
//! built and stored. No allocation or matrix logic lives here.

pub mod constants;
pub mod mode;
pub mod params;
pub mod stats;

// Re-export format definitions
pub use constants::{DEFAULT_AVG_ENTRIES_PER_ROW, DEFAULT_OVERFLOW_FRACTION, MAX_DEPTH};
pub use mode::{BuildMode, BuildStage, DataType, MatrixFormat};
pub use params::ImplicitBuildParams;
pub use stats::CompressionStatistics;
