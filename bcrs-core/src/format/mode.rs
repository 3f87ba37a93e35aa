//! Build modes, build stages and compressed layout descriptors
//!
//! This module contains the enums describing the BCRS construction protocol
//! and the scalar layouts handed to external solvers.

/// How the sparsity pattern of a BCRS matrix is established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BuildMode {
    /// No mode chosen yet
    #[default]
    Unspecified = 0,
    /// Pattern exported from an index set
    Fixed = 1,
    /// Row sizes, then column indices, are declared explicitly
    Random = 2,
    /// Unordered `entry(i, j)` insertion followed by `compress()`
    Implicit = 3,
}

impl BuildMode {
    /// Convert from u8 representation
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(BuildMode::Unspecified),
            1 => Some(BuildMode::Fixed),
            2 => Some(BuildMode::Random),
            3 => Some(BuildMode::Implicit),
            _ => None,
        }
    }

    /// Convert to u8 representation
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether values are written into a pattern fixed before the first write
    pub const fn has_predetermined_pattern(self) -> bool {
        matches!(self, BuildMode::Fixed | BuildMode::Random)
    }
}

impl core::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuildMode::Unspecified => write!(f, "unspecified"),
            BuildMode::Fixed => write!(f, "fixed"),
            BuildMode::Random => write!(f, "random"),
            BuildMode::Implicit => write!(f, "implicit"),
        }
    }
}

/// Position of a matrix inside its construction protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildStage {
    /// No size has been set
    #[default]
    Uninitialized,
    /// Sized, waiting for a pattern (fixed or unspecified mode)
    Allocated,
    /// Random mode: collecting row sizes
    RowSizes,
    /// Random mode: collecting column indices
    Indices,
    /// Implicit mode: entries are buffered until `compress()`
    ImplicitBuilding,
    /// Pattern is final and stored in compressed arrays
    Built,
}

impl BuildStage {
    /// Whether the compressed arrays are valid
    pub const fn is_built(self) -> bool {
        matches!(self, BuildStage::Built)
    }

    /// Whether a build is in progress and the matrix holds partial state
    pub const fn is_building(self) -> bool {
        matches!(
            self,
            BuildStage::RowSizes | BuildStage::Indices | BuildStage::ImplicitBuilding
        )
    }
}

impl core::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            BuildStage::Uninitialized => "uninitialized",
            BuildStage::Allocated => "allocated",
            BuildStage::RowSizes => "row sizes",
            BuildStage::Indices => "indices",
            BuildStage::ImplicitBuilding => "implicit building",
            BuildStage::Built => "built",
        };
        write!(f, "{name}")
    }
}

/// Scalar compressed layouts produced for external solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MatrixFormat {
    /// Compressed Sparse Row (CSR) format
    Csr = 1,
    /// Compressed Sparse Column (CSC) format
    Csc = 2,
}

impl core::fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixFormat::Csr => write!(f, "CSR"),
            MatrixFormat::Csc => write!(f, "CSC"),
        }
    }
}

/// Scalar types a block container can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DataType {
    /// 32-bit floating point
    F32 = 0,
    /// 64-bit floating point
    F64 = 1,
    /// 32-bit signed integer
    I32 = 2,
    /// 64-bit signed integer
    I64 = 3,
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataType::F32 => write!(f, "f32"),
            DataType::F64 => write!(f, "f64"),
            DataType::I32 => write!(f, "i32"),
            DataType::I64 => write!(f, "i64"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mode_round_trip_u8() {
        for mode in [
            BuildMode::Unspecified,
            BuildMode::Fixed,
            BuildMode::Random,
            BuildMode::Implicit,
        ] {
            assert_eq!(BuildMode::from_u8(mode.to_u8()), Some(mode));
        }
        assert_eq!(BuildMode::from_u8(9), None);
    }

    #[test]
    fn test_stage_predicates() {
        assert!(BuildStage::Built.is_built());
        assert!(!BuildStage::ImplicitBuilding.is_built());
        assert!(BuildStage::ImplicitBuilding.is_building());
        assert!(BuildStage::RowSizes.is_building());
        assert!(!BuildStage::Allocated.is_building());
        assert!(!BuildStage::Uninitialized.is_building());
    }

    #[test]
    fn test_predetermined_pattern_modes() {
        assert!(BuildMode::Fixed.has_predetermined_pattern());
        assert!(BuildMode::Random.has_predetermined_pattern());
        assert!(!BuildMode::Implicit.has_predetermined_pattern());
    }
}
