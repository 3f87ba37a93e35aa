//! Scalar type constraints for BCRS containers
//!
//! This module defines the trait that constrains what types can sit at the
//! leaves of nested block containers.

use crate::format::DataType;
use core::fmt::Debug;
use core::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// Trait for types that can be stored as scalar leaves
///
/// All leaf types must be:
/// - Copy: blocks are filled and duplicated without allocation
/// - Default: the default value is the additive zero
/// - closed under the ring operations used by assembly and scalar products
pub trait Field:
    Copy
    + Clone
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + Send
    + Sync
    + 'static
{
    /// Additive identity
    const ZERO: Self;

    /// Multiplicative identity
    const ONE: Self;

    /// Get the DataType representation for this scalar type
    fn data_type() -> DataType;

    /// Convert to f64 for norms and diagnostics
    fn to_f64(self) -> f64;

    /// Absolute value as f64
    fn abs_f64(self) -> f64 {
        let value = self.to_f64();
        if value < 0.0 {
            -value
        } else {
            value
        }
    }
}

impl Field for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn data_type() -> DataType {
        DataType::F32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Field for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn data_type() -> DataType {
        DataType::F64
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Field for i32 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn data_type() -> DataType {
        DataType::I32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Field for i64 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn data_type() -> DataType {
        DataType::I64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}
