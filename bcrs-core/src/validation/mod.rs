//! Validation utilities for BCRS containers
//!
//! This module contains pure validation functions with no allocation.
//! All functions are arithmetic checks on indices, sizes and parameters.

pub mod bounds;
pub mod format;

pub use bounds::{check_dimensions, check_index};
pub use format::{implicit_capacity, validate_implicit_params};
