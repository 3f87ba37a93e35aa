#![no_std]

//! BCRS Core - Block Compressed Row Storage Definitions
//!
//! This crate provides the core definitions and traits shared by block sparse
//! matrices and nested block containers: build modes and statistics, the
//! scalar `Field` trait, the container traits used by the traversal engines,
//! multi-indices and pure validation helpers.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
pub mod impls;
pub mod multi_index;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use multi_index::{IndexPath, MultiIndex};
pub use traits::*;
pub use validation::{check_dimensions, check_index, implicit_capacity};
