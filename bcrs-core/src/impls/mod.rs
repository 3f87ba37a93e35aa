//! Container trait implementations for scalars and standard containers
//!
//! Scalars are leaves, fixed-size arrays and slices are dynamic blocks whose
//! children share one type.

mod array;
mod scalar;
#[cfg(feature = "alloc")]
mod vec;
