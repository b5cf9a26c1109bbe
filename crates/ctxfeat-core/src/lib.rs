//! ctxfeat core - Containers for class-probability fields
//!
//! This crate provides the data structures consumed and produced by the
//! context feature extractors:
//!
//! - [`ClassMap`] - 2D field with a class axis, shape (X, Y, C)
//! - [`ClassVolume`] - 3D field with a class axis, shape (X, Y, Z, C)
//! - [`Scalar`] - the floating-point bound shared by every algorithm
//!
//! Both containers store their values row-major with the class axis
//! varying fastest, so the class vector of one cell is a contiguous slice.

pub mod error;
pub mod field;
pub mod scalar;

pub use error::{Error, Result};
pub use field::{ClassMap, ClassVolume};
pub use scalar::Scalar;
