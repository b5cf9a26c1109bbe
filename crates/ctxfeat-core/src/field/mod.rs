//! Class-probability fields
//!
//! A field holds one value per (spatial cell, class). [`ClassMap`] covers
//! 2D grids with shape (X, Y, C) and [`ClassVolume`] covers 3D grids with
//! shape (X, Y, Z, C).
//!
//! # Memory Layout
//!
//! Data is stored row-major over the spatial axes with the class axis
//! varying fastest and no padding. For a map the value at (x, y, c) is at
//! index `(x * ny + y) * nc + c`; for a volume the value at (x, y, z, c) is
//! at `((x * ny + y) * nz + z) * nc + c`.
//!
//! # Examples
//!
//! ```
//! use ctxfeat_core::ClassMap;
//!
//! // A 64x48 map of 3 classes, all set to a uniform prior
//! let mut map = ClassMap::new_with_value(64, 48, 3, 1.0f32 / 3.0).unwrap();
//!
//! map.set(10, 20, 1, 0.75).unwrap();
//! assert_eq!(map.get(10, 20, 1).unwrap(), 0.75);
//! assert_eq!(map.cell(10, 20).len(), 3);
//! ```

mod map;
mod volume;

pub use map::ClassMap;
pub use volume::ClassVolume;

use crate::error::{Error, Result};

/// Validate a shape and return its element count.
///
/// Every extent must be non-zero and the product must fit in `usize`.
pub(crate) fn element_count(shape: &[u32]) -> Result<usize> {
    if shape.iter().any(|&n| n == 0) {
        return Err(Error::InvalidShape(shape.to_vec()));
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n as usize))
        .ok_or_else(|| Error::InvalidShape(shape.to_vec()))
}

/// Check that a data buffer matches the element count of a shape.
pub(crate) fn check_data_len(shape: &[u32], len: usize) -> Result<usize> {
    let expected = element_count(shape)?;
    if len != expected {
        return Err(Error::InvalidParameter(format!(
            "data length {} doesn't match shape {:?} = {}",
            len, shape, expected
        )));
    }
    Ok(expected)
}
