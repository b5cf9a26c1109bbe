//! Brute-force window sums
//!
//! Direct O(window) summation over closed boxes, used as the ground truth
//! for integral-table lookups and ring statistics.

use ctxfeat_core::{ClassMap, ClassVolume, Scalar};

/// Sum of `field(x, y, c)` over the closed box `[lo, hi]`.
pub fn box_sum_2d<T: Scalar>(field: &ClassMap<T>, lo: [u32; 2], hi: [u32; 2], c: u32) -> T {
    let mut sum = T::zero();
    for x in lo[0]..=hi[0] {
        for y in lo[1]..=hi[1] {
            sum = sum + field.get_unchecked(x, y, c);
        }
    }
    sum
}

/// Sum of `field(x, y, z, c)` over the closed box `[lo, hi]`.
pub fn box_sum_3d<T: Scalar>(field: &ClassVolume<T>, lo: [u32; 3], hi: [u32; 3], c: u32) -> T {
    let mut sum = T::zero();
    for x in lo[0]..=hi[0] {
        for y in lo[1]..=hi[1] {
            for z in lo[2]..=hi[2] {
                sum = sum + field.get_unchecked(x, y, z, c);
            }
        }
    }
    sum
}

/// Mean over the window of half-width `r` centered on (x, y).
///
/// The caller guarantees the window lies inside the map.
pub fn box_mean_2d(field: &ClassMap<f64>, x: u32, y: u32, r: u32, c: u32) -> f64 {
    let side = (2 * r + 1) as f64;
    box_sum_2d(field, [x - r, y - r], [x + r, y + r], c) / (side * side)
}

/// Mean over the cube of half-width `r` centered on (x, y, z).
///
/// The caller guarantees the cube lies inside the volume.
pub fn box_mean_3d(field: &ClassVolume<f64>, x: u32, y: u32, z: u32, r: u32, c: u32) -> f64 {
    let side = (2 * r + 1) as f64;
    box_sum_3d(field, [x - r, y - r, z - r], [x + r, y + r, z + r], c) / (side * side * side)
}
