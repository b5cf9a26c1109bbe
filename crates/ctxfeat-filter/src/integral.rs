//! Integral images and volumes (summed area / summed volume tables)
//!
//! An integral table has the same shape as its source field. Element
//! (x, y, [z], c) holds the sum of every source value of class `c` in the
//! axis-aligned box from the origin to (x, y, [z]) inclusive, so the sum
//! over any closed box is recovered from 4 (2D) or 8 (3D) lookups,
//! independent of the box size.
//!
//! A second table over the squared field supplies `E[X^2]` for variance.

use crate::{FilterError, FilterResult};
use ctxfeat_core::{ClassMap, ClassVolume, Scalar};
use std::fmt::Debug;

/// Constant-time window sums over a field of some dimensionality.
///
/// Implemented by [`IntegralImage`] (2D) and [`IntegralVolume`] (3D).
pub trait IntegralTable<T: Scalar> {
    /// Spatial coordinate of one cell
    type Coord: Copy + Debug;

    /// Number of spatial axes (2 or 3)
    const NDIM: u32;

    /// Number of classes (channels) in the table
    fn num_classes(&self) -> u32;

    /// Smallest spatial extent; a window of side `2r + 1` larger than this
    /// fits nowhere in the grid
    fn min_extent(&self) -> u32;

    /// Whether the window of half-width `r` centered on `center` lies
    /// entirely inside the grid
    fn window_fits(&self, center: Self::Coord, r: u32) -> bool;

    /// Sum over the window of half-width `r` centered on `center`.
    ///
    /// # Panics
    ///
    /// May panic or return garbage unless `window_fits(center, r)` holds.
    fn window_sum_unchecked(&self, center: Self::Coord, r: u32, c: u32) -> T;
}

/// `lo <= v - r` and `v + r < n`, without overflow
#[inline]
fn axis_fits(v: u32, r: u32, n: u32) -> bool {
    v >= r && (v as u64) + (r as u64) < n as u64
}

// ============================================================================
// 2D
// ============================================================================

/// Integral image over a [`ClassMap`]
#[derive(Debug, Clone)]
pub struct IntegralImage<T> {
    table: ClassMap<T>,
}

impl<T: Scalar> IntegralImage<T> {
    /// Build the integral image of `field`.
    ///
    /// The recursion is: `a(x,y) = v(x,y) + a(x-1,y) + a(x,y-1) - a(x-1,y-1)`,
    /// applied independently per class.
    pub fn build(field: &ClassMap<T>) -> Self {
        Self::accumulate(field.clone())
    }

    /// Build the integral image of the elementwise square of `field`.
    pub fn build_squared(field: &ClassMap<T>) -> Self {
        let mut squared = field.clone();
        for v in squared.data_mut() {
            *v = *v * *v;
        }
        Self::accumulate(squared)
    }

    /// Turn a field into its own integral image, in place.
    fn accumulate(mut acc: ClassMap<T>) -> Self {
        let [nx, ny, nc] = acc.shape();

        for c in 0..nc {
            // First row: cumulative sum along y
            for y in 1..ny {
                let val = acc.get_unchecked(0, y, c) + acc.get_unchecked(0, y - 1, c);
                acc.set_unchecked(0, y, c, val);
            }

            // First column: cumulative sum along x
            for x in 1..nx {
                let val = acc.get_unchecked(x, 0, c) + acc.get_unchecked(x - 1, 0, c);
                acc.set_unchecked(x, 0, c, val);
            }

            // Interior
            for x in 1..nx {
                for y in 1..ny {
                    let val = acc.get_unchecked(x, y, c)
                        + acc.get_unchecked(x - 1, y, c)
                        + acc.get_unchecked(x, y - 1, c)
                        - acc.get_unchecked(x - 1, y - 1, c);
                    acc.set_unchecked(x, y, c, val);
                }
            }
        }

        IntegralImage { table: acc }
    }

    /// Access the underlying table
    pub fn table(&self) -> &ClassMap<T> {
        &self.table
    }

    /// Sum over the closed rectangle `[lo, hi]` for class `c`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameters` if a corner is out of range,
    /// `lo` exceeds `hi` along an axis, or `c` is not a valid class.
    pub fn rect_sum(&self, lo: [u32; 2], hi: [u32; 2], c: u32) -> FilterResult<T> {
        let [nx, ny, nc] = self.table.shape();
        if hi[0] >= nx || hi[1] >= ny || c >= nc {
            return Err(FilterError::InvalidParameters(format!(
                "rectangle corner {:?} or class {} outside table of shape {:?}",
                hi,
                c,
                self.table.shape()
            )));
        }
        if lo[0] > hi[0] || lo[1] > hi[1] {
            return Err(FilterError::InvalidParameters(format!(
                "low corner {:?} exceeds high corner {:?}",
                lo, hi
            )));
        }
        Ok(self.rect_sum_unchecked(lo, hi, c))
    }

    /// Sum over the closed rectangle `[lo, hi]` without validation.
    ///
    /// A corner term whose row or column would be index -1 contributes
    /// zero; the high corner is always looked up.
    #[inline]
    pub fn rect_sum_unchecked(&self, lo: [u32; 2], hi: [u32; 2], c: u32) -> T {
        let t = &self.table;
        let zero = T::zero();
        let [x0, y0] = lo;
        let [x1, y1] = hi;

        let ul = if x0 == 0 || y0 == 0 {
            zero
        } else {
            t.get_unchecked(x0 - 1, y0 - 1, c)
        };
        let ll = if y0 == 0 {
            zero
        } else {
            t.get_unchecked(x1, y0 - 1, c)
        };
        let ur = if x0 == 0 {
            zero
        } else {
            t.get_unchecked(x0 - 1, y1, c)
        };
        let lr = t.get_unchecked(x1, y1, c);

        lr - ll - ur + ul
    }
}

impl<T: Scalar> IntegralTable<T> for IntegralImage<T> {
    type Coord = [u32; 2];

    const NDIM: u32 = 2;

    fn num_classes(&self) -> u32 {
        self.table.num_classes()
    }

    fn min_extent(&self) -> u32 {
        self.table.nx().min(self.table.ny())
    }

    #[inline]
    fn window_fits(&self, [x, y]: [u32; 2], r: u32) -> bool {
        axis_fits(x, r, self.table.nx()) && axis_fits(y, r, self.table.ny())
    }

    #[inline]
    fn window_sum_unchecked(&self, [x, y]: [u32; 2], r: u32, c: u32) -> T {
        self.rect_sum_unchecked([x - r, y - r], [x + r, y + r], c)
    }
}

// ============================================================================
// 3D
// ============================================================================

/// Integral volume over a [`ClassVolume`]
#[derive(Debug, Clone)]
pub struct IntegralVolume<T> {
    table: ClassVolume<T>,
}

impl<T: Scalar> IntegralVolume<T> {
    /// Build the integral volume of `field`.
    pub fn build(field: &ClassVolume<T>) -> Self {
        Self::accumulate(field.clone())
    }

    /// Build the integral volume of the elementwise square of `field`.
    pub fn build_squared(field: &ClassVolume<T>) -> Self {
        let mut squared = field.clone();
        for v in squared.data_mut() {
            *v = *v * *v;
        }
        Self::accumulate(squared)
    }

    /// Turn a field into its own integral volume, in place.
    ///
    /// Running sums along z, then y, then x; after the three passes each
    /// element holds the sum over the box from the origin.
    fn accumulate(mut acc: ClassVolume<T>) -> Self {
        let [nx, ny, nz, nc] = acc.shape();

        for x in 0..nx {
            for y in 0..ny {
                for z in 1..nz {
                    for c in 0..nc {
                        let val = acc.get_unchecked(x, y, z, c) + acc.get_unchecked(x, y, z - 1, c);
                        acc.set_unchecked(x, y, z, c, val);
                    }
                }
            }
        }

        for x in 0..nx {
            for y in 1..ny {
                for z in 0..nz {
                    for c in 0..nc {
                        let val = acc.get_unchecked(x, y, z, c) + acc.get_unchecked(x, y - 1, z, c);
                        acc.set_unchecked(x, y, z, c, val);
                    }
                }
            }
        }

        for x in 1..nx {
            for y in 0..ny {
                for z in 0..nz {
                    for c in 0..nc {
                        let val = acc.get_unchecked(x, y, z, c) + acc.get_unchecked(x - 1, y, z, c);
                        acc.set_unchecked(x, y, z, c, val);
                    }
                }
            }
        }

        IntegralVolume { table: acc }
    }

    /// Access the underlying table
    pub fn table(&self) -> &ClassVolume<T> {
        &self.table
    }

    /// Sum over the closed box `[lo, hi]` for class `c`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameters` if a corner is out of range,
    /// `lo` exceeds `hi` along an axis, or `c` is not a valid class.
    pub fn rect_sum(&self, lo: [u32; 3], hi: [u32; 3], c: u32) -> FilterResult<T> {
        let [nx, ny, nz, nc] = self.table.shape();
        if hi[0] >= nx || hi[1] >= ny || hi[2] >= nz || c >= nc {
            return Err(FilterError::InvalidParameters(format!(
                "box corner {:?} or class {} outside table of shape {:?}",
                hi,
                c,
                self.table.shape()
            )));
        }
        if lo.iter().zip(&hi).any(|(l, h)| l > h) {
            return Err(FilterError::InvalidParameters(format!(
                "low corner {:?} exceeds high corner {:?}",
                lo, hi
            )));
        }
        Ok(self.rect_sum_unchecked(lo, hi, c))
    }

    /// Sum over the closed box `[lo, hi]` without validation.
    ///
    /// Eight-corner inclusion-exclusion. Each term is named after the axes
    /// on which it sits just below `lo`; a term that would index plane,
    /// row or column -1 contributes zero.
    #[inline]
    pub fn rect_sum_unchecked(&self, lo: [u32; 3], hi: [u32; 3], c: u32) -> T {
        let t = &self.table;
        let zero = T::zero();
        let [x0, y0, z0] = lo;
        let [x1, y1, z1] = hi;

        let lo_xyz = if x0 == 0 || y0 == 0 || z0 == 0 {
            zero
        } else {
            t.get_unchecked(x0 - 1, y0 - 1, z0 - 1, c)
        };
        let lo_yz = if y0 == 0 || z0 == 0 {
            zero
        } else {
            t.get_unchecked(x1, y0 - 1, z0 - 1, c)
        };
        let lo_xz = if x0 == 0 || z0 == 0 {
            zero
        } else {
            t.get_unchecked(x0 - 1, y1, z0 - 1, c)
        };
        let lo_z = if z0 == 0 {
            zero
        } else {
            t.get_unchecked(x1, y1, z0 - 1, c)
        };
        let lo_xy = if x0 == 0 || y0 == 0 {
            zero
        } else {
            t.get_unchecked(x0 - 1, y0 - 1, z1, c)
        };
        let lo_y = if y0 == 0 {
            zero
        } else {
            t.get_unchecked(x1, y0 - 1, z1, c)
        };
        let lo_x = if x0 == 0 {
            zero
        } else {
            t.get_unchecked(x0 - 1, y1, z1, c)
        };
        let hi = t.get_unchecked(x1, y1, z1, c);

        lo_xz + lo_yz + hi + lo_xy - lo_z - lo_xyz - lo_x - lo_y
    }
}

impl<T: Scalar> IntegralTable<T> for IntegralVolume<T> {
    type Coord = [u32; 3];

    const NDIM: u32 = 3;

    fn num_classes(&self) -> u32 {
        self.table.num_classes()
    }

    fn min_extent(&self) -> u32 {
        self.table.nx().min(self.table.ny()).min(self.table.nz())
    }

    #[inline]
    fn window_fits(&self, [x, y, z]: [u32; 3], r: u32) -> bool {
        axis_fits(x, r, self.table.nx())
            && axis_fits(y, r, self.table.ny())
            && axis_fits(z, r, self.table.nz())
    }

    #[inline]
    fn window_sum_unchecked(&self, [x, y, z]: [u32; 3], r: u32, c: u32) -> T {
        self.rect_sum_unchecked([x - r, y - r, z - r], [x + r, y + r, z + r], c)
    }
}
