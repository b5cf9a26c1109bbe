//! Ring statistics over nested windows
//!
//! For radii `r0 < r1 < ... < r(k-1)` and one cell, computes one average
//! per radius:
//!
//! - index 0: the mean over the full window of side `2*r0 + 1`
//! - index i > 0: the window sum of radius `ri`, minus
//!   `average[i-1] * count[i-1]`, divided by `count[i] - count[i-1]`
//!
//! For i = 1 this is exactly the mean over the ring between the two
//! windows. For i > 1 the subtracted term scales the previous *ring* mean
//! to the full inner window, so the value is a ring statistic only
//! approximately.
//!
//! A window that doesn't fit inside the grid yields the uniform prior
//! `1 / nclasses`. All windows of a cell share its center, so once a radius
//! falls back every larger radius falls back as well.

use crate::integral::IntegralTable;
use crate::radii::Radii;
use crate::{FilterError, FilterResult};
use ctxfeat_core::Scalar;
use num_traits::NumCast;

/// Precomputed per-radius constants for ring averaging.
///
/// Built once per feature-map call. Window counts and the fallback are
/// converted to `T` here, once.
#[derive(Debug, Clone)]
pub struct RingKernel<T> {
    radii: Vec<u32>,
    /// `(2r + 1)^ndim` for each radius
    counts: Vec<T>,
    /// `1 / nclasses`
    fallback: T,
    num_classes: u32,
}

fn to_scalar<T: Scalar>(n: u64, what: &str) -> FilterResult<T> {
    <T as NumCast>::from(n).ok_or_else(|| {
        FilterError::InvalidParameters(format!("{} {} is not representable", what, n))
    })
}

impl<T: Scalar> RingKernel<T> {
    /// Create a kernel for `ndim` spatial axes and `num_classes` classes.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameters` if `num_classes` is 0 or
    /// `ndim` is not 2 or 3, and `FilterError::InvalidRadii` if a window
    /// count overflows.
    pub fn new(radii: &Radii, ndim: u32, num_classes: u32) -> FilterResult<Self> {
        if num_classes == 0 {
            return Err(FilterError::InvalidParameters(
                "at least one class is required".into(),
            ));
        }
        if !(2..=3).contains(&ndim) {
            return Err(FilterError::InvalidParameters(format!(
                "ndim must be 2 or 3, got {}",
                ndim
            )));
        }

        let counts = radii
            .window_counts(ndim)?
            .into_iter()
            .map(|n| to_scalar(n, "window cell count"))
            .collect::<FilterResult<Vec<T>>>()?;
        let fallback = T::one() / to_scalar::<T>(num_classes as u64, "class count")?;

        Ok(RingKernel {
            radii: radii.as_slice().to_vec(),
            counts,
            fallback,
            num_classes,
        })
    }

    /// Create a kernel matching the dimensionality and class count of `table`.
    pub fn for_table<I: IntegralTable<T>>(radii: &Radii, table: &I) -> FilterResult<Self> {
        Self::new(radii, I::NDIM, table.num_classes())
    }

    /// Number of radii (k)
    #[inline]
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// Whether the kernel has no radii; never true for a validated list
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Value reported for windows crossing the grid boundary
    #[inline]
    pub fn fallback(&self) -> T {
        self.fallback
    }

    /// Compute the k ring averages of class `c` around `center` into `out`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameters` if `out.len()` differs from
    /// the number of radii, or if `c` is not a class of the kernel or of
    /// `table`.
    pub fn ring_averages<I>(
        &self,
        table: &I,
        center: I::Coord,
        c: u32,
        out: &mut [T],
    ) -> FilterResult<()>
    where
        I: IntegralTable<T>,
    {
        if c >= self.num_classes || c >= table.num_classes() {
            return Err(FilterError::InvalidParameters(format!(
                "class {} out of range for {} classes",
                c,
                self.num_classes.min(table.num_classes())
            )));
        }
        if out.len() != self.radii.len() {
            return Err(FilterError::InvalidParameters(format!(
                "output holds {} values but {} radii were given",
                out.len(),
                self.radii.len()
            )));
        }

        for (i, &r) in self.radii.iter().enumerate() {
            if !table.window_fits(center, r) {
                out[i] = self.fallback;
                continue;
            }

            let mut sum = table.window_sum_unchecked(center, r, c);
            let mut n = self.counts[i];
            if i > 0 {
                let n_prev = self.counts[i - 1];
                sum = sum - out[i - 1] * n_prev;
                n = n - n_prev;
            }
            out[i] = sum / n;
        }

        Ok(())
    }
}

/// Compute the ring averages of class `c` around `center`.
///
/// One-shot form of [`RingKernel::ring_averages`]; builds the kernel for
/// `table` and returns a freshly allocated vector of `radii.len()` values.
///
/// # Errors
///
/// Returns `FilterError::InvalidParameters` if `c` is not a class of
/// `table`.
///
/// # Examples
///
/// ```
/// use ctxfeat_core::ClassMap;
/// use ctxfeat_filter::{IntegralImage, Radii, ring_averages};
///
/// let field = ClassMap::new_with_value(5, 5, 2, 0.5f64).unwrap();
/// let table = IntegralImage::build(&field);
/// let radii = Radii::new(&[0, 1]).unwrap();
///
/// assert_eq!(ring_averages(&table, [2, 2], 0, &radii).unwrap(), vec![0.5, 0.5]);
/// // Radius 1 crosses the border at x = 0: uniform prior 1/2
/// assert_eq!(ring_averages(&table, [0, 2], 0, &radii).unwrap(), vec![0.5, 0.5]);
/// ```
pub fn ring_averages<T, I>(table: &I, center: I::Coord, c: u32, radii: &Radii) -> FilterResult<Vec<T>>
where
    T: Scalar,
    I: IntegralTable<T>,
{
    let kernel = RingKernel::for_table(radii, table)?;
    let mut out = vec![T::zero(); radii.len()];
    kernel.ring_averages(table, center, c, &mut out)?;
    Ok(out)
}
