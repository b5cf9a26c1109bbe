//! Multi-scale context feature maps
//!
//! Turns a per-class probability field into a feature field holding, for
//! every cell and class, the ring averages (and optionally ring variances)
//! over a list of nested windows.
//!
//! # Output layout
//!
//! With `k` radii and `C` classes:
//!
//! - mean only: `C * k` channels, the mean for class `c` and radius `i`
//!   at channel `c * k + i`
//! - mean and variance: `C * 2k` channels, the mean at `c * 2k + i` and
//!   the variance at `c * 2k + k + i`
//!
//! Variances are `E[X^2] - E[X]^2` over matching windows and are not
//! clamped, so near-constant neighbourhoods can yield tiny negative values.
//!
//! # Examples
//!
//! ```
//! use ctxfeat_core::ClassMap;
//! use ctxfeat_filter::{ContextOptions, ContextStatistics, Radii, context_map};
//!
//! let field = ClassMap::new_with_value(16, 16, 2, 0.5f64).unwrap();
//! let options = ContextOptions::new(Radii::new(&[1, 3]).unwrap())
//!     .with_statistics(ContextStatistics::MeanVariance);
//!
//! let features = context_map(&field, &options).unwrap();
//! assert_eq!(features.shape(), [16, 16, 8]);
//! ```

use crate::integral::{IntegralImage, IntegralTable, IntegralVolume};
use crate::observer::{CellObserver, CellRecord, NoopObserver};
use crate::radii::Radii;
use crate::ring::RingKernel;
use crate::{FilterError, FilterResult};
use ctxfeat_core::{ClassMap, ClassVolume, Scalar};
use tracing::{debug, warn};

// ============================================================================
// Options
// ============================================================================

/// Statistics stored per (class, radius)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextStatistics {
    /// Ring means only
    Mean,
    /// Ring means followed by ring variances
    #[default]
    MeanVariance,
}

impl ContextStatistics {
    /// Number of output values per (class, radius)
    pub fn per_radius(self) -> u32 {
        match self {
            ContextStatistics::Mean => 1,
            ContextStatistics::MeanVariance => 2,
        }
    }

    /// Number of output channels for `num_classes` classes and `num_radii`
    /// radii.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameters` if the count overflows `u32`.
    pub fn channels(self, num_classes: u32, num_radii: usize) -> FilterResult<u32> {
        u32::try_from(num_radii)
            .ok()
            .and_then(|k| k.checked_mul(self.per_radius()))
            .and_then(|n| n.checked_mul(num_classes))
            .ok_or_else(|| {
                FilterError::InvalidParameters(format!(
                    "{} classes x {} radii overflow the channel count",
                    num_classes, num_radii
                ))
            })
    }
}

/// Options for [`context_map`] and [`context_volume`]
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Window half-widths, strictly ascending
    pub radii: Radii,
    /// Statistics to compute
    pub statistics: ContextStatistics,
}

impl ContextOptions {
    /// Options for `radii` with the default statistics (mean and variance)
    pub fn new(radii: Radii) -> Self {
        Self {
            radii,
            statistics: ContextStatistics::default(),
        }
    }

    /// Replace the statistics to compute
    pub fn with_statistics(mut self, statistics: ContextStatistics) -> Self {
        self.statistics = statistics;
        self
    }
}

/// Output shape `(nx, ny, channels)` for a 2D feature map of `field`.
///
/// # Errors
///
/// Returns `FilterError::InvalidParameters` if the channel count overflows.
pub fn expected_map_shape<T: Scalar>(
    field: &ClassMap<T>,
    statistics: ContextStatistics,
    num_radii: usize,
) -> FilterResult<[u32; 3]> {
    let channels = statistics.channels(field.num_classes(), num_radii)?;
    Ok([field.nx(), field.ny(), channels])
}

/// Output shape `(nx, ny, nz, channels)` for a 3D feature volume of `field`.
pub fn expected_volume_shape<T: Scalar>(
    field: &ClassVolume<T>,
    statistics: ContextStatistics,
    num_radii: usize,
) -> FilterResult<[u32; 4]> {
    let channels = statistics.channels(field.num_classes(), num_radii)?;
    Ok([field.nx(), field.ny(), field.nz(), channels])
}

// ============================================================================
// Grid abstraction over maps and volumes
// ============================================================================

/// A field the builders can iterate over and write into.
trait Grid<T: Scalar> {
    type Coord: Copy + AsRef<[u32]>;
    type Table: IntegralTable<T, Coord = Self::Coord>;

    fn full_shape(&self) -> Vec<u32>;
    fn classes(&self) -> u32;
    /// Spatial cells in row-major order
    fn cells(&self) -> impl Iterator<Item = Self::Coord>;
    fn features_mut(&mut self, cell: Self::Coord) -> &mut [T];
    fn integral(&self) -> Self::Table;
    fn integral_squared(&self) -> Self::Table;
}

impl<T: Scalar> Grid<T> for ClassMap<T> {
    type Coord = [u32; 2];
    type Table = IntegralImage<T>;

    fn full_shape(&self) -> Vec<u32> {
        self.shape().to_vec()
    }

    fn classes(&self) -> u32 {
        self.num_classes()
    }

    fn cells(&self) -> impl Iterator<Item = [u32; 2]> {
        let ny = self.ny();
        (0..self.nx()).flat_map(move |x| (0..ny).map(move |y| [x, y]))
    }

    fn features_mut(&mut self, [x, y]: [u32; 2]) -> &mut [T] {
        self.cell_mut(x, y)
    }

    fn integral(&self) -> IntegralImage<T> {
        IntegralImage::build(self)
    }

    fn integral_squared(&self) -> IntegralImage<T> {
        IntegralImage::build_squared(self)
    }
}

impl<T: Scalar> Grid<T> for ClassVolume<T> {
    type Coord = [u32; 3];
    type Table = IntegralVolume<T>;

    fn full_shape(&self) -> Vec<u32> {
        self.shape().to_vec()
    }

    fn classes(&self) -> u32 {
        self.num_classes()
    }

    fn cells(&self) -> impl Iterator<Item = [u32; 3]> {
        let (ny, nz) = (self.ny(), self.nz());
        (0..self.nx()).flat_map(move |x| {
            (0..ny).flat_map(move |y| (0..nz).map(move |z| [x, y, z]))
        })
    }

    fn features_mut(&mut self, [x, y, z]: [u32; 3]) -> &mut [T] {
        self.cell_mut(x, y, z)
    }

    fn integral(&self) -> IntegralVolume<T> {
        IntegralVolume::build(self)
    }

    fn integral_squared(&self) -> IntegralVolume<T> {
        IntegralVolume::build_squared(self)
    }
}

/// Check that `out` has the spatial shape of `field` and `channels`
/// channels.
fn check_output<T: Scalar, G: Grid<T>>(field: &G, out: &G, channels: u32) -> FilterResult<()> {
    let mut expected = field.full_shape();
    if let Some(last) = expected.last_mut() {
        *last = channels;
    }
    let actual = out.full_shape();
    if expected != actual {
        return Err(FilterError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// Warn about radii whose window is larger than the grid.
fn warn_unfit_radii<T: Scalar, I: IntegralTable<T>>(radii: &Radii, table: &I) {
    let extent = table.min_extent() as u64;
    for r in radii.iter().filter(|&r| 2 * r as u64 + 1 > extent) {
        warn!(
            radius = r,
            extent, "window never fits inside the grid; every cell gets the uniform prior"
        );
    }
}

// ============================================================================
// Generic drivers
// ============================================================================

fn mean_features<T, G, O>(radii: &Radii, field: &G, out: &mut G, observer: &mut O) -> FilterResult<()>
where
    T: Scalar,
    G: Grid<T>,
    O: CellObserver<T>,
{
    let nc = field.classes();
    let k = radii.len();
    check_output(field, out, ContextStatistics::Mean.channels(nc, k)?)?;

    debug!(
        shape = ?field.full_shape(),
        radii = ?radii.as_slice(),
        "computing context means"
    );

    let integral = field.integral();
    let kernel = RingKernel::for_table(radii, &integral)?;
    warn_unfit_radii(radii, &integral);

    let mut means = vec![T::zero(); k];
    for c in 0..nc {
        let base = c as usize * k;
        for cell in field.cells() {
            kernel.ring_averages(&integral, cell, c, &mut means)?;
            out.features_mut(cell)[base..base + k].copy_from_slice(&means);
            observer.observe(&CellRecord {
                cell: cell.as_ref(),
                class: c,
                means: &means,
                variances: None,
            });
        }
    }

    Ok(())
}

fn mean_variance_features<T, G, O>(
    radii: &Radii,
    field: &G,
    out: &mut G,
    observer: &mut O,
) -> FilterResult<()>
where
    T: Scalar,
    G: Grid<T>,
    O: CellObserver<T>,
{
    let nc = field.classes();
    let k = radii.len();
    check_output(field, out, ContextStatistics::MeanVariance.channels(nc, k)?)?;

    debug!(
        shape = ?field.full_shape(),
        radii = ?radii.as_slice(),
        "computing context means and variances"
    );

    let integral = field.integral();
    let integral2 = field.integral_squared();
    let kernel = RingKernel::for_table(radii, &integral)?;
    warn_unfit_radii(radii, &integral);

    let mut means = vec![T::zero(); k];
    let mut means2 = vec![T::zero(); k];
    let mut variances = vec![T::zero(); k];
    for c in 0..nc {
        let base = c as usize * 2 * k;
        for cell in field.cells() {
            // Both tables see the same cell, class and radii
            kernel.ring_averages(&integral, cell, c, &mut means)?;
            kernel.ring_averages(&integral2, cell, c, &mut means2)?;
            for i in 0..k {
                variances[i] = means2[i] - means[i] * means[i];
            }

            let features = out.features_mut(cell);
            features[base..base + k].copy_from_slice(&means);
            features[base + k..base + 2 * k].copy_from_slice(&variances);

            observer.observe(&CellRecord {
                cell: cell.as_ref(),
                class: c,
                means: &means,
                variances: Some(&variances),
            });
        }
    }

    Ok(())
}

// ============================================================================
// Public API: 2D
// ============================================================================

/// Ring means of a 2D field.
///
/// Writes, for every cell (x, y) and class c, the k ring averages to
/// channels `c*k .. c*k + k` of `out`.
///
/// # Errors
///
/// Returns `FilterError::ShapeMismatch` if `out` is not
/// `(nx, ny, nclasses * k)`. Nothing is written in that case.
pub fn context_mean_2d<T: Scalar>(
    radii: &Radii,
    field: &ClassMap<T>,
    out: &mut ClassMap<T>,
) -> FilterResult<()> {
    mean_features(radii, field, out, &mut NoopObserver)
}

/// [`context_mean_2d`] reporting every (cell, class) result to `observer`.
pub fn context_mean_2d_observed<T, O>(
    radii: &Radii,
    field: &ClassMap<T>,
    out: &mut ClassMap<T>,
    observer: &mut O,
) -> FilterResult<()>
where
    T: Scalar,
    O: CellObserver<T>,
{
    mean_features(radii, field, out, observer)
}

/// Ring means and variances of a 2D field.
///
/// For every cell (x, y) and class c, the k ring means go to channels
/// `c*2k .. c*2k + k` and the k ring variances to `c*2k + k .. c*2k + 2k`.
///
/// # Errors
///
/// Returns `FilterError::ShapeMismatch` if `out` is not
/// `(nx, ny, nclasses * 2k)`.
pub fn context_mean_variance_2d<T: Scalar>(
    radii: &Radii,
    field: &ClassMap<T>,
    out: &mut ClassMap<T>,
) -> FilterResult<()> {
    mean_variance_features(radii, field, out, &mut NoopObserver)
}

/// [`context_mean_variance_2d`] reporting every (cell, class) result to
/// `observer`.
pub fn context_mean_variance_2d_observed<T, O>(
    radii: &Radii,
    field: &ClassMap<T>,
    out: &mut ClassMap<T>,
    observer: &mut O,
) -> FilterResult<()>
where
    T: Scalar,
    O: CellObserver<T>,
{
    mean_variance_features(radii, field, out, observer)
}

// ============================================================================
// Public API: 3D
// ============================================================================

/// Ring means of a 3D field, channel `c*k + i`.
pub fn context_mean_3d<T: Scalar>(
    radii: &Radii,
    field: &ClassVolume<T>,
    out: &mut ClassVolume<T>,
) -> FilterResult<()> {
    mean_features(radii, field, out, &mut NoopObserver)
}

/// [`context_mean_3d`] reporting every (cell, class) result to `observer`.
pub fn context_mean_3d_observed<T, O>(
    radii: &Radii,
    field: &ClassVolume<T>,
    out: &mut ClassVolume<T>,
    observer: &mut O,
) -> FilterResult<()>
where
    T: Scalar,
    O: CellObserver<T>,
{
    mean_features(radii, field, out, observer)
}

/// Ring means and variances of a 3D field.
///
/// Same channel layout as [`context_mean_variance_2d`], over cubes instead
/// of squares.
///
/// # Errors
///
/// Returns `FilterError::ShapeMismatch` if `out` is not
/// `(nx, ny, nz, nclasses * 2k)`.
pub fn context_mean_variance_3d<T: Scalar>(
    radii: &Radii,
    field: &ClassVolume<T>,
    out: &mut ClassVolume<T>,
) -> FilterResult<()> {
    mean_variance_features(radii, field, out, &mut NoopObserver)
}

/// [`context_mean_variance_3d`] reporting every (cell, class) result to
/// `observer`.
pub fn context_mean_variance_3d_observed<T, O>(
    radii: &Radii,
    field: &ClassVolume<T>,
    out: &mut ClassVolume<T>,
    observer: &mut O,
) -> FilterResult<()>
where
    T: Scalar,
    O: CellObserver<T>,
{
    mean_variance_features(radii, field, out, observer)
}

// ============================================================================
// Public API: allocating
// ============================================================================

/// Compute a 2D context feature map, allocating the output.
pub fn context_map<T: Scalar>(
    field: &ClassMap<T>,
    options: &ContextOptions,
) -> FilterResult<ClassMap<T>> {
    let [nx, ny, channels] = expected_map_shape(field, options.statistics, options.radii.len())?;
    let mut out = ClassMap::new(nx, ny, channels)?;
    match options.statistics {
        ContextStatistics::Mean => context_mean_2d(&options.radii, field, &mut out)?,
        ContextStatistics::MeanVariance => {
            context_mean_variance_2d(&options.radii, field, &mut out)?
        }
    }
    Ok(out)
}

/// Compute a 3D context feature volume, allocating the output.
pub fn context_volume<T: Scalar>(
    field: &ClassVolume<T>,
    options: &ContextOptions,
) -> FilterResult<ClassVolume<T>> {
    let [nx, ny, nz, channels] =
        expected_volume_shape(field, options.statistics, options.radii.len())?;
    let mut out = ClassVolume::new(nx, ny, nz, channels)?;
    match options.statistics {
        ContextStatistics::Mean => context_mean_3d(&options.radii, field, &mut out)?,
        ContextStatistics::MeanVariance => {
            context_mean_variance_3d(&options.radii, field, &mut out)?
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radii(values: &[u32]) -> Radii {
        Radii::new(values).unwrap()
    }

    #[test]
    fn test_channels() {
        assert_eq!(ContextStatistics::Mean.channels(3, 4).unwrap(), 12);
        assert_eq!(ContextStatistics::MeanVariance.channels(3, 4).unwrap(), 24);
        assert!(ContextStatistics::MeanVariance.channels(u32::MAX, 2).is_err());
    }

    #[test]
    fn test_expected_shapes() {
        let map = ClassMap::<f64>::new(5, 7, 3).unwrap();
        assert_eq!(
            expected_map_shape(&map, ContextStatistics::Mean, 2).unwrap(),
            [5, 7, 6]
        );
        let vol = ClassVolume::<f32>::new(2, 3, 4, 2).unwrap();
        assert_eq!(
            expected_volume_shape(&vol, ContextStatistics::MeanVariance, 3).unwrap(),
            [2, 3, 4, 12]
        );
    }

    #[test]
    fn test_mean_2d_rejects_wrong_output_shape() {
        let field = ClassMap::new_with_value(6, 6, 2, 0.5f64).unwrap();
        let r = radii(&[1, 2]);

        // Wrong channel count (mean+variance sized)
        let mut out = ClassMap::new(6, 6, 8).unwrap();
        match context_mean_2d(&r, &field, &mut out) {
            Err(FilterError::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, vec![6, 6, 4]);
                assert_eq!(actual, vec![6, 6, 8]);
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
        // Nothing was written
        assert!(out.data().iter().all(|&v| v == 0.0));

        // Wrong spatial shape
        let mut out = ClassMap::new(6, 5, 4).unwrap();
        assert!(context_mean_2d(&r, &field, &mut out).is_err());
    }

    #[test]
    fn test_mean_variance_2d_rejects_wrong_output_shape() {
        let field = ClassMap::new_with_value(6, 6, 2, 0.5f64).unwrap();
        let mut out = ClassMap::new(6, 6, 4).unwrap();
        assert!(context_mean_variance_2d(&radii(&[1, 2]), &field, &mut out).is_err());
    }

    #[test]
    fn test_mean_2d_channel_layout() {
        // Class 0 is 0.25 everywhere, class 1 is 0.75 everywhere
        let field =
            ClassMap::from_fn(7, 7, 2, |_, _, c| if c == 0 { 0.25f64 } else { 0.75 }).unwrap();
        let r = radii(&[0, 1, 3]);
        let mut out = ClassMap::new(7, 7, 6).unwrap();
        context_mean_2d(&r, &field, &mut out).unwrap();

        let center = out.cell(3, 3);
        for i in 0..3 {
            assert!((center[i] - 0.25).abs() < 1e-12);
            assert!((center[3 + i] - 0.75).abs() < 1e-12);
        }

        // Radius 3 only fits at the center; elsewhere it is 1/2
        assert_eq!(out.get(2, 3, 2).unwrap(), 0.5);
        assert_eq!(out.get(2, 3, 5).unwrap(), 0.5);
    }

    #[test]
    fn test_mean_variance_2d_channel_layout() {
        let field = ClassMap::from_fn(5, 5, 2, |x, y, c| {
            if c == 0 { ((x + y) % 2) as f64 } else { 0.5 }
        })
        .unwrap();
        let r = radii(&[1]);
        let mut out = ClassMap::new(5, 5, 4).unwrap();
        context_mean_variance_2d(&r, &field, &mut out).unwrap();

        // Checkerboard around (2, 2): 4 ones and 5 zeros
        let mean = 4.0 / 9.0;
        let cell = out.cell(2, 2);
        assert!((cell[0] - mean).abs() < 1e-12);
        assert!((cell[1] - (mean - mean * mean)).abs() < 1e-12);
        // Constant class: mean 0.5, variance 0
        assert!((cell[2] - 0.5).abs() < 1e-12);
        assert!(cell[3].abs() < 1e-12);

        // Border: mean = 1/2, variance = 1/2 - 1/4
        let cell = out.cell(0, 0);
        assert_eq!(cell[0], 0.5);
        assert_eq!(cell[1], 0.25);
    }

    #[test]
    fn test_observer_sees_every_cell_class_major() {
        let field = ClassMap::new_with_value(3, 2, 2, 0.5f64).unwrap();
        let mut out = ClassMap::new(3, 2, 2).unwrap();
        let mut seen = Vec::new();
        let mut record = |r: &CellRecord<'_, f64>| {
            assert!(r.variances.is_none());
            seen.push((r.class, r.cell.to_vec()));
        };
        context_mean_2d_observed(&radii(&[0]), &field, &mut out, &mut record).unwrap();

        assert_eq!(seen.len(), 12);
        assert_eq!(seen[0], (0, vec![0, 0]));
        assert_eq!(seen[1], (0, vec![0, 1]));
        assert_eq!(seen[2], (0, vec![1, 0]));
        assert_eq!(seen[6], (1, vec![0, 0]));
    }

    #[test]
    fn test_observer_gets_variances() {
        let field = ClassVolume::new_with_value(3, 3, 3, 1, 1.0f32).unwrap();
        let mut out = ClassVolume::new(3, 3, 3, 2).unwrap();
        let mut count = 0;
        let mut record = |r: &CellRecord<'_, f32>| {
            assert_eq!(r.cell.len(), 3);
            assert_eq!(r.variances.map(|v| v.len()), Some(1));
            count += 1;
        };
        context_mean_variance_3d_observed(&radii(&[1]), &field, &mut out, &mut record).unwrap();
        assert_eq!(count, 27);
    }

    #[test]
    fn test_mean_3d() {
        let field = ClassVolume::new_with_value(5, 5, 5, 2, 0.5f64).unwrap();
        let mut out = ClassVolume::new(5, 5, 5, 4).unwrap();
        context_mean_3d(&radii(&[1, 2]), &field, &mut out).unwrap();

        let center = out.cell(2, 2, 2);
        for &v in center {
            assert!((v - 0.5).abs() < 1e-12);
        }
        // (1, 2, 2): radius 1 fits, radius 2 doesn't
        assert!((out.get(1, 2, 2, 0).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(out.get(1, 2, 2, 1).unwrap(), 0.5);

        let mut wrong = ClassVolume::new(5, 5, 5, 8).unwrap();
        assert!(context_mean_3d(&radii(&[1, 2]), &field, &mut wrong).is_err());
    }

    #[test]
    fn test_context_map_dispatch() {
        let field = ClassMap::new_with_value(8, 8, 3, 1.0f64 / 3.0).unwrap();
        let r = radii(&[1, 2]);

        let options = ContextOptions::new(r.clone()).with_statistics(ContextStatistics::Mean);
        let means = context_map(&field, &options).unwrap();
        assert_eq!(means.shape(), [8, 8, 6]);

        let both = context_map(&field, &ContextOptions::new(r)).unwrap();
        assert_eq!(both.shape(), [8, 8, 12]);
        assert_eq!(both.get(4, 4, 0).unwrap(), means.get(4, 4, 0).unwrap());
    }

    #[test]
    fn test_context_volume_dispatch() {
        let field = ClassVolume::new_with_value(4, 4, 4, 2, 0.5f32).unwrap();
        let options = ContextOptions::new(radii(&[1]));
        let features = context_volume(&field, &options).unwrap();
        assert_eq!(features.shape(), [4, 4, 4, 4]);

        let options = options.with_statistics(ContextStatistics::Mean);
        assert_eq!(context_volume(&field, &options).unwrap().shape(), [4, 4, 4, 2]);
    }

    #[test]
    fn test_radius_larger_than_grid() {
        let field = ClassMap::new_with_value(3, 3, 4, 0.1f64).unwrap();
        let mut out = ClassMap::new(3, 3, 4).unwrap();
        context_mean_2d(&radii(&[5]), &field, &mut out).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.25));
    }
}
