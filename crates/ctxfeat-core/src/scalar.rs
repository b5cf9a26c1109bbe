//! Numeric bound for field values

use num_traits::Float;
use std::fmt::Debug;

/// Floating-point element type of a field.
///
/// Blanket-implemented for every [`Float`] that is also `Debug`,
/// `Send` and `Sync`, so both `f32` and `f64` qualify.
///
/// Sums in integral tables are accumulated in `T`, so large `f32` grids
/// lose precision in the far corner; prefer `f64` when that matters.
pub trait Scalar: Float + Debug + Send + Sync + 'static {}

impl<T> Scalar for T where T: Float + Debug + Send + Sync + 'static {}
