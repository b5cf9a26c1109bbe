//! ctxfeat-filter - Multi-scale context features for class-probability fields
//!
//! This crate provides:
//!
//! - Integral images and integral volumes with constant-time box sums
//! - Ring averages over a list of nested square or cubic windows
//! - Context feature maps (ring means, optionally ring variances) for 2D
//!   maps and 3D volumes
//! - Per-cell observation hooks for inspecting intermediate results

pub mod context;
mod error;
pub mod integral;
pub mod observer;
pub mod radii;
pub mod ring;

pub use error::{FilterError, FilterResult};
pub use radii::Radii;

// Re-export commonly used types and functions
pub use context::{
    ContextOptions, ContextStatistics, context_map, context_mean_2d, context_mean_2d_observed,
    context_mean_3d, context_mean_3d_observed, context_mean_variance_2d,
    context_mean_variance_2d_observed, context_mean_variance_3d,
    context_mean_variance_3d_observed, context_volume, expected_map_shape, expected_volume_shape,
};
pub use integral::{IntegralImage, IntegralTable, IntegralVolume};
pub use observer::{CellObserver, CellRecord, NoopObserver, TracingObserver};
pub use ring::{RingKernel, ring_averages};
