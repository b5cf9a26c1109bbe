//! ctxfeat - Multi-scale context features for per-pixel classifiers
//!
//! Given the per-class probability output of a pixel or voxel classifier,
//! ctxfeat computes for every cell the mean (and optionally the variance)
//! of each class over a set of nested windows. The resulting feature field
//! is typically fed back into a second classification pass.
//!
//! # Example
//!
//! ```
//! use ctxfeat::ClassMap;
//! use ctxfeat::filter::{ContextOptions, ContextStatistics, Radii, context_map};
//!
//! // Two classes, uniform prior everywhere
//! let probs = ClassMap::new_with_value(32, 32, 2, 0.5f64).unwrap();
//! let options = ContextOptions::new(Radii::new(&[1, 2, 4]).unwrap())
//!     .with_statistics(ContextStatistics::Mean);
//!
//! let features = context_map(&probs, &options).unwrap();
//! assert_eq!(features.shape(), [32, 32, 6]);
//! ```

// Re-export core types (containers used everywhere)
pub use ctxfeat_core::*;

// Re-export the feature extractors as a module
pub use ctxfeat_filter as filter;
