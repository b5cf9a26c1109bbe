//! ctxfeat-test - Regression test framework for ctxfeat
//!
//! This crate provides a numeric regression test harness, reproducible
//! test fields, and brute-force references to check the integral-image
//! arithmetic against.
//!
//! # Usage
//!
//! ```ignore
//! use ctxfeat_test::{RegParams, random_class_map};
//!
//! let mut rp = RegParams::new("ring");
//! let field = random_class_map(16, 12, 3, 7);
//! rp.compare_values(expected, actual, 1e-9);
//! assert!(rp.cleanup());
//! ```

mod fields;
mod params;
mod reference;

pub use fields::{SimpleRng, random_class_map, random_class_volume};
pub use params::RegParams;
pub use reference::{box_mean_2d, box_mean_3d, box_sum_2d, box_sum_3d};
