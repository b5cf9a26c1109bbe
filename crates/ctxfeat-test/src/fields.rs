//! Reproducible test fields

use ctxfeat_core::{ClassMap, ClassVolume};

/// Simple linear congruential generator for reproducible randomness
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    /// Uniform value in [0, 1]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }
}

/// Fill a class vector with random values that sum to one.
fn fill_probabilities(rng: &mut SimpleRng, cell: &mut [f64]) {
    let mut total = 0.0;
    for v in cell.iter_mut() {
        // Keep every class strictly positive so the sum never vanishes
        *v = 0.05 + rng.next_f64();
        total += *v;
    }
    for v in cell.iter_mut() {
        *v /= total;
    }
}

/// Build a random (nx, ny, nc) probability map.
///
/// Every cell holds a class distribution (non-negative, summing to one),
/// like the output of a pixel classifier. The same seed always yields the
/// same map.
///
/// # Panics
///
/// Panics if any extent is zero.
pub fn random_class_map(nx: u32, ny: u32, nc: u32, seed: u64) -> ClassMap<f64> {
    let mut rng = SimpleRng::new(seed);
    let mut map = ClassMap::new(nx, ny, nc).expect("valid test map shape");
    for x in 0..nx {
        for y in 0..ny {
            fill_probabilities(&mut rng, map.cell_mut(x, y));
        }
    }
    map
}

/// Build a random (nx, ny, nz, nc) probability volume.
///
/// # Panics
///
/// Panics if any extent is zero.
pub fn random_class_volume(nx: u32, ny: u32, nz: u32, nc: u32, seed: u64) -> ClassVolume<f64> {
    let mut rng = SimpleRng::new(seed);
    let mut vol = ClassVolume::new(nx, ny, nz, nc).expect("valid test volume shape");
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                fill_probabilities(&mut rng, vol.cell_mut(x, y, z));
            }
        }
    }
    vol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_is_reproducible() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_random_map_is_distribution() {
        let map = random_class_map(6, 5, 3, 11);
        for x in 0..6 {
            for y in 0..5 {
                let cell = map.cell(x, y);
                let sum: f64 = cell.iter().sum();
                assert!((sum - 1.0).abs() < 1e-12);
                assert!(cell.iter().all(|&v| v > 0.0));
            }
        }
        assert_eq!(map, random_class_map(6, 5, 3, 11));
    }

    #[test]
    fn test_random_volume_shape() {
        let vol = random_class_volume(3, 4, 5, 2, 3);
        assert_eq!(vol.shape(), [3, 4, 5, 2]);
    }
}
