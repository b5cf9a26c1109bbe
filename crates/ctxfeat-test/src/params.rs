//! Regression test parameters and comparisons

/// Regression test parameters
///
/// Tracks the test name, the index of the current comparison and the
/// overall success status. Failures are collected instead of panicking so
/// one run reports every mismatch.
pub struct RegParams {
    /// Name of the test (e.g., "integral")
    pub test_name: String,
    /// Current comparison index (incremented before each comparison)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current comparison index
    pub fn index(&self) -> usize {
        self.index
    }

    fn record_failure(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value (typically a brute-force reference)
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise. A NaN on
    /// either side never matches.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        // `!(diff <= delta)` so that NaN counts as a failure
        if !(diff <= delta) {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Compare two slices element by element
    ///
    /// Counts as a single comparison index. Reports the first mismatching
    /// position.
    pub fn compare_slices(&mut self, expected: &[f64], actual: &[f64], delta: f64) -> bool {
        self.index += 1;

        if expected.len() != actual.len() {
            let msg = format!(
                "Failure in {}_reg: slice comparison for index {} - length {} vs {}",
                self.test_name,
                self.index,
                expected.len(),
                actual.len()
            );
            self.record_failure(msg);
            return false;
        }

        for (i, (&e, &a)) in expected.iter().zip(actual).enumerate() {
            let diff = (e - a).abs();
            if !(diff <= delta) {
                let msg = format!(
                    "Failure in {}_reg: slice comparison for index {} - mismatch at {}\n\
                     expected = {}, actual = {}, allowed delta = {}",
                    self.test_name, self.index, i, e, a, delta
                );
                self.record_failure(msg);
                return false;
            }
        }

        true
    }

    /// Record a boolean check as a comparison
    pub fn compare_bool(&mut self, expected: bool, actual: bool) -> bool {
        let to_f64 = |b: bool| if b { 1.0 } else { 0.0 };
        self.compare_values(to_f64(expected), to_f64(actual), 0.0)
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values_tracks_index() {
        let mut rp = RegParams::new("params_index");
        assert!(rp.compare_values(1.0, 1.0, 0.0));
        assert!(rp.compare_values(1.0, 1.05, 0.1));
        assert_eq!(rp.index(), 2);
        assert!(rp.cleanup());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("params_failure");
        assert!(!rp.compare_values(1.0, 2.0, 0.5));
        assert!(!rp.compare_values(1.0, f64::NAN, 0.5));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 2);
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_slices() {
        let mut rp = RegParams::new("params_slices");
        assert!(rp.compare_slices(&[1.0, 2.0], &[1.0, 2.0 + 1e-12], 1e-9));
        assert!(!rp.compare_slices(&[1.0, 2.0], &[1.0], 1e-9));
        assert!(!rp.compare_slices(&[1.0, 2.0], &[1.0, 3.0], 1e-9));
        assert_eq!(rp.failures().len(), 2);
    }

    #[test]
    fn test_compare_bool() {
        let mut rp = RegParams::new("params_bool");
        assert!(rp.compare_bool(true, true));
        assert!(!rp.compare_bool(true, false));
    }
}
