//! Validated radius lists
//!
//! A [`Radii`] value holds the half-widths `r0 < r1 < ... < r(k-1)` of the
//! nested windows. Strict ascending order keeps every ring
//! `window(ri) \ window(r(i-1))` non-empty, so ring averages never divide
//! by a zero or negative cell count.

use crate::{FilterError, FilterResult};

/// Non-empty, strictly ascending list of window half-widths
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Radii {
    values: Vec<u32>,
}

impl Radii {
    /// Validate and wrap a radius list.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidRadii` if `values` is empty or not
    /// strictly ascending (duplicates included).
    ///
    /// # Examples
    ///
    /// ```
    /// use ctxfeat_filter::Radii;
    ///
    /// let radii = Radii::new(&[1, 3, 5]).unwrap();
    /// assert_eq!(radii.len(), 3);
    /// assert!(Radii::new(&[3, 1]).is_err());
    /// ```
    pub fn new(values: &[u32]) -> FilterResult<Self> {
        if values.is_empty() {
            return Err(FilterError::InvalidRadii(
                "at least one radius is required".into(),
            ));
        }
        if let Some(i) = values.windows(2).position(|w| w[0] >= w[1]) {
            return Err(FilterError::InvalidRadii(format!(
                "radii must be strictly ascending: radius[{}] = {} is followed by radius[{}] = {}",
                i,
                values[i],
                i + 1,
                values[i + 1]
            )));
        }
        Ok(Radii {
            values: values.to_vec(),
        })
    }

    /// Sort and deduplicate `values`, then wrap them.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidRadii` if `values` is empty.
    pub fn sorted(values: &[u32]) -> FilterResult<Self> {
        let mut v = values.to_vec();
        v.sort_unstable();
        v.dedup();
        Self::new(&v)
    }

    /// Number of radii (k)
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with slices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Radii as a slice, in ascending order
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    /// Iterate over the radii in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.iter().copied()
    }

    /// Largest radius
    #[inline]
    pub fn max(&self) -> u32 {
        // Non-empty by construction
        self.values[self.values.len() - 1]
    }

    /// Number of cells in the window of each radius, `(2r + 1)^ndim`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidRadii` if a count overflows `u64`.
    pub fn window_counts(&self, ndim: u32) -> FilterResult<Vec<u64>> {
        self.values
            .iter()
            .map(|&r| {
                (2 * r as u64 + 1).checked_pow(ndim).ok_or_else(|| {
                    FilterError::InvalidRadii(format!(
                        "window of radius {} has too many cells in {} dimensions",
                        r, ndim
                    ))
                })
            })
            .collect()
    }
}

impl TryFrom<&[u32]> for Radii {
    type Error = FilterError;

    fn try_from(values: &[u32]) -> FilterResult<Self> {
        Radii::new(values)
    }
}

impl TryFrom<Vec<u32>> for Radii {
    type Error = FilterError;

    fn try_from(values: Vec<u32>) -> FilterResult<Self> {
        Radii::new(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radii_accepts_ascending() {
        let radii = Radii::new(&[0, 1, 4]).unwrap();
        assert_eq!(radii.as_slice(), &[0, 1, 4]);
        assert_eq!(radii.max(), 4);
        assert_eq!(radii.iter().collect::<Vec<_>>(), vec![0, 1, 4]);
    }

    #[test]
    fn test_radii_rejects_empty() {
        assert!(matches!(Radii::new(&[]), Err(FilterError::InvalidRadii(_))));
        assert!(Radii::sorted(&[]).is_err());
    }

    #[test]
    fn test_radii_rejects_duplicates_and_descending() {
        assert!(Radii::new(&[1, 1]).is_err());
        assert!(Radii::new(&[1, 3, 2]).is_err());
    }

    #[test]
    fn test_radii_sorted() {
        let radii = Radii::sorted(&[5, 1, 3, 1]).unwrap();
        assert_eq!(radii.as_slice(), &[1, 3, 5]);
    }

    #[test]
    fn test_radii_try_from() {
        assert!(Radii::try_from(vec![2u32, 4]).is_ok());
        assert!(Radii::try_from(&[4u32, 2][..]).is_err());
    }

    #[test]
    fn test_window_counts() {
        let radii = Radii::new(&[0, 1, 2]).unwrap();
        assert_eq!(radii.window_counts(2).unwrap(), vec![1, 9, 25]);
        assert_eq!(radii.window_counts(3).unwrap(), vec![1, 27, 125]);

        let huge = Radii::new(&[u32::MAX]).unwrap();
        assert!(huge.window_counts(3).is_err());
    }
}
