//! ClassMap - 2D class-probability field

use super::{check_data_len, element_count};
use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// 2D field of per-class values
///
/// Shape is (nx, ny, nclasses). Typically holds the per-pixel output of a
/// classifier, with values in [0, 1] (not enforced), or a feature map
/// derived from one.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMap<T> {
    /// Extent along X
    nx: u32,
    /// Extent along Y
    ny: u32,
    /// Number of channels (classes or features)
    nc: u32,
    /// Values, row-major over (x, y) with the channel axis fastest
    data: Vec<T>,
}

impl<T: Scalar> ClassMap<T> {
    /// Create a new map with all values set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidShape` if any extent is 0 or the element
    /// count overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctxfeat_core::ClassMap;
    ///
    /// let map = ClassMap::<f64>::new(320, 240, 4).unwrap();
    /// assert_eq!(map.shape(), [320, 240, 4]);
    /// ```
    pub fn new(nx: u32, ny: u32, nc: u32) -> Result<Self> {
        Self::new_with_value(nx, ny, nc, T::zero())
    }

    /// Create a new map with all values set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidShape` if any extent is 0.
    pub fn new_with_value(nx: u32, ny: u32, nc: u32, value: T) -> Result<Self> {
        let size = element_count(&[nx, ny, nc])?;
        Ok(ClassMap {
            nx,
            ny,
            nc,
            data: vec![value; size],
        })
    }

    /// Create a map from raw data in (x, y, c) row-major order
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is invalid or the data length doesn't
    /// match it.
    pub fn from_data(nx: u32, ny: u32, nc: u32, data: Vec<T>) -> Result<Self> {
        check_data_len(&[nx, ny, nc], data.len())?;
        Ok(ClassMap { nx, ny, nc, data })
    }

    /// Create a map by evaluating `f(x, y, c)` for every element
    pub fn from_fn<F>(nx: u32, ny: u32, nc: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32, u32) -> T,
    {
        let size = element_count(&[nx, ny, nc])?;
        let mut data = Vec::with_capacity(size);
        for x in 0..nx {
            for y in 0..ny {
                for c in 0..nc {
                    data.push(f(x, y, c));
                }
            }
        }
        Ok(ClassMap { nx, ny, nc, data })
    }

    /// Get the extent along X
    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    /// Get the extent along Y
    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    /// Get the number of channels
    #[inline]
    pub fn num_classes(&self) -> u32 {
        self.nc
    }

    /// Get the shape as `[nx, ny, nc]`
    #[inline]
    pub fn shape(&self) -> [u32; 3] {
        [self.nx, self.ny, self.nc]
    }

    #[inline]
    fn index(&self, x: u32, y: u32, c: u32) -> usize {
        ((x as usize) * (self.ny as usize) + (y as usize)) * (self.nc as usize) + (c as usize)
    }

    fn check_bounds(&self, x: u32, y: u32, c: u32) -> Result<usize> {
        if x >= self.nx || y >= self.ny || c >= self.nc {
            return Err(Error::IndexOutOfBounds {
                coord: vec![x, y, c],
                shape: self.shape().to_vec(),
            });
        }
        Ok(self.index(x, y, c))
    }

    /// Get the value at (x, y, c)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if any coordinate is out of range.
    #[inline]
    pub fn get(&self, x: u32, y: u32, c: u32) -> Result<T> {
        let idx = self.check_bounds(x, y, c)?;
        Ok(self.data[idx])
    }

    /// Set the value at (x, y, c)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if any coordinate is out of range.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, c: u32, value: T) -> Result<()> {
        let idx = self.check_bounds(x, y, c)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Get the value at (x, y, c) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the flat index falls outside the data buffer.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32, c: u32) -> T {
        self.data[self.index(x, y, c)]
    }

    /// Set the value at (x, y, c) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the flat index falls outside the data buffer.
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, c: u32, value: T) {
        let idx = self.index(x, y, c);
        self.data[idx] = value;
    }

    /// Get the channel vector of cell (x, y)
    ///
    /// # Panics
    ///
    /// Panics if `x >= nx` or `y >= ny`.
    #[inline]
    pub fn cell(&self, x: u32, y: u32) -> &[T] {
        let start = self.index(x, y, 0);
        &self.data[start..start + self.nc as usize]
    }

    /// Get the mutable channel vector of cell (x, y)
    ///
    /// # Panics
    ///
    /// Panics if `x >= nx` or `y >= ny`.
    #[inline]
    pub fn cell_mut(&mut self, x: u32, y: u32) -> &mut [T] {
        let start = self.index(x, y, 0);
        let end = start + self.nc as usize;
        &mut self.data[start..end]
    }

    /// Get raw access to the data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get mutable access to the data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Set all values to `value`
    pub fn set_all(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Clear all values to zero
    pub fn clear(&mut self) {
        self.data.fill(T::zero());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_creation() {
        let map = ClassMap::<f32>::new(5, 4, 3).unwrap();
        assert_eq!(map.shape(), [5, 4, 3]);
        assert_eq!(map.data().len(), 60);
        assert!(map.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_map_rejects_zero_extent() {
        assert!(ClassMap::<f32>::new(0, 4, 3).is_err());
        assert!(ClassMap::<f32>::new(5, 4, 0).is_err());
    }

    #[test]
    fn test_map_layout_is_class_fastest() {
        let map = ClassMap::<f64>::from_fn(2, 3, 2, |x, y, c| (x * 100 + y * 10 + c) as f64)
            .unwrap();
        assert_eq!(map.data()[0], 0.0);
        assert_eq!(map.data()[1], 1.0);
        assert_eq!(map.data()[2], 10.0);
        // (1, 0, 0) follows the three cells of row x=0
        assert_eq!(map.data()[6], 100.0);
        assert_eq!(map.cell(1, 2), &[120.0, 121.0]);
    }

    #[test]
    fn test_map_get_set() {
        let mut map = ClassMap::<f64>::new(4, 4, 2).unwrap();
        map.set(3, 1, 1, 0.25).unwrap();
        assert_eq!(map.get(3, 1, 1).unwrap(), 0.25);
        assert_eq!(map.get_unchecked(3, 1, 1), 0.25);

        assert!(map.get(4, 0, 0).is_err());
        assert!(map.get(0, 0, 2).is_err());
        assert!(map.set(0, 4, 0, 1.0).is_err());
    }

    #[test]
    fn test_map_out_of_bounds_reports_coordinate() {
        let map = ClassMap::<f64>::new(4, 3, 2).unwrap();
        assert_eq!(
            map.get(u32::MAX, u32::MAX, u32::MAX),
            Err(Error::IndexOutOfBounds {
                coord: vec![u32::MAX, u32::MAX, u32::MAX],
                shape: vec![4, 3, 2],
            })
        );
    }

    #[test]
    fn test_map_cell_mut() {
        let mut map = ClassMap::<f32>::new(3, 3, 4).unwrap();
        map.cell_mut(1, 2).copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(map.get(1, 2, 3).unwrap(), 4.0);
        assert_eq!(map.get(1, 1, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_map_from_data_length() {
        assert!(ClassMap::from_data(2, 2, 1, vec![0.0f32; 4]).is_ok());
        assert!(ClassMap::from_data(2, 2, 1, vec![0.0f32; 3]).is_err());
    }

    #[test]
    fn test_map_set_all_and_clear() {
        let mut map = ClassMap::<f64>::new(2, 2, 2).unwrap();
        map.set_all(0.5);
        assert!(map.data().iter().all(|&v| v == 0.5));
        map.clear();
        assert!(map.data().iter().all(|&v| v == 0.0));
    }
}
