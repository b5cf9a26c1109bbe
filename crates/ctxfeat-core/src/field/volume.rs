//! ClassVolume - 3D class-probability field

use super::{check_data_len, element_count};
use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// 3D field of per-class values
///
/// Shape is (nx, ny, nz, nclasses). The volumetric counterpart of
/// [`ClassMap`](super::ClassMap), with the same channel-fastest layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassVolume<T> {
    nx: u32,
    ny: u32,
    nz: u32,
    nc: u32,
    data: Vec<T>,
}

impl<T: Scalar> ClassVolume<T> {
    /// Create a new volume with all values set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidShape` if any extent is 0 or the element
    /// count overflows `usize`.
    pub fn new(nx: u32, ny: u32, nz: u32, nc: u32) -> Result<Self> {
        Self::new_with_value(nx, ny, nz, nc, T::zero())
    }

    /// Create a new volume with all values set to `value`
    pub fn new_with_value(nx: u32, ny: u32, nz: u32, nc: u32, value: T) -> Result<Self> {
        let size = element_count(&[nx, ny, nz, nc])?;
        Ok(ClassVolume {
            nx,
            ny,
            nz,
            nc,
            data: vec![value; size],
        })
    }

    /// Create a volume from raw data in (x, y, z, c) row-major order
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is invalid or the data length doesn't
    /// match it.
    pub fn from_data(nx: u32, ny: u32, nz: u32, nc: u32, data: Vec<T>) -> Result<Self> {
        check_data_len(&[nx, ny, nz, nc], data.len())?;
        Ok(ClassVolume {
            nx,
            ny,
            nz,
            nc,
            data,
        })
    }

    /// Create a volume by evaluating `f(x, y, z, c)` for every element
    pub fn from_fn<F>(nx: u32, ny: u32, nz: u32, nc: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32, u32, u32) -> T,
    {
        let size = element_count(&[nx, ny, nz, nc])?;
        let mut data = Vec::with_capacity(size);
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    for c in 0..nc {
                        data.push(f(x, y, z, c));
                    }
                }
            }
        }
        Ok(ClassVolume {
            nx,
            ny,
            nz,
            nc,
            data,
        })
    }

    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    #[inline]
    pub fn nz(&self) -> u32 {
        self.nz
    }

    #[inline]
    pub fn num_classes(&self) -> u32 {
        self.nc
    }

    /// Get the shape as `[nx, ny, nz, nc]`
    #[inline]
    pub fn shape(&self) -> [u32; 4] {
        [self.nx, self.ny, self.nz, self.nc]
    }

    #[inline]
    fn index(&self, x: u32, y: u32, z: u32, c: u32) -> usize {
        let cell = ((x as usize) * (self.ny as usize) + (y as usize)) * (self.nz as usize)
            + (z as usize);
        cell * (self.nc as usize) + (c as usize)
    }

    fn check_bounds(&self, x: u32, y: u32, z: u32, c: u32) -> Result<usize> {
        if x >= self.nx || y >= self.ny || z >= self.nz || c >= self.nc {
            return Err(Error::IndexOutOfBounds {
                coord: vec![x, y, z, c],
                shape: self.shape().to_vec(),
            });
        }
        Ok(self.index(x, y, z, c))
    }

    /// Get the value at (x, y, z, c)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if any coordinate is out of range.
    #[inline]
    pub fn get(&self, x: u32, y: u32, z: u32, c: u32) -> Result<T> {
        let idx = self.check_bounds(x, y, z, c)?;
        Ok(self.data[idx])
    }

    /// Set the value at (x, y, z, c)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if any coordinate is out of range.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, z: u32, c: u32, value: T) -> Result<()> {
        let idx = self.check_bounds(x, y, z, c)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Get the value at (x, y, z, c) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the flat index falls outside the data buffer.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32, z: u32, c: u32) -> T {
        self.data[self.index(x, y, z, c)]
    }

    /// Set the value at (x, y, z, c) without bounds checking
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, z: u32, c: u32, value: T) {
        let idx = self.index(x, y, z, c);
        self.data[idx] = value;
    }

    /// Get the channel vector of cell (x, y, z)
    #[inline]
    pub fn cell(&self, x: u32, y: u32, z: u32) -> &[T] {
        let start = self.index(x, y, z, 0);
        &self.data[start..start + self.nc as usize]
    }

    /// Get the mutable channel vector of cell (x, y, z)
    #[inline]
    pub fn cell_mut(&mut self, x: u32, y: u32, z: u32) -> &mut [T] {
        let start = self.index(x, y, z, 0);
        let end = start + self.nc as usize;
        &mut self.data[start..end]
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn set_all(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn clear(&mut self) {
        self.data.fill(T::zero());
    }
}
