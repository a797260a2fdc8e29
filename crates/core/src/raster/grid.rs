//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::RasterElement;
use ndarray::Array2;

/// An owned 2D grid of 8-bit intensities.
///
/// Every filter stage takes a `&PixelBuffer` and returns a new one of the
/// same shape; no stage mutates its input.
pub type PixelBuffer = Raster<u8>;

/// A 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in a row-major grid.
///
/// # Type Parameters
///
/// - `T`: The cell value type, must implement [`RasterElement`]
///
/// # Example
///
/// ```ignore
/// use despeckle_core::Raster;
///
/// // Create a 100x100 raster filled with zeros
/// let mut raster: Raster<u8> = Raster::new(100, 100);
///
/// // Set a value
/// raster.set(10, 20, 42)?;
///
/// // Get a value
/// let value = raster.get(10, 20)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create a raster from row-major samples.
    ///
    /// Fails with [`Error::InvalidDimensions`] when either extent is zero
    /// or when `data` does not hold exactly `rows * cols` samples.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Create a raster from nested rows, all of equal length
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows.len(),
            });
        }
        let data: Vec<T> = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::from_vec(data, rows.len(), cols)
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail with [`Error::InvalidDimensions`] when either extent is zero.
    ///
    /// `new`, `filled` and `from_array` accept empty shapes; every filter
    /// entry point calls this before touching pixels.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.rows() == 0 || self.cols() == 0 {
            return Err(Error::InvalidDimensions {
                width: self.cols(),
                height: self.rows(),
            });
        }
        Ok(())
    }

    /// Fail with [`Error::SizeMismatch`] unless `other` has the same shape
    pub fn ensure_same_shape<U: RasterElement>(&self, other: &Raster<U>) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::SizeMismatch {
                er: self.rows(),
                ec: self.cols(),
                ar: other.rows(),
                ac: other.cols(),
            });
        }
        Ok(())
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Value of the neighbor at offset (dr, dc) from an in-bounds cell.
    ///
    /// Boundary policy is edge clamp: a neighbor that falls outside the
    /// grid resolves to the center sample itself, so edge cells see
    /// themselves in place of the missing neighbor.
    ///
    /// # Panics
    /// Panics if (row, col) is itself out of bounds.
    pub fn neighbor(&self, row: usize, col: usize, dr: isize, dc: isize) -> T {
        let nr = row as isize + dr;
        let nc = col as isize + dc;
        if nr < 0 || nc < 0 || nr >= self.rows() as isize || nc >= self.cols() as isize {
            self.data[(row, col)]
        } else {
            self.data[(nr as usize, nc as usize)]
        }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// Copy the cells out in row-major order
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().copied().collect()
    }

    /// Apply `f` to every cell, producing a raster of the same shape
    pub fn map<U, F>(&self, f: F) -> Raster<U>
    where
        U: RasterElement,
        F: Fn(T) -> U,
    {
        Raster {
            data: self.data.mapv(f),
        }
    }

    // Statistics

    /// Calculate basic statistics (min, max, mean, count of cells)
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min = None;
        let mut max = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if min.is_none_or(|m| value < m) {
                min = Some(value);
            }
            if max.is_none_or(|m| value > m) {
                max = Some(value);
            }

            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            mean,
            count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<u8> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: PixelBuffer = Raster::new(10, 10);
        raster.set(5, 5, 42).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 42);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let raster: PixelBuffer = Raster::filled(3, 4, 7);
        assert_eq!(
            raster.get(3, 0),
            Err(Error::IndexOutOfBounds { row: 3, col: 0, rows: 3, cols: 4 })
        );
        assert!(raster.get(0, 4).is_err());
        assert!(raster.get(2, 3).is_ok());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut raster: PixelBuffer = Raster::new(2, 2);
        assert!(raster.set(2, 2, 1).is_err());
    }

    #[test]
    fn test_from_vec_validates_shape() {
        assert!(PixelBuffer::from_vec(vec![1, 2, 3], 2, 2).is_err());
        assert!(PixelBuffer::from_vec(Vec::new(), 0, 0).is_err());
        let r = PixelBuffer::from_vec(vec![1, 2, 3, 4, 5, 6], 2, 3).unwrap();
        assert_eq!(r.get(1, 0).unwrap(), 4);
    }

    #[test]
    fn test_from_rows() {
        let r = PixelBuffer::from_rows(&[[1, 2], [3, 4]]).unwrap();
        assert_eq!(r.shape(), (2, 2));
        assert_eq!(r.get(1, 1).unwrap(), 4);
        assert!(PixelBuffer::from_rows(&[vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = PixelBuffer::filled(2, 2, 9);
        let mut copy = original.clone();
        copy.set(0, 0, 1).unwrap();
        assert_eq!(original.get(0, 0).unwrap(), 9);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_neighbor_clamps_to_center() {
        let r = PixelBuffer::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]).unwrap();
        assert_eq!(r.neighbor(1, 1, -1, -1), 1);
        assert_eq!(r.neighbor(1, 1, 1, 0), 8);
        // Top-left corner: every outward neighbor is the corner itself
        assert_eq!(r.neighbor(0, 0, -1, 0), 1);
        assert_eq!(r.neighbor(0, 0, -1, 1), 1);
        assert_eq!(r.neighbor(0, 2, 0, 1), 3);
        assert_eq!(r.neighbor(2, 2, 1, 1), 9);
    }

    #[test]
    fn test_ensure_same_shape() {
        let a = PixelBuffer::new(2, 3);
        let b = PixelBuffer::new(3, 2);
        assert!(a.ensure_same_shape(&a.clone()).is_ok());
        assert_eq!(
            a.ensure_same_shape(&b),
            Err(Error::SizeMismatch { er: 2, ec: 3, ar: 3, ac: 2 })
        );
    }

    #[test]
    fn test_ensure_not_empty() {
        assert!(PixelBuffer::new(1, 1).ensure_not_empty().is_ok());
        assert_eq!(
            PixelBuffer::new(0, 4).ensure_not_empty(),
            Err(Error::InvalidDimensions { width: 4, height: 0 })
        );
        assert!(PixelBuffer::new(0, 0).ensure_not_empty().is_err());
    }

    #[test]
    fn test_raster_statistics() {
        let mut raster: Raster<i16> = Raster::new(10, 10);
        for i in 0..10 {
            for j in 0..10 {
                raster.set(i, j, (i * 10 + j) as i16 - 50).unwrap();
            }
        }

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(-50));
        assert_eq!(stats.max, Some(49));
        assert_eq!(stats.count, 100);
        approx::assert_relative_eq!(stats.mean.unwrap(), -0.5);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = PixelBuffer::new(0, 0).statistics();
        assert_eq!(stats.min, None);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.count, 0);
    }
}
