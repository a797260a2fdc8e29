//! Difference images between an input and a filtered output
//!
//! The absolute difference is taken in `i16` and then min-max normalized
//! over the whole image to the full `[0, 255]` range.

use despeckle_core::raster::{PixelBuffer, Raster};
use despeckle_core::Result;
use serde::{Deserialize, Serialize};

/// Raw statistics of `|a - b|` before normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferenceStats {
    /// Smallest absolute difference
    pub min: u8,
    /// Largest absolute difference
    pub max: u8,
    /// Mean absolute difference
    pub mean: f64,
    /// Number of pixels where `a != b`
    pub changed: usize,
    /// Total number of pixels
    pub total: usize,
}

impl DifferenceStats {
    /// Fraction of pixels that changed, in `[0, 1]`
    pub fn changed_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.changed as f64 / self.total as f64
        }
    }
}

/// Per-pixel `|a - b|` in a signed wide domain.
///
/// Fails with `SizeMismatch` when the shapes differ.
pub fn absolute_difference(a: &PixelBuffer, b: &PixelBuffer) -> Result<Raster<i16>> {
    a.ensure_same_shape(b)?;
    a.ensure_not_empty()?;
    let mut out: Raster<i16> = Raster::new(a.rows(), a.cols());
    ndarray::Zip::from(out.data_mut())
        .and(a.data())
        .and(b.data())
        .for_each(|d, &va, &vb| *d = (va as i16 - vb as i16).abs());
    Ok(out)
}

/// Linearly rescale so the observed minimum maps to 0 and the maximum to 255.
///
/// A constant input (including all zeros) maps to the all-zero image.
pub fn normalize_min_max(raster: &Raster<i16>) -> PixelBuffer {
    let stats = raster.statistics();
    let (min, max) = match (stats.min, stats.max) {
        (Some(min), Some(max)) if max > min => (min, max),
        _ => return raster.map(|_| 0u8),
    };
    let scale = 255.0 / f64::from(max - min);
    raster.map(|v| (f64::from(v - min) * scale).round().clamp(0.0, 255.0) as u8)
}

/// Normalized absolute difference image of two equally shaped buffers.
///
/// Symmetric in its arguments; identical inputs give the all-zero image.
pub fn difference(a: &PixelBuffer, b: &PixelBuffer) -> Result<PixelBuffer> {
    let diff = absolute_difference(a, b)?;
    Ok(normalize_min_max(&diff))
}

/// Statistics of `|a - b|` without normalization
pub fn difference_stats(a: &PixelBuffer, b: &PixelBuffer) -> Result<DifferenceStats> {
    let diff = absolute_difference(a, b)?;
    Ok(stats_of(&diff))
}

pub(crate) fn stats_of(diff: &Raster<i16>) -> DifferenceStats {
    let stats = diff.statistics();
    let changed = diff.data().iter().filter(|&&v| v != 0).count();
    DifferenceStats {
        min: stats.min.unwrap_or(0) as u8,
        max: stats.max.unwrap_or(0) as u8,
        mean: stats.mean.unwrap_or(0.0),
        changed,
        total: diff.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use despeckle_core::Error;

    fn buf<const C: usize>(rows: &[[u8; C]]) -> PixelBuffer {
        PixelBuffer::from_rows(rows).unwrap()
    }

    #[test]
    fn test_identical_is_all_zero() {
        let a = buf(&[[3, 200], [17, 90]]);
        assert_eq!(difference(&a, &a).unwrap(), PixelBuffer::filled(2, 2, 0));
    }

    #[test]
    fn test_min_max_scaling() {
        // |d| = [1, 0, 5] -> [51, 0, 255]
        let a = buf(&[[0, 10, 20]]);
        let b = buf(&[[1, 10, 25]]);
        assert_eq!(difference(&a, &b).unwrap(), buf(&[[51, 0, 255]]));
    }

    #[test]
    fn test_rounds_to_nearest() {
        // |d| = [5, 0, 0, 20] -> 5 * 255 / 20 = 63.75
        let a = buf(&[[0, 10], [20, 30]]);
        let b = buf(&[[5, 10], [20, 10]]);
        assert_eq!(difference(&a, &b).unwrap(), buf(&[[64, 0], [0, 255]]));
    }

    #[test]
    fn test_symmetric() {
        let a = buf(&[[0, 255, 30], [7, 8, 9]]);
        let b = buf(&[[255, 0, 31], [9, 8, 7]]);
        assert_eq!(difference(&a, &b).unwrap(), difference(&b, &a).unwrap());
    }

    #[test]
    fn test_full_range_without_overflow() {
        let a = buf(&[[0, 255]]);
        let b = buf(&[[255, 255]]);
        assert_eq!(difference(&a, &b).unwrap(), buf(&[[255, 0]]));
    }

    #[test]
    fn test_constant_nonzero_difference_is_zero() {
        let a = buf(&[[10, 20]]);
        let b = buf(&[[15, 25]]);
        assert_eq!(difference(&a, &b).unwrap(), buf(&[[0, 0]]));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = PixelBuffer::new(2, 3);
        let b = PixelBuffer::new(3, 2);
        assert!(matches!(difference(&a, &b), Err(Error::SizeMismatch { .. })));
        assert!(difference_stats(&a, &b).is_err());
    }

    #[test]
    fn test_stats() {
        let a = buf(&[[0, 10], [20, 30]]);
        let b = buf(&[[5, 10], [20, 10]]);
        let stats = difference_stats(&a, &b).unwrap();
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 20);
        assert_eq!(stats.changed, 2);
        assert_eq!(stats.total, 4);
        assert_relative_eq!(stats.mean, 6.25);
        assert_relative_eq!(stats.changed_fraction(), 0.5);
    }
}
