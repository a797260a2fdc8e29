//! Single directional adjustment passes
//!
//! A pass looks at every pixel `a` together with its two opposite
//! neighbors `c` (prev) and `d` (next) along one [`Direction`]. When the
//! neighbors differ and `a` is a strict extremum below (dark) or above
//! (light) both of them, `a` moves by one grey level. Everything else is
//! copied through unchanged.
//!
//! Arithmetic is done in `i16` and clamped back to `[0, 255]`.

use ndarray::Array2;
use crate::maybe_rayon::*;
use despeckle_core::raster::{PixelBuffer, Raster};
use despeckle_core::{Error, Result};

use super::direction::{Direction, Polarity};

/// Signed nudge for the pixel at (row, col) along one direction.
///
/// Returns `sign(c - d)` for a dark minimum, `-sign(c - d)` for a light
/// maximum, and 0 otherwise (including whenever `c == d`).
#[inline]
pub(crate) fn nudge(
    buffer: &PixelBuffer,
    row: usize,
    col: usize,
    direction: Direction,
    polarity: Polarity,
) -> i16 {
    let ((pr, pc), (nr, nc)) = direction.offsets();
    let a = buffer.neighbor(row, col, 0, 0) as i16;
    let c = buffer.neighbor(row, col, pr, pc) as i16;
    let d = buffer.neighbor(row, col, nr, nc) as i16;

    if c == d {
        return 0;
    }
    let sign = (c - d).signum();
    match polarity {
        Polarity::Dark if a < c.min(d) => sign,
        Polarity::Light if a > c.max(d) => -sign,
        _ => 0,
    }
}

/// Apply one directional pass of the given polarity.
///
/// Reads only from `buffer` and writes to a fresh output, so every pixel
/// sees the unadjusted values of its neighbors.
///
/// # Arguments
/// * `buffer` - Input image
/// * `direction` - Axis along which neighbors are compared
/// * `polarity` - Whether dark minima or light maxima are nudged
pub fn adjust(buffer: &PixelBuffer, direction: Direction, polarity: Polarity) -> Result<PixelBuffer> {
    apply_nudges(buffer, |row, col| nudge(buffer, row, col, direction, polarity))
}

/// Apply all four directions of one polarity against the same snapshot.
///
/// The four nudges of each pixel are summed (range `-4..=4`) before the
/// clamp. This is the parallel-friendly variant of running the four
/// passes back to back.
pub fn adjust_accumulated(buffer: &PixelBuffer, polarity: Polarity) -> Result<PixelBuffer> {
    apply_nudges(buffer, |row, col| {
        Direction::ALL
            .iter()
            .map(|&dir| nudge(buffer, row, col, dir, polarity))
            .sum()
    })
}

fn apply_nudges<F>(buffer: &PixelBuffer, delta: F) -> Result<PixelBuffer>
where
    F: Fn(usize, usize) -> i16 + Sync + Send,
{
    buffer.ensure_not_empty()?;
    let (rows, cols) = buffer.shape();

    let output_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0u8; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let a = unsafe { buffer.get_unchecked(row, col) } as i16;
                *out = clamp_u8(a + delta(row, col));
            }
            row_data
        })
        .collect();

    let data = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(Raster::from_array(data))
}

#[inline]
fn clamp_u8(v: i16) -> u8 {
    v.clamp(0, 255) as u8
}
