//! Morphological erosion (minimum filter)
//!
//! Replaces each pixel with the minimum value in its structuring element
//! neighborhood. Shrinks bright regions and enlarges dark regions.

use ndarray::Array2;
use crate::maybe_rayon::*;
use despeckle_core::raster::{PixelBuffer, Raster};
use despeckle_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

use super::element::StructuringElement;

/// Parameters for morphological erosion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErodeParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Erosion algorithm
#[derive(Debug, Clone, Default)]
pub struct Erode;

impl Algorithm for Erode {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = ErodeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Erode"
    }

    fn description(&self) -> &'static str {
        "Morphological erosion (minimum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        erode(&input, &params.element)
    }
}

/// Perform morphological erosion on an image
///
/// Each output pixel is the minimum value within the structuring element
/// neighborhood. Near the border the element is cropped to the cells that
/// lie inside the image.
///
/// # Arguments
/// * `buffer` - Input image
/// * `element` - Structuring element defining the neighborhood shape
pub fn erode(buffer: &PixelBuffer, element: &StructuringElement) -> Result<PixelBuffer> {
    window_extremum(buffer, element, u8::MAX, u8::min)
}

/// Fold every in-bounds cell under the element with `pick`, starting at `init`
pub(super) fn window_extremum(
    buffer: &PixelBuffer,
    element: &StructuringElement,
    init: u8,
    pick: fn(u8, u8) -> u8,
) -> Result<PixelBuffer> {
    buffer.ensure_not_empty()?;
    let (rows, cols) = buffer.shape();
    let offsets = element.offsets();

    let output_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![init; cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                let r = row as isize;
                let c = col as isize;

                for &(dr, dc) in &offsets {
                    let nr = r + dr;
                    let nc = c + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let v = unsafe { buffer.get_unchecked(nr as usize, nc as usize) };
                    *out = pick(*out, v);
                }
            }

            row_data
        })
        .collect();

    let data = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(Raster::from_array(data))
}
