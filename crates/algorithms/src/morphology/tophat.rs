//! Top-hat and black-hat morphological transforms
//!
//! - **Top-hat** (white top-hat): image - opening. Keeps bright features
//!   smaller than the element, such as thin lines on a dark background.
//! - **Black-hat**: closing - image. Keeps small dark features on a
//!   bright background.

use ndarray::Array2;
use crate::maybe_rayon::*;
use despeckle_core::raster::{PixelBuffer, Raster};
use despeckle_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

use super::closing::closing;
use super::element::StructuringElement;
use super::opening::opening;

/// Parameters for top-hat transform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopHatParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Top-hat (white top-hat) algorithm
#[derive(Debug, Clone, Default)]
pub struct TopHat;

impl Algorithm for TopHat {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = TopHatParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "TopHat"
    }

    fn description(&self) -> &'static str {
        "Top-hat transform (image minus opening) to extract bright features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        top_hat(&input, &params.element)
    }
}

/// Parameters for black-hat transform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlackHatParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Black-hat algorithm
#[derive(Debug, Clone, Default)]
pub struct BlackHat;

impl Algorithm for BlackHat {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = BlackHatParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "BlackHat"
    }

    fn description(&self) -> &'static str {
        "Black-hat transform (closing minus image) to extract dark features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        black_hat(&input, &params.element)
    }
}

/// Compute the top-hat (white top-hat) transform
///
/// Opening never exceeds the input, so the difference is always in
/// `[0, 255]`.
///
/// # Arguments
/// * `buffer` - Input image
/// * `element` - Structuring element defining the neighborhood shape
pub fn top_hat(buffer: &PixelBuffer, element: &StructuringElement) -> Result<PixelBuffer> {
    let opened = opening(buffer, element)?;
    subtract(buffer, &opened)
}

/// Compute the black-hat transform
///
/// # Arguments
/// * `buffer` - Input image
/// * `element` - Structuring element defining the neighborhood shape
pub fn black_hat(buffer: &PixelBuffer, element: &StructuringElement) -> Result<PixelBuffer> {
    let closed = closing(buffer, element)?;
    subtract(&closed, buffer)
}

/// `minuend - subtrahend`, saturating at 0
fn subtract(minuend: &PixelBuffer, subtrahend: &PixelBuffer) -> Result<PixelBuffer> {
    minuend.ensure_same_shape(subtrahend)?;
    let (rows, cols) = minuend.shape();

    let output_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0u8; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let a = unsafe { minuend.get_unchecked(row, col) };
                let b = unsafe { subtrahend.get_unchecked(row, col) };
                *out = a.saturating_sub(b);
            }
            row_data
        })
        .collect();

    let data = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(Raster::from_array(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(rows: usize, cols: usize) -> PixelBuffer {
        let data = (0..rows * cols).map(|i| ((i / cols * 7 + i % cols * 3) % 20) as u8).collect();
        PixelBuffer::from_vec(data, rows, cols).unwrap()
    }

    #[test]
    fn test_top_hat_uniform_is_zero() {
        let input = PixelBuffer::filled(11, 11, 5);
        let result = top_hat(&input, &StructuringElement::Square(1)).unwrap();
        assert_eq!(result, PixelBuffer::filled(11, 11, 0));
    }

    #[test]
    fn test_top_hat_detects_bright_spot() {
        let mut input = PixelBuffer::filled(11, 11, 5);
        input.set(5, 5, 100).unwrap();

        let result = top_hat(&input, &StructuringElement::Square(1)).unwrap();
        // Opening removes the spot, leaving 100 - 5
        assert_eq!(result.get(5, 5).unwrap(), 95);
        assert_eq!(result.get(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_top_hat_keeps_thin_line_under_disk() {
        let mut input = PixelBuffer::filled(15, 15, 10);
        for c in 0..15 {
            input.set(7, c, 200).unwrap();
        }
        let result = top_hat(&input, &StructuringElement::Disk(3)).unwrap();
        assert_eq!(result.get(7, 7).unwrap(), 190);
        assert_eq!(result.get(2, 7).unwrap(), 0);
    }

    #[test]
    fn test_top_hat_bounded_by_input() {
        let input = textured(11, 11);
        let result = top_hat(&input, &StructuringElement::Square(1)).unwrap();
        for (out, orig) in result.data().iter().zip(input.data().iter()) {
            assert!(out <= orig);
        }
    }

    #[test]
    fn test_black_hat_detects_dark_spot() {
        let mut input = PixelBuffer::filled(11, 11, 100);
        input.set(5, 5, 1).unwrap();

        let result = black_hat(&input, &StructuringElement::Square(1)).unwrap();
        // Closing fills the spot, leaving 100 - 1
        assert_eq!(result.get(5, 5).unwrap(), 99);
        assert_eq!(result.get(5, 4).unwrap(), 0);
    }

    #[test]
    fn test_algorithm_trait() {
        let input = textured(9, 9);
        let via_trait = TopHat.execute_default(input.clone()).unwrap();
        assert_eq!(via_trait, top_hat(&input, &StructuringElement::default()).unwrap());
        assert_eq!(BlackHat.name(), "BlackHat");
    }
}
