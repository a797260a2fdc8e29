//! Morphological opening (erosion followed by dilation)
//!
//! Removes small bright features (noise, spikes) while preserving
//! the overall shape and size of larger bright regions.

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

use super::dilate::dilate;
use super::element::StructuringElement;
use super::erode::erode;

/// Parameters for morphological opening
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Opening algorithm
#[derive(Debug, Clone, Default)]
pub struct Opening;

impl Algorithm for Opening {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = OpeningParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Opening"
    }

    fn description(&self) -> &'static str {
        "Morphological opening (erosion then dilation) to remove small bright features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        opening(&input, &params.element)
    }
}

/// Perform morphological opening on an image
///
/// Opening = erode then dilate. Removes small bright features
/// (spots, thin protrusions) while preserving the overall shape
/// of larger structures.
///
/// # Arguments
/// * `buffer` - Input image
/// * `element` - Structuring element defining the neighborhood shape
pub fn opening(buffer: &PixelBuffer, element: &StructuringElement) -> Result<PixelBuffer> {
    let eroded = erode(buffer, element)?;
    dilate(&eroded, element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_removes_bright_spot() {
        let mut input = PixelBuffer::filled(11, 11, 5);
        input.set(5, 5, 100).unwrap();

        let result = opening(&input, &StructuringElement::Square(1)).unwrap();
        assert_eq!(result, PixelBuffer::filled(11, 11, 5));
    }

    #[test]
    fn test_opening_preserves_large_bright_region() {
        let mut input = PixelBuffer::filled(11, 11, 5);
        for r in 4..7 {
            for c in 4..7 {
                input.set(r, c, 100).unwrap();
            }
        }

        let result = opening(&input, &StructuringElement::Square(1)).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_opening_keeps_dark_spot() {
        let mut input = PixelBuffer::filled(9, 9, 80);
        input.set(4, 4, 0).unwrap();
        let result = opening(&input, &StructuringElement::Square(1)).unwrap();
        assert_eq!(result.get(4, 4).unwrap(), 0);
    }
}
