//! Morphological dilation (maximum filter)
//!
//! Replaces each pixel with the maximum value in its structuring element
//! neighborhood. Enlarges bright regions and shrinks dark regions.

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

use super::element::StructuringElement;
use super::erode::window_extremum;

/// Parameters for morphological dilation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DilateParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Dilation algorithm
#[derive(Debug, Clone, Default)]
pub struct Dilate;

impl Algorithm for Dilate {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = DilateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Dilate"
    }

    fn description(&self) -> &'static str {
        "Morphological dilation (maximum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        dilate(&input, &params.element)
    }
}

/// Perform morphological dilation on an image
///
/// Each output pixel is the maximum value within the structuring element
/// neighborhood, cropped at the image border.
///
/// # Arguments
/// * `buffer` - Input image
/// * `element` - Structuring element defining the neighborhood shape
pub fn dilate(buffer: &PixelBuffer, element: &StructuringElement) -> Result<PixelBuffer> {
    window_extremum(buffer, element, u8::MIN, u8::max)
}
