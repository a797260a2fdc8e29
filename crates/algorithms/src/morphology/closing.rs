//! Morphological closing (dilation followed by erosion)
//!
//! Fills small dark gaps and holes while preserving the overall
//! shape and size of larger dark regions.

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

use super::dilate::dilate;
use super::element::StructuringElement;
use super::erode::erode;

/// Parameters for morphological closing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClosingParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Closing algorithm
#[derive(Debug, Clone, Default)]
pub struct Closing;

impl Algorithm for Closing {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = ClosingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Closing"
    }

    fn description(&self) -> &'static str {
        "Morphological closing (dilation then erosion) to fill small dark gaps"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        closing(&input, &params.element)
    }
}

/// Perform morphological closing on an image
///
/// Closing = dilate then erode. Fills small dark gaps and holes
/// while preserving the overall shape of larger dark structures.
///
/// # Arguments
/// * `buffer` - Input image
/// * `element` - Structuring element defining the neighborhood shape
pub fn closing(buffer: &PixelBuffer, element: &StructuringElement) -> Result<PixelBuffer> {
    let dilated = dilate(buffer, element)?;
    erode(&dilated, element)
}
