//! Median filter

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

use super::{from_gray_image, to_gray_image, validate_odd_kernel};

/// Parameters for the median filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedianParams {
    /// Square window side (odd, >= 1)
    pub kernel_size: usize,
}

impl Default for MedianParams {
    fn default() -> Self {
        Self { kernel_size: 5 }
    }
}

/// Median filter algorithm
#[derive(Debug, Clone, Default)]
pub struct Median;

impl Algorithm for Median {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = MedianParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Median"
    }

    fn description(&self) -> &'static str {
        "Median filter over a square window with replicated borders"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        median(&input, params.kernel_size)
    }
}

/// Apply a median filter with a `kernel_size` x `kernel_size` window.
///
/// Fails with [`Error::InvalidParameter`] for zero or even sizes.
pub fn median(buffer: &PixelBuffer, kernel_size: usize) -> Result<PixelBuffer> {
    validate_odd_kernel("kernel_size", kernel_size)?;
    buffer.ensure_not_empty()?;
    if kernel_size == 1 {
        return Ok(buffer.clone());
    }
    let radius = (kernel_size / 2) as u32;
    let image = to_gray_image(buffer)?;
    from_gray_image(imageproc::filter::median_filter(&image, radius, radius))
}
