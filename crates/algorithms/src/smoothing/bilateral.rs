//! Bilateral filter

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

use super::{from_gray_image, to_gray_image, validate_odd_kernel};

/// Parameters for the bilateral filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BilateralParams {
    /// Window diameter (odd, >= 1)
    pub kernel_size: usize,
    /// Gaussian sigma in intensity space
    pub sigma_color: f32,
    /// Gaussian sigma in pixel space
    pub sigma_space: f32,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            kernel_size: 15,
            sigma_color: 75.0,
            sigma_space: 15.0,
        }
    }
}

impl BilateralParams {
    /// Validate window size and sigmas
    pub fn validate(&self) -> Result<()> {
        validate_odd_kernel("kernel_size", self.kernel_size)?;
        for (name, sigma) in [("sigma_color", self.sigma_color), ("sigma_space", self.sigma_space)] {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(Error::invalid_parameter(name, sigma, "sigma must be positive and finite"));
            }
        }
        Ok(())
    }
}

/// Bilateral filter algorithm
#[derive(Debug, Clone, Default)]
pub struct Bilateral;

impl Algorithm for Bilateral {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = BilateralParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Bilateral"
    }

    fn description(&self) -> &'static str {
        "Edge-preserving bilateral filter"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        bilateral(&input, &params)
    }
}

/// Apply an edge-preserving bilateral filter.
///
/// `kernel_size` is the window diameter; the library call takes the
/// radius `kernel_size / 2`.
pub fn bilateral(buffer: &PixelBuffer, params: &BilateralParams) -> Result<PixelBuffer> {
    params.validate()?;
    buffer.ensure_not_empty()?;
    if params.kernel_size == 1 {
        return Ok(buffer.clone());
    }
    let radius = (params.kernel_size / 2) as u32;
    let image = to_gray_image(buffer)?;
    from_gray_image(imageproc::filter::bilateral_filter(
        &image,
        radius,
        params.sigma_color,
        params.sigma_space,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilateral_constant_stays_flat() {
        let input = PixelBuffer::filled(12, 12, 128);
        let out = bilateral(&input, &BilateralParams::default()).unwrap();
        assert_eq!(out.shape(), (12, 12));
        for &v in out.data().iter() {
            assert!((127..=128).contains(&v), "got {}", v);
        }
    }

    #[test]
    fn test_bilateral_rejects_even_kernel() {
        let input = PixelBuffer::filled(4, 4, 0);
        let params = BilateralParams {
            kernel_size: 14,
            ..BilateralParams::default()
        };
        assert!(matches!(
            bilateral(&input, &params),
            Err(Error::InvalidParameter { name: "kernel_size", .. })
        ));
    }

    #[test]
    fn test_bilateral_rejects_bad_sigma() {
        let params = BilateralParams {
            sigma_color: 0.0,
            ..BilateralParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidParameter { name: "sigma_color", .. })
        ));
        let params = BilateralParams {
            sigma_space: f32::NAN,
            ..BilateralParams::default()
        };
        assert!(params.validate().is_err());
    }
}
