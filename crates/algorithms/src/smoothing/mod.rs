//! Library-grade smoothing filters
//!
//! Thin wrappers over `imageproc` that validate kernel parameters and
//! convert between [`PixelBuffer`] and `image::GrayImage`.

mod bilateral;
mod median;

pub use bilateral::{bilateral, Bilateral, BilateralParams};
pub use median::{median, Median, MedianParams};

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Error, Result};
use image::GrayImage;

/// Check that a window size is positive and odd
pub(crate) fn validate_odd_kernel(name: &'static str, size: usize) -> Result<()> {
    if size == 0 {
        return Err(Error::invalid_parameter(name, size, "kernel size must be positive"));
    }
    if size % 2 == 0 {
        return Err(Error::invalid_parameter(name, size, "kernel size must be odd"));
    }
    Ok(())
}

/// Copy a buffer into an `image` grayscale image
pub fn to_gray_image(buffer: &PixelBuffer) -> Result<GrayImage> {
    buffer.ensure_not_empty()?;
    let (rows, cols) = buffer.shape();
    GrayImage::from_raw(cols as u32, rows as u32, buffer.to_vec())
        .ok_or_else(|| Error::Other(format!("cannot build {}x{} gray image", cols, rows)))
}

/// Take ownership of a grayscale image as a buffer
pub fn from_gray_image(image: GrayImage) -> Result<PixelBuffer> {
    let (cols, rows) = image.dimensions();
    PixelBuffer::from_vec(image.into_raw(), rows as usize, cols as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_image_roundtrip_keeps_layout() {
        let buffer = PixelBuffer::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        let image = to_gray_image(&buffer).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [6]);
        assert_eq!(from_gray_image(image).unwrap(), buffer);
    }

    #[test]
    fn test_validate_odd_kernel() {
        assert!(validate_odd_kernel("kernel_size", 3).is_ok());
        assert!(validate_odd_kernel("kernel_size", 1).is_ok());
        assert!(validate_odd_kernel("kernel_size", 0).is_err());
        assert!(validate_odd_kernel("kernel_size", 6).is_err());
    }
}
