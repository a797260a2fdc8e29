//! Intensity preprocessing
//!
//! Polarity normalization applied before filtering, so that foreground
//! structures are bright on a dark background.

use despeckle_core::raster::PixelBuffer;

/// Mean above which [`auto_invert`] flips the image
pub const AUTO_INVERT_THRESHOLD: f64 = 127.0;

/// Bitwise-not of every sample (`255 - v`)
pub fn invert(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.map(|v| 255 - v)
}

/// Invert when the mean intensity exceeds [`AUTO_INVERT_THRESHOLD`].
///
/// Returns the possibly inverted image and whether it was inverted.
pub fn auto_invert(buffer: &PixelBuffer) -> (PixelBuffer, bool) {
    let mean = buffer.statistics().mean.unwrap_or(0.0);
    if mean > AUTO_INVERT_THRESHOLD {
        (invert(buffer), true)
    } else {
        (buffer.clone(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert() {
        let input = PixelBuffer::from_rows(&[[0, 255, 100]]).unwrap();
        assert_eq!(invert(&input), PixelBuffer::from_rows(&[[255, 0, 155]]).unwrap());
        assert_eq!(invert(&invert(&input)), input);
    }

    #[test]
    fn test_auto_invert_bright_background() {
        let mut input = PixelBuffer::filled(4, 4, 240);
        input.set(1, 1, 0).unwrap();
        let (out, inverted) = auto_invert(&input);
        assert!(inverted);
        assert_eq!(out.get(1, 1).unwrap(), 255);
    }

    #[test]
    fn test_auto_invert_dark_background() {
        let input = PixelBuffer::filled(4, 4, 127);
        let (out, inverted) = auto_invert(&input);
        assert!(!inverted);
        assert_eq!(out, input);
    }
}
