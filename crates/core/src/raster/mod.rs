//! Raster data structures and operations

mod element;
mod grid;
mod neighborhood;

pub use element::RasterElement;
pub use grid::{PixelBuffer, Raster, RasterStatistics};
pub use neighborhood::Neighborhood;
