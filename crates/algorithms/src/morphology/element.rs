//! Structuring element definitions for morphological operations
//!
//! A structuring element defines the neighborhood shape used in
//! erosion, dilation, and derived transforms.

use despeckle_core::raster::Neighborhood;
use despeckle_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Shape of a structuring element for morphological operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuringElement {
    /// Square element of given radius (side = 2*radius + 1)
    Square(usize),
    /// Cross (plus-shaped) element of given radius
    Cross(usize),
    /// Disk element of given radius
    Disk(usize),
}

impl Default for StructuringElement {
    fn default() -> Self {
        StructuringElement::Square(1)
    }
}

impl StructuringElement {
    /// Square element from its side length, which must be odd and positive
    pub fn square_side(side: usize) -> Result<Self> {
        if side == 0 {
            return Err(Error::invalid_parameter(
                "kernel_size",
                side,
                "structuring element side must be positive",
            ));
        }
        if side % 2 == 0 {
            return Err(Error::invalid_parameter(
                "kernel_size",
                side,
                "structuring element side must be odd",
            ));
        }
        Ok(StructuringElement::Square(side / 2))
    }

    /// Get the radius of the structuring element
    pub fn radius(&self) -> usize {
        match self {
            StructuringElement::Square(r)
            | StructuringElement::Cross(r)
            | StructuringElement::Disk(r) => *r,
        }
    }

    /// Side length of the bounding square
    pub fn side(&self) -> usize {
        self.radius() * 2 + 1
    }

    /// Compute (dr, dc) offsets relative to center for all active cells
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        match self {
            StructuringElement::Square(r) => Neighborhood::Square(*r).offsets(),
            StructuringElement::Disk(r) => Neighborhood::Circle(*r).offsets(),
            StructuringElement::Cross(r) => Neighborhood::Cross(*r).offsets(),
        }
    }
}
