//! # Despeckle Algorithms
//!
//! Speckle removal and filter comparison for 8-bit grayscale images.
//!
//! ## Available Algorithm Categories
//!
//! - **speckle**: Crimmins iterative directional speckle removal
//! - **morphology**: Erosion, dilation, opening, closing, top-hat
//! - **smoothing**: Median and bilateral filters
//! - **compare**: Filter bank, difference images, comparison reports
//! - **intensity**: Inversion and polarity normalization

pub(crate) mod maybe_rayon;

pub mod compare;
pub mod intensity;
pub mod morphology;
pub mod smoothing;
pub mod speckle;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::compare::{
        compare, difference, run_filters, default_strategies, ComparisonReport,
        CompositeParams, FilterBank, FilterResult, FilterStage, FilterStrategy,
    };
    pub use crate::morphology::{closing, opening, top_hat, StructuringElement};
    pub use crate::smoothing::{bilateral, median, BilateralParams, MedianParams};
    pub use crate::speckle::{
        adjust, speckle_filter, speckle_filter_with, CrimminsParams, Direction, PassSchedule,
        Polarity,
    };
    pub use despeckle_core::prelude::*;
}
