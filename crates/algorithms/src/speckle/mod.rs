//! Crimmins speckle removal
//!
//! - **direction**: the four scan axes and dark/light polarity
//! - **adjust**: a single directional pass
//! - **crimmins**: the iterated dark-then-light filter

mod adjust;
mod crimmins;
mod direction;

pub use adjust::{adjust, adjust_accumulated};
pub use crimmins::{
    adjust_step, speckle_filter, speckle_filter_with, Crimmins, CrimminsParams, PassSchedule,
};
pub use direction::{Direction, Polarity};
