//! Mathematical morphology over 8-bit images
//!
//! - **Erosion**: minimum filter (shrinks bright regions)
//! - **Dilation**: maximum filter (expands bright regions)
//! - **Opening**: erosion then dilation (removes small bright features)
//! - **Closing**: dilation then erosion (fills small dark gaps)
//! - **Top-hat / black-hat**: residues of opening and closing

mod closing;
mod dilate;
mod element;
mod erode;
mod opening;
mod tophat;

pub use closing::{closing, Closing, ClosingParams};
pub use dilate::{dilate, Dilate, DilateParams};
pub use element::StructuringElement;
pub use erode::{erode, Erode, ErodeParams};
pub use opening::{opening, Opening, OpeningParams};
pub use tophat::{black_hat, top_hat, BlackHat, BlackHatParams, TopHat, TopHatParams};
