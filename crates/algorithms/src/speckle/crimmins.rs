//! Crimmins complementary-hulling speckle filter
//!
//! One step runs the four dark passes, then the four light passes. The
//! filter repeats that step a fixed number of times with no convergence
//! test.

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::adjust::{adjust, adjust_accumulated};
use super::direction::{Direction, Polarity};

/// How the four directions of one polarity are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassSchedule {
    /// Each direction reads the output of the previous one:
    /// N-S, E-W, NW-SE, NE-SW
    #[default]
    Sequential,
    /// All four directions read the same snapshot and their nudges are
    /// summed before clamping
    Accumulated,
}

/// Parameters for the Crimmins speckle filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrimminsParams {
    /// Number of full dark+light steps (0 returns a copy of the input)
    pub iterations: usize,
    /// Direction composition within a polarity
    pub schedule: PassSchedule,
}

impl Default for CrimminsParams {
    fn default() -> Self {
        Self {
            iterations: 3,
            schedule: PassSchedule::Sequential,
        }
    }
}

/// Crimmins speckle removal algorithm
#[derive(Debug, Clone, Default)]
pub struct Crimmins;

impl Algorithm for Crimmins {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = CrimminsParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Crimmins"
    }

    fn description(&self) -> &'static str {
        "Iterative directional speckle removal (Crimmins complementary hulling)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        speckle_filter_with(&input, &params)
    }
}

/// Run one full adjustment step: all dark passes, then all light passes.
pub fn adjust_step(buffer: &PixelBuffer, schedule: PassSchedule) -> Result<PixelBuffer> {
    let mut current = buffer.clone();
    for polarity in Polarity::ALL {
        current = match schedule {
            PassSchedule::Sequential => {
                let mut pass = current;
                for direction in Direction::ALL {
                    pass = adjust(&pass, direction, polarity)?;
                }
                pass
            }
            PassSchedule::Accumulated => adjust_accumulated(&current, polarity)?,
        };
    }
    Ok(current)
}

/// Apply the Crimmins filter for `iterations` sequential steps.
///
/// Uses [`PassSchedule::Sequential`].
pub fn speckle_filter(buffer: &PixelBuffer, iterations: usize) -> Result<PixelBuffer> {
    speckle_filter_with(
        buffer,
        &CrimminsParams {
            iterations,
            ..CrimminsParams::default()
        },
    )
}

/// Apply the Crimmins filter with explicit parameters.
///
/// Each step's output is the next step's input. Zero iterations returns
/// an independent copy of `buffer`.
pub fn speckle_filter_with(buffer: &PixelBuffer, params: &CrimminsParams) -> Result<PixelBuffer> {
    buffer.ensure_not_empty()?;
    let mut current = buffer.clone();
    for iteration in 0..params.iterations {
        current = adjust_step(&current, params.schedule)?;
        debug!(
            iteration = iteration + 1,
            total = params.iterations,
            schedule = ?params.schedule,
            "crimmins step complete"
        );
    }
    Ok(current)
}
