//! Named filter strategies built from ordered stages
//!
//! Every strategy is a chain of [`FilterStage`]s. Single filters are
//! one-stage chains; the composite method is the chain
//! speckle → opening → closing. New composites are new chains, not new
//! dispatch branches.

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::intensity::invert;
use crate::morphology::{black_hat, closing, dilate, erode, opening, top_hat, StructuringElement};
use crate::smoothing::{bilateral, median, validate_odd_kernel, BilateralParams};
use crate::speckle::{speckle_filter_with, CrimminsParams};

/// A single image-to-image step of a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum FilterStage {
    /// Median filter with an odd square window
    Median { kernel_size: usize },
    /// Bilateral filter
    Bilateral(BilateralParams),
    /// Crimmins speckle removal
    Speckle(CrimminsParams),
    /// Morphological opening with an odd square element
    Opening { kernel_size: usize },
    /// Morphological closing with an odd square element
    Closing { kernel_size: usize },
    /// Erosion with an arbitrary element
    Erode { element: StructuringElement },
    /// Dilation with an arbitrary element
    Dilate { element: StructuringElement },
    /// White top-hat (image minus opening)
    TopHat { element: StructuringElement },
    /// Black-hat (closing minus image)
    BlackHat { element: StructuringElement },
    /// Intensity inversion `255 - v`
    Invert,
}

impl FilterStage {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            FilterStage::Median { .. } => "median",
            FilterStage::Bilateral(_) => "bilateral",
            FilterStage::Speckle(_) => "speckle",
            FilterStage::Opening { .. } => "opening",
            FilterStage::Closing { .. } => "closing",
            FilterStage::Erode { .. } => "erode",
            FilterStage::Dilate { .. } => "dilate",
            FilterStage::TopHat { .. } => "tophat",
            FilterStage::BlackHat { .. } => "blackhat",
            FilterStage::Invert => "invert",
        }
    }

    /// Check parameters without touching any pixels
    pub fn validate(&self) -> Result<()> {
        match self {
            FilterStage::Median { kernel_size } => validate_odd_kernel("kernel_size", *kernel_size),
            FilterStage::Bilateral(params) => params.validate(),
            FilterStage::Speckle(_)
            | FilterStage::Erode { .. }
            | FilterStage::Dilate { .. }
            | FilterStage::TopHat { .. }
            | FilterStage::BlackHat { .. }
            | FilterStage::Invert => Ok(()),
            FilterStage::Opening { kernel_size } | FilterStage::Closing { kernel_size } => {
                StructuringElement::square_side(*kernel_size).map(|_| ())
            }
        }
    }

    /// Run the stage, producing a new buffer
    pub fn apply(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        match self {
            FilterStage::Median { kernel_size } => median(buffer, *kernel_size),
            FilterStage::Bilateral(params) => bilateral(buffer, params),
            FilterStage::Speckle(params) => speckle_filter_with(buffer, params),
            FilterStage::Opening { kernel_size } => {
                opening(buffer, &StructuringElement::square_side(*kernel_size)?)
            }
            FilterStage::Closing { kernel_size } => {
                closing(buffer, &StructuringElement::square_side(*kernel_size)?)
            }
            FilterStage::Erode { element } => erode(buffer, element),
            FilterStage::Dilate { element } => dilate(buffer, element),
            FilterStage::TopHat { element } => top_hat(buffer, element),
            FilterStage::BlackHat { element } => black_hat(buffer, element),
            FilterStage::Invert => Ok(invert(buffer)),
        }
    }
}

/// Parameters of the composite method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeParams {
    /// Crimmins iterations
    pub iterations: usize,
    /// Side of the square opening element
    pub opening_kernel: usize,
    /// Side of the square closing element
    pub closing_kernel: usize,
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self {
            iterations: 3,
            opening_kernel: 3,
            closing_kernel: 3,
        }
    }
}

/// A labelled chain of stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStrategy {
    /// Name of the output in a `FilterResult`
    pub label: String,
    /// Stages applied in order
    pub stages: Vec<FilterStage>,
}

impl FilterStrategy {
    /// Arbitrary chain of stages
    pub fn new(label: impl Into<String>, stages: Vec<FilterStage>) -> Self {
        Self {
            label: label.into(),
            stages,
        }
    }

    /// Median filter strategy
    pub fn median(kernel_size: usize) -> Self {
        Self::new("median", vec![FilterStage::Median { kernel_size }])
    }

    /// Bilateral filter strategy
    pub fn bilateral(kernel_size: usize, sigma_color: f32, sigma_space: f32) -> Self {
        Self::new(
            "bilateral",
            vec![FilterStage::Bilateral(BilateralParams {
                kernel_size,
                sigma_color,
                sigma_space,
            })],
        )
    }

    /// Crimmins speckle filter strategy
    pub fn speckle(iterations: usize) -> Self {
        Self::new(
            "crimmins",
            vec![FilterStage::Speckle(CrimminsParams {
                iterations,
                ..CrimminsParams::default()
            })],
        )
    }

    /// Speckle removal, then opening, then closing
    pub fn composite(params: &CompositeParams) -> Self {
        Self::new(
            "composite",
            vec![
                FilterStage::Speckle(CrimminsParams {
                    iterations: params.iterations,
                    ..CrimminsParams::default()
                }),
                FilterStage::Opening {
                    kernel_size: params.opening_kernel,
                },
                FilterStage::Closing {
                    kernel_size: params.closing_kernel,
                },
            ],
        )
    }

    /// Line enhancement: invert, then white top-hat with a disk of `radius`
    pub fn line_tophat(radius: usize) -> Self {
        Self::new(
            "tophat",
            vec![
                FilterStage::Invert,
                FilterStage::TopHat {
                    element: StructuringElement::Disk(radius),
                },
            ],
        )
    }

    /// Closing applied on the inverted image, then inverted back.
    ///
    /// Equivalent to an opening of the original; kept as a chain so the
    /// comparison shows the same stages the line-enhancement workflow uses.
    pub fn inverted_closing(kernel_size: usize) -> Self {
        Self::new(
            "inverted-closing",
            vec![
                FilterStage::Invert,
                FilterStage::Closing { kernel_size },
                FilterStage::Invert,
            ],
        )
    }

    /// Replace the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Validate every stage; an empty chain is rejected
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(Error::invalid_parameter(
                "stages",
                &self.label,
                "strategy must have at least one stage",
            ));
        }
        self.stages.iter().try_for_each(FilterStage::validate)
    }

    /// Validate, then run every stage in order.
    ///
    /// Validation happens up front so a bad late stage never leaves a
    /// half-computed result behind.
    pub fn apply(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        self.validate()?;
        buffer.ensure_not_empty()?;
        let mut current = buffer.clone();
        for stage in &self.stages {
            current = stage.apply(&current)?;
        }
        Ok(current)
    }
}

/// The tuned comparison set: median 5, bilateral 15/75/15, Crimmins 3,
/// composite 3/3/3.
pub fn default_strategies() -> Vec<FilterStrategy> {
    vec![
        FilterStrategy::median(5),
        FilterStrategy::bilateral(15, 75.0, 15.0),
        FilterStrategy::speckle(3),
        FilterStrategy::composite(&CompositeParams::default()),
    ]
}

/// Erosion, dilation, opening and closing with one odd square element.
///
/// Fails with `InvalidParameter` for a zero or even `kernel_size`.
pub fn morphology_strategies(kernel_size: usize) -> Result<Vec<FilterStrategy>> {
    let element = StructuringElement::square_side(kernel_size)?;
    Ok(vec![
        FilterStrategy::new(
            "erosion",
            vec![FilterStage::Erode {
                element: element.clone(),
            }],
        ),
        FilterStrategy::new("dilation", vec![FilterStage::Dilate { element }]),
        FilterStrategy::new("opening", vec![FilterStage::Opening { kernel_size }]),
        FilterStrategy::new("closing", vec![FilterStage::Closing { kernel_size }]),
    ])
}
