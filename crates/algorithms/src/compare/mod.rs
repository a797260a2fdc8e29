//! Filter comparison
//!
//! - **strategy**: labelled chains of filter stages
//! - **bank**: run a strategy set with per-strategy failure isolation
//! - **difference**: normalized absolute difference images
//! - **report**: outputs scored against the input

mod bank;
mod difference;
mod report;
mod strategy;

pub use bank::{run_filters, FilterBank, FilterResult};
pub use difference::{
    absolute_difference, difference, difference_stats, normalize_min_max, DifferenceStats,
};
pub use report::{
    compare, ComparisonReport, ComparisonSummary, FailureSummary, StrategyComparison,
};
pub use strategy::{
    default_strategies, morphology_strategies, CompositeParams, FilterStage, FilterStrategy,
};
