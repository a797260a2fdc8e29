//! Scoring filter outputs against their input

use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Error, Result};
use serde::Serialize;

use super::bank::{run_filters, FilterResult};
use super::difference::{absolute_difference, normalize_min_max, stats_of, DifferenceStats};
use super::strategy::FilterStrategy;

/// One strategy's output together with what it removed
#[derive(Debug, Clone)]
pub struct StrategyComparison {
    /// Strategy label
    pub label: String,
    /// Filtered image
    pub output: PixelBuffer,
    /// Normalized `|input - output|`
    pub difference: PixelBuffer,
    /// Raw difference statistics
    pub stats: DifferenceStats,
}

/// Serializable per-strategy line of a report
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub label: String,
    #[serde(flatten)]
    pub stats: DifferenceStats,
}

/// Serializable record of a failed strategy
#[derive(Debug, Clone, Serialize)]
pub struct FailureSummary {
    pub label: String,
    pub error: String,
}

/// Outputs, difference images and statistics for every strategy
#[derive(Debug, Clone, Default)]
pub struct ComparisonReport {
    entries: Vec<StrategyComparison>,
    failures: Vec<(String, Error)>,
}

impl ComparisonReport {
    /// Successful comparisons, in strategy order
    pub fn entries(&self) -> &[StrategyComparison] {
        &self.entries
    }

    /// Strategies that failed to produce an output
    pub fn failures(&self) -> &[(String, Error)] {
        &self.failures
    }

    /// Comparison for one label
    pub fn get(&self, label: &str) -> Option<&StrategyComparison> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Statistics for every successful strategy
    pub fn summaries(&self) -> Vec<ComparisonSummary> {
        self.entries
            .iter()
            .map(|e| ComparisonSummary {
                label: e.label.clone(),
                stats: e.stats,
            })
            .collect()
    }

    /// Failures as label/message pairs
    pub fn failure_summaries(&self) -> Vec<FailureSummary> {
        self.failures
            .iter()
            .map(|(label, err)| FailureSummary {
                label: label.clone(),
                error: err.to_string(),
            })
            .collect()
    }
}

/// Run `strategies` on `buffer` and score each output.
pub fn compare(buffer: &PixelBuffer, strategies: &[FilterStrategy]) -> Result<ComparisonReport> {
    compare_result(buffer, run_filters(buffer, strategies))
}

pub(crate) fn compare_result(input: &PixelBuffer, result: FilterResult) -> Result<ComparisonReport> {
    let (outputs, failures) = result.into_parts();
    let entries = outputs
        .into_iter()
        .map(|(label, output)| -> Result<StrategyComparison> {
            let diff = absolute_difference(input, &output)?;
            Ok(StrategyComparison {
                label,
                difference: normalize_min_max(&diff),
                stats: stats_of(&diff),
                output,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ComparisonReport { entries, failures })
}
