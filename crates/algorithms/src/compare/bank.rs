//! Filter bank: run many strategies against one input
//!
//! Strategies are independent, so they run in parallel when the
//! `parallel` feature is on. A failing strategy is recorded and skipped;
//! the others still produce output.

use std::time::Instant;

use crate::maybe_rayon::*;
use despeckle_core::raster::PixelBuffer;
use despeckle_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::report::{compare_result, ComparisonReport};
use super::strategy::{default_strategies, FilterStrategy};

/// Outputs of running a set of strategies, in strategy order
#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    outputs: Vec<(String, PixelBuffer)>,
    failures: Vec<(String, Error)>,
}

impl FilterResult {
    /// Successful `(label, output)` pairs
    pub fn outputs(&self) -> &[(String, PixelBuffer)] {
        &self.outputs
    }

    /// `(label, error)` pairs for strategies that failed
    pub fn failures(&self) -> &[(String, Error)] {
        &self.failures
    }

    /// Output for a label, if that strategy succeeded
    pub fn get(&self, label: &str) -> Option<&PixelBuffer> {
        self.outputs
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, buffer)| buffer)
    }

    /// Error for a label, if that strategy failed
    pub fn failure(&self, label: &str) -> Option<&Error> {
        self.failures
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, err)| err)
    }

    /// Labels of successful outputs, in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|(l, _)| l.as_str())
    }

    /// True when no strategy failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Split into outputs and failures
    pub fn into_parts(self) -> (Vec<(String, PixelBuffer)>, Vec<(String, Error)>) {
        (self.outputs, self.failures)
    }
}

/// Run every strategy against `buffer`.
///
/// Never fails as a whole: each strategy either contributes an output or
/// a recorded error.
pub fn run_filters(buffer: &PixelBuffer, strategies: &[FilterStrategy]) -> FilterResult {
    let results: Vec<(String, Result<PixelBuffer>)> = strategies
        .into_par_iter()
        .map(|strategy| {
            let start = Instant::now();
            let outcome = strategy.apply(buffer);
            debug!(
                strategy = %strategy.label,
                stages = strategy.stages.len(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
                ok = outcome.is_ok(),
                "strategy finished"
            );
            (strategy.label.clone(), outcome)
        })
        .collect();

    let mut result = FilterResult::default();
    for (label, outcome) in results {
        match outcome {
            Ok(output) => result.outputs.push((label, output)),
            Err(err) => {
                warn!(strategy = %label, error = %err, "strategy failed");
                result.failures.push((label, err));
            }
        }
    }
    result
}

/// An ordered, serializable set of strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterBank {
    strategies: Vec<FilterStrategy>,
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

impl FilterBank {
    /// Bank over the given strategies
    pub fn new(strategies: Vec<FilterStrategy>) -> Self {
        Self { strategies }
    }

    /// Bank with no strategies
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Append a strategy
    pub fn push(&mut self, strategy: FilterStrategy) -> &mut Self {
        self.strategies.push(strategy);
        self
    }

    /// Strategies in run order
    pub fn strategies(&self) -> &[FilterStrategy] {
        &self.strategies
    }

    /// Run all strategies against `buffer`
    pub fn run(&self, buffer: &PixelBuffer) -> FilterResult {
        run_filters(buffer, &self.strategies)
    }

    /// Run all strategies and score each output against `buffer`
    pub fn compare(&self, buffer: &PixelBuffer) -> Result<ComparisonReport> {
        compare_result(buffer, self.run(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoothing::median;
    use crate::speckle::speckle_filter;

    fn textured(rows: usize, cols: usize) -> PixelBuffer {
        let data = (0..rows * cols).map(|i| ((i * 53 + i / 5 * 7) % 256) as u8).collect();
        PixelBuffer::from_vec(data, rows, cols).unwrap()
    }

    #[test]
    fn test_default_bank_runs_all() {
        let input = textured(20, 24);
        let result = FilterBank::default().run(&input);
        assert!(result.is_complete());
        let labels: Vec<_> = result.labels().collect();
        assert_eq!(labels, ["median", "bilateral", "crimmins", "composite"]);
        for (label, output) in result.outputs() {
            assert_eq!(output.shape(), input.shape(), "{} changed shape", label);
        }
        assert_eq!(result.get("crimmins").unwrap(), &speckle_filter(&input, 3).unwrap());
    }

    #[test]
    fn test_failure_is_isolated() {
        let input = textured(10, 10);
        let strategies = vec![
            FilterStrategy::median(0),
            FilterStrategy::bilateral(5, 75.0, 15.0),
        ];
        let result = run_filters(&input, &strategies);

        assert_eq!(result.outputs().len(), 1);
        assert!(result.get("bilateral").is_some());
        assert!(result.get("median").is_none());
        assert!(matches!(
            result.failure("median"),
            Some(Error::InvalidParameter { .. })
        ));
        assert!(!result.is_complete());
    }

    #[test]
    fn test_order_follows_strategies() {
        let input = textured(9, 9);
        let strategies = vec![
            FilterStrategy::speckle(1).with_label("c1"),
            FilterStrategy::median(3).with_label("m3"),
            FilterStrategy::speckle(0).with_label("c0"),
        ];
        let result = run_filters(&input, &strategies);
        let labels: Vec<_> = result.labels().collect();
        assert_eq!(labels, ["c1", "m3", "c0"]);
        assert_eq!(result.get("m3").unwrap(), &median(&input, 3).unwrap());
        assert_eq!(result.get("c0").unwrap(), &input);
    }

    #[test]
    fn test_empty_bank() {
        let result = FilterBank::empty().run(&textured(3, 3));
        assert!(result.outputs().is_empty());
        assert!(result.is_complete());
    }

    #[test]
    fn test_bank_json() {
        let mut bank = FilterBank::empty();
        bank.push(FilterStrategy::speckle(2));
        let json = serde_json::to_string(&bank).unwrap();
        assert!(json.starts_with('['));
        let back: FilterBank = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bank);
    }
}
