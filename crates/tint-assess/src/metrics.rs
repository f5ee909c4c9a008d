//! Summary statistics over a match outcome.

use crate::error::{AssessError, Result};
use crate::matcher::MatchOutcome;

/// Correspondence metrics for one channel group.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeMetrics {
    /// Threshold events the sorter detected at least once.
    pub found_by_sorter: usize,
    /// Threshold events the sorter split into multiple detections.
    pub multiple_matches: usize,
    /// Mean over matched buckets of the per-bucket summed absolute offsets.
    pub mean_abs_offset: f64,
    /// Standard error of the per-bucket summed signed offsets.
    pub stderr_offset: f64,
}

/// Compute summary statistics from a match outcome.
///
/// Only buckets with at least one match contribute to the offset
/// statistics; missed events are visible as the difference between the
/// bucket count and `found_by_sorter`.
///
/// # Errors
///
/// [`AssessError::EmptyInput`] when no bucket has a match at all. The
/// offsets have no mean in that case and the condition must reach the
/// caller instead of degrading to NaN.
pub fn summarize(outcome: &MatchOutcome) -> Result<SpikeMetrics> {
    let summed_offsets: Vec<f64> = outcome
        .matched_buckets()
        .map(|bucket| bucket.summed_offset() as f64)
        .collect();
    if summed_offsets.is_empty() {
        return Err(AssessError::EmptyInput);
    }

    let count = summed_offsets.len();
    let abs_total: f64 = outcome
        .matched_buckets()
        .map(|bucket| bucket.summed_abs_offset() as f64)
        .sum();
    let multiple_matches = outcome
        .buckets
        .iter()
        .filter(|bucket| bucket.is_split())
        .count();

    let mean = summed_offsets.iter().sum::<f64>() / count as f64;
    let variance = summed_offsets
        .iter()
        .map(|offset| (offset - mean).powi(2))
        .sum::<f64>()
        / count as f64;
    let stderr_offset = variance.sqrt() / (count as f64).sqrt();

    Ok(SpikeMetrics {
        found_by_sorter: count,
        multiple_matches,
        mean_abs_offset: abs_total / count as f64,
        stderr_offset,
    })
}
