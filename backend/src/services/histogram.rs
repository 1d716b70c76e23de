//! Popularity histogram over `log_views`.
//!
//! Binning follows the usual equal-width scheme: edges are a linspace over
//! the observed range, every bin is half-open except the last, and a
//! degenerate range (all values equal) is widened by 0.5 on each side.
//! Zero-view items are left out entirely.

use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use crate::models::{AbsoluteRange, Collection};

/// Opacity of bins inside the selected range.
pub const SELECTED_OPACITY: f64 = 1.0;
/// Opacity of bins outside or straddling the selected range.
pub const UNSELECTED_OPACITY: f64 = 0.4;

/// One histogram bar, derived on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub center: f64,
    pub count: usize,
    /// `[left, right]` lies completely inside the selected range
    pub selected: bool,
    pub opacity: f64,
    /// `round(2^left)`, for hover labels only
    pub views_low: u64,
    /// `round(2^right)`, for hover labels only
    pub views_high: u64,
}

/// Inverse of the log transform, rounded half to even for display.
pub fn display_views(log_value: f64) -> u64 {
    log_value.exp2().round_ties_even() as u64
}

/// `num + 1` evenly spaced edges from `start` to `stop`, with the last edge
/// exactly `stop`.
pub fn linspace_edges(start: f64, stop: f64, num: usize) -> Vec<f64> {
    let step = (stop - start) / num as f64;
    let mut edges: Vec<f64> = (0..=num).map(|i| start + i as f64 * step).collect();
    if let Some(last) = edges.last_mut() {
        *last = stop;
    }
    edges
}

/// Bin edges and counts for `values`.
///
/// Returns `None` for empty input.
pub fn bin_counts(values: &[f64], bins: usize) -> Option<(Vec<f64>, Vec<usize>)> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let (mut first, mut last) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if first == last {
        first -= 0.5;
        last += 0.5;
    }

    let edges = linspace_edges(first, last, bins);
    let norm = bins as f64 / (last - first);
    let mut counts = vec![0usize; bins];

    for &v in values {
        // Scaled guess, then corrected against the actual edges.
        let mut idx = (((v - first) * norm) as usize).min(bins - 1);
        if idx > 0 && v < edges[idx] {
            idx -= 1;
        } else if idx < bins - 1 && v >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Some((edges, counts))
}

/// Histogram of the non-zero-view items of `collection`.
///
/// An empty result means nothing is binnable (no items, or all zero-view);
/// that is a valid, empty histogram.
pub fn compute(
    collection: &Collection,
    bins: usize,
    range: AbsoluteRange,
) -> PipelineResult<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(PipelineError::InvalidRange(
            "histogram needs at least one bin".to_string(),
        ));
    }

    let values: Vec<f64> = collection
        .iter()
        .filter(|item| item.views() > 0)
        .map(|item| item.log_views())
        .collect();

    let Some((edges, counts)) = bin_counts(&values, bins) else {
        log::debug!("No binnable items among {}", collection.len());
        return Ok(Vec::new());
    };

    Ok(edges
        .windows(2)
        .zip(counts)
        .map(|(pair, count)| {
            let (left, right) = (pair[0], pair[1]);
            let selected = range.covers(left, right);
            HistogramBin {
                left,
                right,
                center: 0.5 * (left + right),
                count,
                selected,
                opacity: if selected {
                    SELECTED_OPACITY
                } else {
                    UNSELECTED_OPACITY
                },
                views_low: display_views(left),
                views_high: display_views(right),
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "histogram_tests.rs"]
mod tests;
