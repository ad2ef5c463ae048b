//! Equal-width histogram binning
//!
//! Bins are half-open `[edge_i, edge_i+1)` except the last, which also
//! includes the maximum value, so every finite input lands in exactly one bin.

use crate::{Error, Result};

/// Frequency counts over equal-width bins
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

impl Histogram {
    /// Bin finite values into `bins` equal-width bins spanning `[min, max]`
    ///
    /// Non-finite values are ignored. With no data the range is `[0, 1]`;
    /// with a single distinct value it is widened to `[v - 0.5, v + 0.5]`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `bins` is zero
    #[allow(
        clippy::cast_precision_loss,
        clippy::float_cmp,
        clippy::suboptimal_flops
    )]
    pub fn from_values(values: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidInput(
                "Histogram requires at least one bin".to_string(),
            ));
        }

        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (mut lo, mut hi) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if finite.is_empty() {
            (lo, hi) = (0.0, 1.0);
        } else if lo == hi {
            (lo, hi) = (lo - 0.5, hi + 0.5);
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
        edges[bins] = hi;

        let mut counts = vec![0u64; bins];
        for v in finite {
            let bin = edges.partition_point(|&edge| edge <= v).saturating_sub(1);
            counts[bin.min(bins - 1)] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// Number of bins
    #[must_use]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Bin edges (`bins + 1` values, ascending)
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Frequency count per bin
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of binned values
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(start, end)` of bin `index`
    #[must_use]
    pub fn bin_range(&self, index: usize) -> Option<(f64, f64)> {
        (index < self.bins()).then(|| (self.edges[index], self.edges[index + 1]))
    }
}
