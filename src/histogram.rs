//! Per-channel intensity histograms and the fixed moving-average smoothing.

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, VisualizerError};
use crate::image_data::{Channel, FloatImage};

pub const DEFAULT_BINS: usize = 256;

/// Width of the moving-average kernel. Each tap weighs `1 / SMOOTHING_WINDOW`.
pub const SMOOTHING_WINDOW: usize = 5;

/// An empirical distribution: one frequency per bin center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bin_centers: Vec<f64>,
    pub frequencies: Vec<f64>,
    pub bin_width: f64,
}

impl Histogram {
    /// Histogram over `[min, max]` of the finite samples whose frequencies sum to 1.
    pub fn normalized(samples: &[f64], bins: usize) -> Result<Self> {
        let (lo, width, counts) = bin_counts(samples, bins)?;
        let total: u64 = counts.iter().sum();
        Ok(Self::from_counts(lo, width, &counts, total as f64))
    }

    /// Histogram whose bar areas sum to 1.
    pub fn density(samples: &[f64], bins: usize) -> Result<Self> {
        let (lo, width, counts) = bin_counts(samples, bins)?;
        let total: u64 = counts.iter().sum();
        Ok(Self::from_counts(lo, width, &counts, total as f64 * width))
    }

    fn from_counts(lo: f64, width: f64, counts: &[u64], scale: f64) -> Self {
        let bin_centers = (0..counts.len())
            .map(|i| lo + width * (i as f64 + 0.5))
            .collect();
        let frequencies = counts.iter().map(|&c| c as f64 / scale).collect();
        Self {
            bin_centers,
            frequencies,
            bin_width: width,
        }
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Applies the valid-region moving average. The result is shorter by
    /// `SMOOTHING_WINDOW - 1`; bin centers drop two entries from each end so
    /// they stay aligned with the averaged frequencies.
    pub fn smoothed(&self) -> Result<Self> {
        if self.len() < SMOOTHING_WINDOW {
            return Err(VisualizerError::TooFewBins {
                bins: self.len(),
                min: SMOOTHING_WINDOW,
            });
        }
        let half = SMOOTHING_WINDOW / 2;
        let frequencies = self
            .frequencies
            .windows(SMOOTHING_WINDOW)
            .map(|w| w.iter().sum::<f64>() / SMOOTHING_WINDOW as f64)
            .collect();
        let bin_centers = self.bin_centers[half..self.len() - half].to_vec();
        Ok(Self {
            bin_centers,
            frequencies,
            bin_width: self.bin_width,
        })
    }

    /// Left edge of the first bin and right edge of the last one.
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.bin_centers.first()?;
        let last = self.bin_centers.last()?;
        Some((first - self.bin_width / 2.0, last + self.bin_width / 2.0))
    }

    pub fn max_frequency(&self) -> f64 {
        self.frequencies.iter().copied().fold(0.0, f64::max)
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bin_centers
            .iter()
            .copied()
            .zip(self.frequencies.iter().copied())
    }
}

/// Smoothed normalized histograms for the red, green, and blue channels.
pub fn smoothed_channel_histograms(
    image: &FloatImage,
    bins: usize,
) -> Result<Vec<(Channel, Histogram)>> {
    if bins < SMOOTHING_WINDOW {
        return Err(VisualizerError::TooFewBins {
            bins,
            min: SMOOTHING_WINDOW,
        });
    }
    debug!(bins, shape = %image.shape(), "computing smoothed channel histograms");
    Channel::ALL
        .iter()
        .map(|&channel| {
            let hist = Histogram::normalized(&image.channel(channel), bins)?.smoothed()?;
            Ok((channel, hist))
        })
        .collect()
}

/// Counts finite samples into `bins` equal-width bins spanning their range.
/// A constant input is spread over `[v - 0.5, v + 0.5]`.
fn bin_counts(samples: &[f64], bins: usize) -> Result<(f64, f64, Vec<u64>)> {
    if bins == 0 {
        return Err(VisualizerError::TooFewBins { bins, min: 1 });
    }
    let (mut lo, mut hi) = samples
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return Err(VisualizerError::NoSamples);
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0u64; bins];
    for v in samples.iter().copied().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / (hi - lo)) * bins as f64) as usize;
        counts[idx.min(bins - 1)] += 1;
    }
    Ok((lo, width, counts))
}
