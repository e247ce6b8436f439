//! Descriptive per-channel statistics and the text reports printed from them.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, VisualizerError};
use crate::image_data::{Channel, FloatImage};

/// Summary of one channel's samples. `std` is the population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
    pub min: f64,
    pub median: f64,
}

impl ChannelStats {
    pub fn compute(samples: &[f64]) -> Result<Self> {
        if samples.is_empty() {
            return Err(VisualizerError::NoSamples);
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Ok(Self {
            mean,
            std: variance.sqrt(),
            max: sorted[sorted.len() - 1],
            min: sorted[0],
            median,
        })
    }

    /// Labelled values in report order.
    pub fn measures(&self) -> [(&'static str, f64); 5] {
        [
            ("Mean", self.mean),
            ("Std", self.std),
            ("Max", self.max),
            ("Min", self.min),
            ("Median", self.median),
        ]
    }
}

/// Which report layout a [`ChannelReport`] prints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Difference,
    Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelEntry {
    pub channel: Channel,
    pub stats: ChannelStats,
}

/// Statistics for the red, green, and blue channels of one image, in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub kind: ReportKind,
    pub channels: Vec<ChannelEntry>,
}

impl ChannelReport {
    pub fn from_image(image: &FloatImage, kind: ReportKind) -> Result<Self> {
        let channels = Channel::ALL
            .iter()
            .map(|&channel| {
                Ok(ChannelEntry {
                    channel,
                    stats: ChannelStats::compute(&image.channel(channel))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { kind, channels })
    }

    pub fn get(&self, channel: Channel) -> Option<&ChannelStats> {
        self.channels
            .iter()
            .find(|e| e.channel == channel)
            .map(|e| &e.stats)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn fmt_difference(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image Difference Statistics:")?;
        writeln!(f, "{}", "-".repeat(50))?;
        for entry in &self.channels {
            writeln!(f)?;
            writeln!(f, "{} Channel:", entry.channel)?;
            for (label, value) in entry.stats.measures() {
                writeln!(f, "{label:>10}: {value:.4}")?;
            }
        }
        Ok(())
    }

    fn fmt_distribution(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |pick: fn(&ChannelStats) -> f64| {
            self.channels
                .iter()
                .map(|e| format!("{:.4}", pick(&e.stats)))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(f, "Channel Distribution Statistics:")?;
        writeln!(f, "Mean: [{}]", row(|s| s.mean))?;
        writeln!(f, "Std: [{}]", row(|s| s.std))?;
        writeln!(f, "Min: [{}]", row(|s| s.min))?;
        writeln!(f, "Max: [{}]", row(|s| s.max))
    }
}

impl fmt::Display for ChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReportKind::Difference => self.fmt_difference(f),
            ReportKind::Distribution => self.fmt_distribution(f),
        }
    }
}
