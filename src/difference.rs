//! Elementwise image differences and the statistics reported over them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VisualizerError};
use crate::image_data::{FloatImage, load_image};
use crate::stats::{ChannelReport, ReportKind};

/// How two corresponding samples are combined into a difference sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DiffMethod {
    /// `first - second`
    #[default]
    Signed,
    /// `|first - second|`
    Absolute,
}

impl DiffMethod {
    pub fn apply(self, first: f64, second: f64) -> f64 {
        match self {
            DiffMethod::Signed => first - second,
            DiffMethod::Absolute => (first - second).abs(),
        }
    }
}

pub fn ensure_same_shape(first: &FloatImage, second: &FloatImage) -> Result<()> {
    if first.shape() != second.shape() {
        return Err(VisualizerError::ShapeMismatch {
            left: first.shape(),
            right: second.shape(),
        });
    }
    Ok(())
}

/// Difference image of two equally shaped images.
pub fn difference_image(
    first: &FloatImage,
    second: &FloatImage,
    method: DiffMethod,
) -> Result<FloatImage> {
    ensure_same_shape(first, second)?;
    debug!(shape = %first.shape(), ?method, "computing difference image");
    let data = first
        .samples()
        .iter()
        .zip(second.samples())
        .map(|(&a, &b)| method.apply(a, b))
        .collect();
    FloatImage::from_raw(first.rows(), first.cols(), data)
}

/// Per-channel statistics of the difference between two images.
pub fn analyze_differences(
    first: &FloatImage,
    second: &FloatImage,
    method: DiffMethod,
) -> Result<ChannelReport> {
    let diff = difference_image(first, second, method)?;
    ChannelReport::from_image(&diff, ReportKind::Difference)
}

/// Loads both files and reports the statistics of their difference.
pub fn analyze_image_differences<P, Q>(
    first: P,
    second: Q,
    method: DiffMethod,
) -> Result<ChannelReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let first = load_image(first)?;
    let second = load_image(second)?;
    analyze_differences(&first, &second, method)
}
