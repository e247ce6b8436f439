//! Figure parameters. Sizes are in pixels (100 px per inch of the usual figure sizes).

use crate::difference::DiffMethod;
use crate::histogram::DEFAULT_BINS;

pub const DISTRIBUTION_BINS: usize = 50;

/// Default captions for the four-image comparison, in argument order.
pub const QUAD_LABELS: [&str; 4] = ["Original", "OT", "Linear", "Var"];

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPlotConfig {
    pub bins: usize,
    pub size: (u32, u32),
}

impl Default for HistogramPlotConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            size: (1000, 600),
        }
    }
}

impl HistogramPlotConfig {
    /// Two panels side by side.
    pub fn pair() -> Self {
        Self {
            size: (1500, 500),
            ..Self::default()
        }
    }

    /// Images over histograms, four columns.
    pub fn quad() -> Self {
        Self {
            size: (2000, 800),
            ..Self::default()
        }
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DifferencePlotConfig {
    pub bins: usize,
    pub size: (u32, u32),
    pub method: DiffMethod,
}

impl Default for DifferencePlotConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            size: (1500, 1000),
            method: DiffMethod::default(),
        }
    }
}

impl DifferencePlotConfig {
    pub fn with_method(mut self, method: DiffMethod) -> Self {
        self.method = method;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionPlotConfig {
    pub bins: usize,
    pub size: (u32, u32),
}

impl Default for DistributionPlotConfig {
    fn default() -> Self {
        Self {
            bins: DISTRIBUTION_BINS,
            size: (1500, 500),
        }
    }
}
