//! Diagnostic plots for comparing images: smoothed RGB histograms, difference
//! figures with per-channel statistics, and channel distribution views.

pub mod config;
pub mod difference;
pub mod driver;
pub mod error;
pub mod histogram;
pub mod image_data;
pub mod logging;
pub mod render;
pub mod stats;

pub use config::{DifferencePlotConfig, DistributionPlotConfig, HistogramPlotConfig, QUAD_LABELS};
pub use difference::{DiffMethod, analyze_differences, analyze_image_differences, difference_image};
pub use error::{Result, VisualizerError};
pub use histogram::{Histogram, smoothed_channel_histograms};
pub use image_data::{Channel, FloatImage, ImageShape, load_image};
pub use stats::{ChannelReport, ChannelStats, ReportKind};
