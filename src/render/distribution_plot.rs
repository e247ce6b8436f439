use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use super::{build_chart, draw_axes, finite_bounds, padded_range, prepare_figure};
use crate::config::DistributionPlotConfig;
use crate::error::{Result, VisualizerError};
use crate::histogram::Histogram;
use crate::image_data::{Channel, FloatImage};
use crate::stats::{ChannelReport, ReportKind};

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const MARKER_ALPHA: f64 = 0.1;
const MARKER_SIZE: i32 = 1;

/// Channel pairs shown by [`plot_2d_distributions`], in panel order.
pub const CHANNEL_PAIRS: [(Channel, Channel); 3] = [
    (Channel::Red, Channel::Green),
    (Channel::Red, Channel::Blue),
    (Channel::Green, Channel::Blue),
];

/// Per-channel mean/std/min/max of an arbitrary sample array.
pub fn analyze_distribution(image: &FloatImage) -> Result<ChannelReport> {
    ChannelReport::from_image(image, ReportKind::Distribution)
}

/// Renders a density histogram of each channel, side by side.
pub fn plot_channel_distributions<P: AsRef<Path>>(
    image: &FloatImage,
    config: &DistributionPlotConfig,
    out: P,
) -> Result<()> {
    let histograms = Channel::ALL
        .iter()
        .map(|&c| Ok((c, Histogram::density(&image.channel(c), config.bins)?)))
        .collect::<Result<Vec<_>>>()?;
    prepare_figure(config.size, (1, 3))?;

    let out = out.as_ref();
    let root = BitMapBackend::new(out, config.size).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));
    for (area, (channel, hist)) in panels.iter().zip(&histograms) {
        draw_density_panel(area, *channel, hist)?;
    }
    root.present()?;

    info!(out = %out.display(), bins = config.bins, "wrote channel distributions");
    Ok(())
}

/// Renders the R-G, R-B, and G-B scatter plots of every pixel.
pub fn plot_2d_distributions<P: AsRef<Path>>(
    image: &FloatImage,
    config: &DistributionPlotConfig,
    out: P,
) -> Result<()> {
    if image.is_empty() {
        return Err(VisualizerError::NoSamples);
    }
    prepare_figure(config.size, (1, 3))?;

    let out = out.as_ref();
    let root = BitMapBackend::new(out, config.size).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));
    for (area, &(x_channel, y_channel)) in panels.iter().zip(&CHANNEL_PAIRS) {
        draw_scatter_panel(area, image, x_channel, y_channel)?;
    }
    root.present()?;

    info!(out = %out.display(), pixels = image.rows() * image.cols(), "wrote 2-D distributions");
    Ok(())
}

fn draw_density_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    channel: Channel,
    hist: &Histogram,
) -> Result<()> {
    let (lo, hi) = hist.span().unwrap_or((0.0, 1.0));
    let top = hist.max_frequency();
    let top = if top > 0.0 { top * 1.05 } else { 1.0 };

    let title = format!("{channel} Channel Distribution");
    let mut chart = build_chart(area, &title, padded_range(lo, hi), 0.0..top)?;
    draw_axes(&mut chart, "Value", "Density")?;

    let half = hist.bin_width / 2.0;
    chart.draw_series(hist.points().map(|(center, density)| {
        Rectangle::new(
            [(center - half, 0.0), (center + half, density)],
            BAR_COLOR.filled(),
        )
    }))?;
    Ok(())
}

fn draw_scatter_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    image: &FloatImage,
    x_channel: Channel,
    y_channel: Channel,
) -> Result<()> {
    let (x_lo, x_hi) =
        finite_bounds(image.channel_iter(x_channel)).ok_or(VisualizerError::NoSamples)?;
    let (y_lo, y_hi) =
        finite_bounds(image.channel_iter(y_channel)).ok_or(VisualizerError::NoSamples)?;

    let title = format!("{}-{} Distribution", x_channel.initial(), y_channel.initial());
    let mut chart = build_chart(
        area,
        &title,
        padded_range(x_lo, x_hi),
        padded_range(y_lo, y_hi),
    )?;
    draw_axes(&mut chart, x_channel.name(), y_channel.name())?;

    let style = BAR_COLOR.mix(MARKER_ALPHA).filled();
    chart.draw_series(
        image
            .channel_iter(x_channel)
            .zip(image.channel_iter(y_channel))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|point| Circle::new(point, MARKER_SIZE, style)),
    )?;
    Ok(())
}
