use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use super::colormap::{DifferenceHeatmap, DivergingColormap};
use super::{FONT, LABEL_SIZE, draw_histogram_panel, draw_image_panel, prepare_figure};
use crate::config::DifferencePlotConfig;
use crate::difference::difference_image;
use crate::error::Result;
use crate::histogram::smoothed_channel_histograms;
use crate::image_data::FloatImage;

const COLORBAR_WIDTH: i32 = 90;
const COLORBAR_STEPS: usize = 64;

/// Renders both source images, their difference as a diverging heatmap with a
/// color bar, and the smoothed per-channel histogram of the difference.
///
/// Mismatched shapes and figures below two rows of three minimum-size panels
/// fail before the output file is created.
pub fn plot_image_difference<P: AsRef<Path>>(
    first: &FloatImage,
    second: &FloatImage,
    config: &DifferencePlotConfig,
    out: P,
) -> Result<()> {
    let diff = difference_image(first, second, config.method)?;
    let curves = smoothed_channel_histograms(&diff, config.bins)?;
    let colormap = DivergingColormap::default();
    let heatmap = DifferenceHeatmap::new(&diff, &colormap);
    prepare_figure(config.size, (2, 3))?;

    let out = out.as_ref();
    let root = BitMapBackend::new(out, config.size).into_drawing_area();
    root.fill(&WHITE)?;

    let (top, bottom) = root.split_vertically((config.size.1 / 2) as i32);
    let row = top.split_evenly((1, 3));
    draw_image_panel(&row[0], "Image 1", &first.to_rgb8())?;
    draw_image_panel(&row[1], "Image 2", &second.to_rgb8())?;

    let diff_width = row[2].dim_in_pixel().0 as i32 - COLORBAR_WIDTH;
    let (diff_area, bar_area) = row[2].split_horizontally(diff_width.max(1));
    draw_image_panel(&diff_area, "Difference", &heatmap.pixels)?;
    draw_colorbar(&bar_area, &colormap, heatmap.limit)?;

    draw_histogram_panel(
        &bottom,
        "RGB Histogram of Differences",
        "Difference Intensity",
        &curves,
    )?;
    root.present()?;

    info!(out = %out.display(), method = ?config.method, "wrote difference figure");
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    colormap: &DivergingColormap,
    limit: f64,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(20)
        .margin_left(5)
        .set_label_area_size(LabelAreaPosition::Right, 55)
        .build_cartesian_2d(0.0..1.0, -limit..limit)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .label_style((FONT, LABEL_SIZE))
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    let step = 2.0 * limit / COLORBAR_STEPS as f64;
    chart.draw_series((0..COLORBAR_STEPS).map(|i| {
        let lo = -limit + step * i as f64;
        let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        Rectangle::new([(0.0, lo), (1.0, lo + step)], colormap.sample(t).filled())
    }))?;
    Ok(())
}
