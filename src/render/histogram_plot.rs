use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use super::{draw_histogram_panel, draw_image_panel, prepare_figure};
use crate::config::HistogramPlotConfig;
use crate::error::{Result, VisualizerError};
use crate::histogram::smoothed_channel_histograms;
use crate::image_data::FloatImage;

const X_LABEL: &str = "Pixel Intensity";

/// Renders the smoothed RGB histogram of one image.
pub fn plot_rgb_histogram<P: AsRef<Path>>(
    image: &FloatImage,
    config: &HistogramPlotConfig,
    out: P,
) -> Result<()> {
    let curves = smoothed_channel_histograms(image, config.bins)?;
    prepare_figure(config.size, (1, 1))?;

    let out = out.as_ref();
    let root = BitMapBackend::new(out, config.size).into_drawing_area();
    root.fill(&WHITE)?;
    draw_histogram_panel(&root, "RGB Color Histogram", X_LABEL, &curves)?;
    root.present()?;

    info!(out = %out.display(), bins = config.bins, "wrote RGB histogram");
    Ok(())
}

/// Renders the histograms of two images side by side.
pub fn plot_rgb_histograms_pair<P: AsRef<Path>>(
    first: &FloatImage,
    second: &FloatImage,
    config: &HistogramPlotConfig,
    out: P,
) -> Result<()> {
    let panels_data = [
        ("Image 1", smoothed_channel_histograms(first, config.bins)?),
        ("Image 2", smoothed_channel_histograms(second, config.bins)?),
    ];
    prepare_figure(config.size, (1, 2))?;

    let out = out.as_ref();
    let root = BitMapBackend::new(out, config.size).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));
    for (area, (title, curves)) in panels.iter().zip(&panels_data) {
        draw_histogram_panel(area, &format!("RGB Histogram - {title}"), X_LABEL, curves)?;
    }
    root.present()?;

    info!(out = %out.display(), "wrote two-image histogram comparison");
    Ok(())
}

/// Renders four images in a row with their histograms underneath, captioned by
/// `labels` in order.
pub fn plot_rgb_histograms_quad<P, S>(
    images: &[FloatImage; 4],
    labels: &[S],
    config: &HistogramPlotConfig,
    out: P,
) -> Result<()>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    if labels.len() != images.len() {
        return Err(VisualizerError::LabelCount {
            expected: images.len(),
            got: labels.len(),
        });
    }
    let curves = images
        .iter()
        .map(|img| smoothed_channel_histograms(img, config.bins))
        .collect::<Result<Vec<_>>>()?;
    prepare_figure(config.size, (2, images.len() as u32))?;

    let out = out.as_ref();
    let root = BitMapBackend::new(out, config.size).into_drawing_area();
    root.fill(&WHITE)?;
    let cells = root.split_evenly((2, images.len()));
    let (top, bottom) = cells.split_at(images.len());
    for (i, (image, label)) in images.iter().zip(labels).enumerate() {
        let label = label.as_ref();
        draw_image_panel(&top[i], &format!("Image - {label}"), &image.to_rgb8())?;
        draw_histogram_panel(
            &bottom[i],
            &format!("RGB Histogram - {label}"),
            X_LABEL,
            &curves[i],
        )?;
    }
    root.present()?;

    info!(out = %out.display(), "wrote four-image histogram comparison");
    Ok(())
}
