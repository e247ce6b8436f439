//! Figure rendering on top of the plotters bitmap backend.
//!
//! Every public entry point validates and computes its data before the output
//! file is opened.

use std::ops::Range;
use std::sync::OnceLock;

use image::imageops::{self, FilterType};
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::error::{Result, VisualizerError};
use crate::histogram::Histogram;
use crate::image_data::Channel;

pub mod colormap;
pub mod difference_plot;
pub mod distribution_plot;
pub mod histogram_plot;

pub use colormap::{DifferenceHeatmap, DivergingColormap};
pub use difference_plot::plot_image_difference;
pub use distribution_plot::{analyze_distribution, plot_2d_distributions, plot_channel_distributions};
pub use histogram_plot::{plot_rgb_histogram, plot_rgb_histograms_pair, plot_rgb_histograms_quad};

pub(crate) const FONT: &str = "sans-serif";
pub(crate) const TITLE_SIZE: i32 = 20;
pub(crate) const LABEL_SIZE: i32 = 14;
pub(crate) const GRID_ALPHA: f64 = 0.2;

/// Smallest width and height, in pixels, of one panel of a figure.
pub const MIN_PANEL_SIZE: u32 = 120;

static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static FONT_LOADED: OnceLock<bool> = OnceLock::new();

const CURVE_ALPHA: f64 = 0.7;
const CURVE_WIDTH: u32 = 2;
const TITLE_SPACE: u32 = 30;

pub(crate) type Chart2d<'a, DB> =
    ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Registers the embedded sans-serif face with plotters. Idempotent.
pub(crate) fn ensure_font() -> Result<()> {
    let loaded = *FONT_LOADED
        .get_or_init(|| register_font(FONT, FontStyle::Normal, FONT_BYTES).is_ok());
    if loaded {
        Ok(())
    } else {
        Err(VisualizerError::Render("embedded font could not be parsed".into()))
    }
}

/// Rejects figures whose `rows x cols` panel grid would leave a panel smaller
/// than [`MIN_PANEL_SIZE`], then makes sure text can be drawn.
pub(crate) fn prepare_figure(size: (u32, u32), (rows, cols): (u32, u32)) -> Result<()> {
    let min = (MIN_PANEL_SIZE * cols, MIN_PANEL_SIZE * rows);
    if size.0 < min.0 || size.1 < min.1 {
        return Err(VisualizerError::FigureTooSmall {
            width: size.0,
            height: size.1,
            min_width: min.0,
            min_height: min.1,
        });
    }
    ensure_font()
}

/// Canonical plotting color of a channel.
pub fn channel_color(channel: Channel) -> RGBColor {
    match channel {
        Channel::Red => RGBColor(255, 0, 0),
        Channel::Green => RGBColor(0, 128, 0),
        Channel::Blue => RGBColor(0, 0, 255),
    }
}

/// Axis range covering `[lo, hi]`, widened when the two coincide.
pub(crate) fn padded_range(lo: f64, hi: f64) -> Range<f64> {
    if hi > lo { lo..hi } else { lo - 0.5..hi + 0.5 }
}

pub(crate) fn finite_bounds(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    (lo <= hi).then_some((lo, hi))
}

/// A cartesian chart with a caption and left/bottom label areas.
pub(crate) fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    title: &str,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<Chart2d<'a, DB>> {
    Ok(ChartBuilder::on(area)
        .margin(10)
        .caption(title, (FONT, TITLE_SIZE))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?)
}

/// Faint grid plus axis descriptions. Only the left and bottom axes are drawn.
pub(crate) fn draw_axes<DB: DrawingBackend>(
    chart: &mut Chart2d<'_, DB>,
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    chart
        .configure_mesh()
        .bold_line_style(BLACK.mix(GRID_ALPHA))
        .light_line_style(WHITE)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style((FONT, LABEL_SIZE))
        .draw()?;
    Ok(())
}

/// Draws one histogram chart with a smoothed curve per channel and a legend.
pub(crate) fn draw_histogram_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    x_label: &str,
    curves: &[(Channel, Histogram)],
) -> Result<()> {
    let x_bounds = finite_bounds(curves.iter().flat_map(|(_, h)| h.bin_centers.iter().copied()));
    let (x_lo, x_hi) = x_bounds.unwrap_or((0.0, 1.0));
    let y_max = curves
        .iter()
        .map(|(_, h)| h.max_frequency())
        .fold(0.0, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    let mut chart = build_chart(area, title, padded_range(x_lo, x_hi), 0.0..y_top)?;
    draw_axes(&mut chart, x_label, "Normalized Frequency")?;

    for (channel, hist) in curves {
        let color = channel_color(*channel);
        chart
            .draw_series(LineSeries::new(
                hist.points(),
                color.mix(CURVE_ALPHA).stroke_width(CURVE_WIDTH),
            ))?
            .label(channel.legend())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(CURVE_WIDTH))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(GRID_ALPHA))
        .label_font((FONT, LABEL_SIZE))
        .draw()?;
    Ok(())
}

/// Pixel extent of `area`, zero along an axis whose margins have crossed.
fn extent<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> (u32, u32) {
    let (x, y) = area.get_pixel_range();
    let len = |r: Range<i32>| u32::try_from(r.end.saturating_sub(r.start)).unwrap_or(0);
    (len(x), len(y))
}

/// Draws `pixels` scaled to fit below a title, centered, without axes.
///
/// Areas too short to hold the title are left blank.
pub(crate) fn draw_image_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    pixels: &image::RgbImage,
) -> Result<()> {
    let (_, area_h) = extent(area);
    if area_h <= TITLE_SPACE {
        return Ok(());
    }
    let inner = area.titled(title, (FONT, TITLE_SIZE))?;
    let (panel_w, panel_h) = extent(&inner);
    let (img_w, img_h) = pixels.dimensions();
    if panel_w == 0 || panel_h == 0 || img_w == 0 || img_h == 0 {
        return Ok(());
    }

    let scale = (panel_w as f64 / img_w as f64).min(panel_h as f64 / img_h as f64);
    let fit_w = ((img_w as f64 * scale).floor() as u32).clamp(1, panel_w);
    let fit_h = ((img_h as f64 * scale).floor() as u32).clamp(1, panel_h);
    let fitted = imageops::resize(pixels, fit_w, fit_h, FilterType::Nearest);

    let off_x = ((panel_w - fit_w) / 2) as i32;
    let off_y = ((panel_h - fit_h) / 2) as i32;
    for (x, y, px) in fitted.enumerate_pixels() {
        inner.draw_pixel(
            (off_x + x as i32, off_y + y as i32),
            &RGBColor(px[0], px[1], px[2]),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_range_is_widened() {
        assert_eq!(padded_range(0.25, 0.25), -0.25..0.75);
        assert_eq!(padded_range(0.0, 1.0), 0.0..1.0);
    }

    #[test]
    fn bounds_skip_non_finite_values() {
        assert_eq!(finite_bounds([f64::NAN, 2.0, -1.0]), Some((-1.0, 2.0)));
        assert_eq!(finite_bounds(std::iter::empty()), None);
    }

    #[test]
    fn small_figures_are_rejected() {
        let err = prepare_figure((300, 40), (2, 3)).unwrap_err();
        assert!(matches!(
            err,
            VisualizerError::FigureTooSmall { width: 300, height: 40, min_width: 360, min_height: 240 }
        ));
        prepare_figure((360, 240), (2, 3)).expect("exactly the minimum fits");
    }

    #[test]
    fn image_panel_shorter_than_title_is_skipped() {
        ensure_font().expect("font");
        let mut buf = vec![255u8; 60 * 10 * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (60, 10)).into_drawing_area();
            let red = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 0, 0]));
            draw_image_panel(&root, "Image 1", &red).unwrap();
            let inverted = root.margin(8, 8, 0, 0);
            draw_image_panel(&inverted, "Image 1", &red).unwrap();
            root.present().unwrap();
        }
        assert!(buf.iter().all(|&b| b == 255));
    }

    #[test]
    fn image_panel_fills_centered_region() {
        ensure_font().expect("font");
        let mut buf = vec![0u8; 80 * 80 * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (80, 80)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let red = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 0, 0]));
            draw_image_panel(&root, "", &red).unwrap();
            root.present().unwrap();
        }
        let red_pixels = buf.chunks_exact(3).filter(|p| **p == [200u8, 0, 0]).count();
        assert!(red_pixels > 0);
        // Corners stay background since the square image is letterboxed.
        assert_eq!(&buf[0..3], &[255, 255, 255]);
    }
}
