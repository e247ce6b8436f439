//! Blue-white-red diverging colormap used for difference images.

use palette::{LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

use crate::image_data::FloatImage;

// Low to high: dark blue, white, dark red.
const RED_BLUE_STOPS: [(u8, u8, u8); 11] = [
    (0x05, 0x30, 0x61),
    (0x21, 0x66, 0xac),
    (0x43, 0x93, 0xc3),
    (0x92, 0xc5, 0xde),
    (0xd1, 0xe5, 0xf0),
    (0xf7, 0xf7, 0xf7),
    (0xfd, 0xdb, 0xc7),
    (0xf4, 0xa5, 0x82),
    (0xd6, 0x60, 0x4d),
    (0xb2, 0x18, 0x2b),
    (0x67, 0x00, 0x1f),
];

/// Piecewise-linear colormap interpolated in linear RGB.
#[derive(Debug, Clone)]
pub struct DivergingColormap {
    stops: Vec<LinSrgb>,
}

impl Default for DivergingColormap {
    fn default() -> Self {
        Self::red_blue()
    }
}

impl DivergingColormap {
    pub fn red_blue() -> Self {
        let stops = RED_BLUE_STOPS
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        Self { stops }
    }

    /// Color at position `t` in `[0, 1]`; out-of-range positions are clamped.
    pub fn sample(&self, t: f64) -> RGBColor {
        let last = self.stops.len() - 1;
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
        let pos = t as f32 * last as f32;
        let lower = (pos.floor() as usize).min(last - 1);
        let mixed = self.stops[lower].mix(self.stops[lower + 1], pos - lower as f32);
        let srgb: Srgb<f32> = Srgb::from_linear(mixed);
        let srgb: Srgb<u8> = srgb.into_format();
        RGBColor(srgb.red, srgb.green, srgb.blue)
    }

    /// Maps `value` from `[-limit, limit]` so that zero lands on the white midpoint.
    pub fn sample_signed(&self, value: f64, limit: f64) -> RGBColor {
        self.sample((value / limit + 1.0) / 2.0)
    }
}

/// A difference image collapsed to one value per pixel and colored with a
/// symmetric diverging scale.
///
/// Each pixel keeps its largest-magnitude channel difference, sign included,
/// so opposite-signed channels never cancel to white.
#[derive(Debug, Clone)]
pub struct DifferenceHeatmap {
    pub pixels: image::RgbImage,
    /// Magnitude mapped to either end of the colormap.
    pub limit: f64,
}

impl DifferenceHeatmap {
    pub fn new(diff: &FloatImage, colormap: &DivergingColormap) -> Self {
        let dominant: Vec<f64> = diff.pixels().map(dominant_channel).collect();
        let peak = dominant
            .iter()
            .filter(|v| v.is_finite())
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        let limit = if peak > 0.0 { peak } else { 1.0 };

        let cols = diff.cols().max(1);
        let mut pixels = image::RgbImage::new(diff.cols() as u32, diff.rows() as u32);
        for (i, value) in dominant.iter().enumerate() {
            let RGBColor(r, g, b) = colormap.sample_signed(*value, limit);
            pixels.put_pixel((i % cols) as u32, (i / cols) as u32, image::Rgb([r, g, b]));
        }
        Self { pixels, limit }
    }
}

/// The finite sample with the largest magnitude; ties keep the earlier channel.
fn dominant_channel(pixel: [f64; 3]) -> f64 {
    pixel
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0, |best, v| if v.abs() > best.abs() { v } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: RGBColor, b: (u8, u8, u8)) -> bool {
        let d = |x: u8, y: u8| (x as i16 - y as i16).abs() <= 1;
        d(a.0, b.0) && d(a.1, b.1) && d(a.2, b.2)
    }

    #[test]
    fn endpoints_and_midpoint_match_stops() {
        let cmap = DivergingColormap::red_blue();
        assert!(close(cmap.sample(0.0), RED_BLUE_STOPS[0]));
        assert!(close(cmap.sample(0.5), RED_BLUE_STOPS[5]));
        assert!(close(cmap.sample(1.0), RED_BLUE_STOPS[10]));
        assert!(close(cmap.sample(7.0), RED_BLUE_STOPS[10]));
    }

    #[test]
    fn zero_difference_maps_to_white() {
        let diff = FloatImage::zeros(3, 2);
        let heat = DifferenceHeatmap::new(&diff, &DivergingColormap::default());
        assert_eq!(heat.limit, 1.0);
        assert_eq!(heat.pixels.dimensions(), (2, 3));
        for px in heat.pixels.pixels() {
            assert!(close(RGBColor(px[0], px[1], px[2]), RED_BLUE_STOPS[5]));
        }
    }

    #[test]
    fn opposite_channel_differences_do_not_cancel() {
        let diff = FloatImage::from_fn(1, 2, |_, c| {
            if c == 0 { [0.5, 0.0, -0.5] } else { [-0.1, 0.3, -0.6] }
        });
        let heat = DifferenceHeatmap::new(&diff, &DivergingColormap::default());
        assert!((heat.limit - 0.6).abs() < 1e-12);

        let tie = heat.pixels.get_pixel(0, 0);
        assert!(!close(RGBColor(tie[0], tie[1], tie[2]), RED_BLUE_STOPS[5]));
        assert!(tie[0] > tie[2], "tie resolves to the red channel's positive value");

        let strongest = heat.pixels.get_pixel(1, 0);
        assert!(close(RGBColor(strongest[0], strongest[1], strongest[2]), RED_BLUE_STOPS[0]));
    }

    #[test]
    fn sign_selects_the_side_of_the_scale() {
        let diff = FloatImage::from_fn(1, 2, |_, c| if c == 0 { [-0.4; 3] } else { [0.4; 3] });
        let heat = DifferenceHeatmap::new(&diff, &DivergingColormap::default());
        assert!((heat.limit - 0.4).abs() < 1e-12);
        let neg = heat.pixels.get_pixel(0, 0);
        let pos = heat.pixels.get_pixel(1, 0);
        assert!(neg[2] > neg[0], "negative side should be blue");
        assert!(pos[0] > pos[2], "positive side should be red");
    }
}
