//! Float RGB images and the loader that normalizes decoded files into them.

use std::fmt;
use std::path::Path;

use image::{DynamicImage, Rgb};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, VisualizerError};

/// Number of color planes every [`FloatImage`] carries.
pub const CHANNELS: usize = 3;

/// One of the three color planes of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; CHANNELS] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "Red",
            Channel::Green => "Green",
            Channel::Blue => "Blue",
        }
    }

    /// Upper-case name used for plot legends.
    pub fn legend(self) -> &'static str {
        match self {
            Channel::Red => "RED",
            Channel::Green => "GREEN",
            Channel::Blue => "BLUE",
        }
    }

    /// Single-letter abbreviation used in scatter titles ("R-G").
    pub fn initial(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// (rows, cols, channels) of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageShape {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
}

impl fmt::Display for ImageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.rows, self.cols, self.channels)
    }
}

/// A three-channel image of `f64` samples stored row-major, channels interleaved.
///
/// Images produced by [`load_image`] hold values in `[0, 1]`. Difference images
/// built from them may hold negative values.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FloatImage {
    /// Wraps an interleaved sample buffer of length `rows * cols * 3`.
    pub fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(CHANNELS));
        if expected != Some(data.len()) {
            return Err(VisualizerError::InvalidBuffer {
                len: data.len(),
                rows,
                cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds an image by evaluating `f(row, col)` for every pixel.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [f64; CHANNELS],
    {
        let mut data = Vec::with_capacity(rows * cols * CHANNELS);
        for row in 0..rows {
            for col in 0..cols {
                data.extend_from_slice(&f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    pub fn filled(rows: usize, cols: usize, pixel: [f64; CHANNELS]) -> Self {
        Self::from_fn(rows, cols, |_, _| pixel)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, [0.0; CHANNELS])
    }

    /// Converts a decoded image, scaling integer samples by their type maximum
    /// and dropping any alpha channel. Grayscale sources are expanded to RGB.
    pub fn from_dynamic(source: &DynamicImage) -> Self {
        let rgb = source.to_rgb32f();
        let (width, height) = rgb.dimensions();
        let data = rgb.into_raw().into_iter().map(f64::from).collect();
        Self {
            rows: height as usize,
            cols: width as usize,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> ImageShape {
        ImageShape {
            rows: self.rows,
            cols: self.cols,
            channels: CHANNELS,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    pub fn pixel(&self, row: usize, col: usize) -> [f64; CHANNELS] {
        let at = (row * self.cols + col) * CHANNELS;
        [self.data[at], self.data[at + 1], self.data[at + 2]]
    }

    pub fn channel_iter(&self, channel: Channel) -> impl Iterator<Item = f64> + '_ {
        self.data
            .iter()
            .skip(channel.index())
            .step_by(CHANNELS)
            .copied()
    }

    /// The 2-D slice of one channel, flattened row-major.
    pub fn channel(&self, channel: Channel) -> Vec<f64> {
        self.channel_iter(channel).collect()
    }

    /// Iterates pixels as `[r, g, b]` triples in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [f64; CHANNELS]> + '_ {
        self.data.chunks_exact(CHANNELS).map(|p| [p[0], p[1], p[2]])
    }

    /// Quantizes to 8-bit for display, clamping samples to `[0, 1]`.
    pub fn to_rgb8(&self) -> image::RgbImage {
        let mut out = image::RgbImage::new(self.cols as u32, self.rows as u32);
        for (i, px) in self.pixels().enumerate() {
            let x = (i % self.cols) as u32;
            let y = (i / self.cols) as u32;
            out.put_pixel(x, y, Rgb(px.map(quantize)));
        }
        out
    }
}

fn quantize(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Reads an image file into a normalized three-channel float image.
///
/// Decoder and I/O failures are returned as-is; nothing is retried.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<FloatImage> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    let image = FloatImage::from_dynamic(&decoded);
    info!(path = %path.display(), shape = %image.shape(), "Image loaded and normalized.");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba, RgbaImage};

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = FloatImage::from_raw(2, 2, vec![0.0; 11]).unwrap_err();
        assert!(matches!(
            err,
            VisualizerError::InvalidBuffer { len: 11, rows: 2, cols: 2 }
        ));
    }

    #[test]
    fn channel_slices_are_deinterleaved() {
        let img = FloatImage::from_fn(2, 3, |r, c| [r as f64, c as f64, 9.0]);
        assert_eq!(img.channel(Channel::Red), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(img.channel(Channel::Green), vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert!(img.channel(Channel::Blue).iter().all(|&v| v == 9.0));
        assert_eq!(img.pixel(1, 2), [1.0, 2.0, 9.0]);
    }

    #[test]
    fn rgba8_is_normalized_and_alpha_dropped() {
        let mut src = RgbaImage::new(3, 2);
        src.put_pixel(0, 0, Rgba([255, 0, 128, 10]));
        src.put_pixel(2, 1, Rgba([51, 255, 0, 255]));
        let img = FloatImage::from_dynamic(&DynamicImage::ImageRgba8(src));

        assert_eq!(img.shape(), ImageShape { rows: 2, cols: 3, channels: 3 });
        assert_eq!(img.samples().len(), 2 * 3 * 3);
        assert!(img.samples().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(img.pixel(0, 0)[0], 1.0);
        assert_eq!(img.pixel(0, 0)[1], 0.0);
        assert!((img.pixel(1, 2)[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn grayscale_expands_to_three_equal_channels() {
        let mut src = image::GrayImage::new(2, 2);
        src.put_pixel(1, 0, Luma([255]));
        let img = FloatImage::from_dynamic(&DynamicImage::ImageLuma8(src));
        assert_eq!(img.pixel(0, 1), [1.0, 1.0, 1.0]);
        assert_eq!(img.pixel(1, 1), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn to_rgb8_clamps_out_of_range_samples() {
        let img = FloatImage::from_fn(1, 2, |_, c| if c == 0 { [-0.5, 0.5, 2.0] } else { [1.0; 3] });
        let rgb = img.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 128, 255]);
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn missing_file_surfaces_decoder_error() {
        let err = load_image("does/not/exist.png").unwrap_err();
        assert!(matches!(err, VisualizerError::Image(_)));
    }
}
