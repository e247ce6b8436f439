use plotters::drawing::DrawingAreaErrorKind;

use crate::image_data::ImageShape;

/// Errors produced while loading, comparing, or rendering images.
#[derive(Debug, thiserror::Error)]
pub enum VisualizerError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Images must have the same dimensions: {left} vs {right}")]
    ShapeMismatch { left: ImageShape, right: ImageShape },

    #[error("histogram needs at least {min} bins, got {bins}")]
    TooFewBins { bins: usize, min: usize },

    #[error("expected {expected} labels, got {got}")]
    LabelCount { expected: usize, got: usize },

    #[error("no finite samples to summarize")]
    NoSamples,

    #[error("buffer of {len} samples does not match a {rows}x{cols}x3 image")]
    InvalidBuffer { len: usize, rows: usize, cols: usize },

    #[error("figure of {width}x{height} px is below the {min_width}x{min_height} px minimum")]
    FigureTooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    #[error("render error: {0}")]
    Render(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for VisualizerError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        VisualizerError::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
