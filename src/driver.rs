//! Compares candidate renders against their reference images.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::DifferencePlotConfig;
use crate::error::Result;
use crate::image_data::load_image;
use crate::render::plot_image_difference;

/// A candidate image and the reference it is compared against, both relative to
/// the comparison root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPair {
    pub reference: PathBuf,
    pub candidate: PathBuf,
}

impl ComparisonPair {
    pub fn new(reference: impl Into<PathBuf>, candidate: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            candidate: candidate.into(),
        }
    }

    /// `<candidate stem>_difference.png`
    pub fn figure_name(&self) -> String {
        let stem = self
            .candidate
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "candidate".to_string());
        format!("{stem}_difference.png")
    }
}

/// The standard pairs; the bonus pair is only included on request.
pub fn default_pairs(include_bonus: bool) -> Vec<ComparisonPair> {
    let mut pairs = vec![
        ComparisonPair::new("ref_blank/hw7_1.png", "part-1.png"),
        ComparisonPair::new("ref_blank/hw7_2.png", "part-2.png"),
    ];
    if include_bonus {
        pairs.push(ComparisonPair::new("ref_blank/bonus.png", "bonus.png"));
    }
    pairs
}

/// Renders a difference figure into `out_dir` for every pair whose candidate
/// exists under `root`. Missing candidates are skipped; missing references and
/// shape mismatches abort the run.
pub fn run_reference_comparisons(
    root: &Path,
    pairs: &[ComparisonPair],
    config: &DifferencePlotConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for pair in pairs {
        let candidate = root.join(&pair.candidate);
        if !candidate.exists() {
            debug!(candidate = %candidate.display(), "candidate missing, skipping");
            continue;
        }

        let reference = load_image(root.join(&pair.reference))?;
        let rendered = load_image(&candidate)?;

        fs::create_dir_all(out_dir)?;
        let out = out_dir.join(pair.figure_name());
        plot_image_difference(&reference, &rendered, config, &out)?;
        info!(candidate = %candidate.display(), out = %out.display(), "compared against reference");
        written.push(out);
    }
    Ok(written)
}
