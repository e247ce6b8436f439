use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use image_visualizer::driver::{ComparisonPair, default_pairs, run_reference_comparisons};
use image_visualizer::{DifferencePlotConfig, VisualizerError};

fn small_config() -> DifferencePlotConfig {
    DifferencePlotConfig {
        size: (480, 320),
        ..DifferencePlotConfig::default()
    }
}

fn write_png(path: &Path, width: u32, height: u32, shade: u8) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    RgbImage::from_fn(width, height, |x, _| Rgb([shade, x as u8 * 10, 255 - shade]))
        .save(path)
        .expect("write png");
}

#[test]
fn missing_candidates_are_skipped_silently() {
    let root = tempfile::tempdir().expect("root");
    let out = root.path().join("figures");
    let written =
        run_reference_comparisons(root.path(), &default_pairs(true), &small_config(), &out)
            .expect("nothing to compare is not an error");
    assert!(written.is_empty());
    assert!(!out.exists());
}

#[test]
fn existing_candidates_are_compared_against_their_reference() {
    let root = tempfile::tempdir().expect("root");
    write_png(&root.path().join("ref_blank/hw7_1.png"), 12, 9, 40);
    write_png(&root.path().join("part-1.png"), 12, 9, 90);
    // part-2.png is absent, so only the first pair renders.
    write_png(&root.path().join("ref_blank/hw7_2.png"), 12, 9, 40);

    let out = root.path().join("figures");
    let written = run_reference_comparisons(root.path(), &default_pairs(false), &small_config(), &out)
        .expect("comparison");

    assert_eq!(written, vec![out.join("part-1_difference.png")]);
    let figure = image::open(&written[0]).expect("figure readable");
    assert_eq!((figure.width(), figure.height()), (480, 320));
}

#[test]
fn shape_mismatch_against_reference_aborts() {
    let root = tempfile::tempdir().expect("root");
    write_png(&root.path().join("ref/a.png"), 10, 10, 0);
    write_png(&root.path().join("a.png"), 20, 20, 0);

    let out = root.path().join("figures");
    let pairs = [ComparisonPair::new("ref/a.png", "a.png")];
    let err = run_reference_comparisons(root.path(), &pairs, &small_config(), &out).unwrap_err();
    assert!(matches!(err, VisualizerError::ShapeMismatch { .. }));
    assert!(!out.join("a_difference.png").exists());
}

#[test]
fn missing_reference_is_an_error() {
    let root = tempfile::tempdir().expect("root");
    write_png(&root.path().join("part-2.png"), 4, 4, 10);
    let out = root.path().join("figures");
    let err = run_reference_comparisons(root.path(), &default_pairs(false), &small_config(), &out)
        .unwrap_err();
    assert!(matches!(err, VisualizerError::Image(_)));
}
