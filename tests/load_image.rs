use image::{DynamicImage, ImageBuffer, Rgb, Rgba, RgbaImage};
use image_visualizer::{Channel, ImageShape, load_image};

#[test]
fn rgba8_file_loads_as_normalized_rgb() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rgba.png");
    let src = RgbaImage::from_fn(16, 16, |x, y| {
        let v = (x * 16 + y) as u8;
        Rgba([v, 255 - v, if x % 2 == 0 { 0 } else { 255 }, 128])
    });
    src.save(&path).expect("write png");

    let img = load_image(&path).expect("load");
    assert_eq!(img.shape(), ImageShape { rows: 16, cols: 16, channels: 3 });
    assert_eq!(img.samples().len(), 16 * 16 * 3);
    assert!(img.samples().iter().all(|v| (0.0..=1.0).contains(v)));

    let red = img.channel(Channel::Red);
    let lo = red.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = red.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(lo, 0.0);
    assert_eq!(hi, 1.0);
}

#[test]
fn sixteen_bit_samples_scale_by_type_maximum() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deep.png");
    let src: ImageBuffer<Rgb<u16>, Vec<u16>> =
        ImageBuffer::from_fn(3, 1, |x, _| Rgb([[0, 32768, 65535][x as usize]; 3]));
    DynamicImage::ImageRgb16(src).save(&path).expect("write png");

    let img = load_image(&path).expect("load");
    assert_eq!(img.pixel(0, 0), [0.0; 3]);
    assert!((img.pixel(0, 1)[0] - 32768.0 / 65535.0).abs() < 1e-6);
    assert_eq!(img.pixel(0, 2), [1.0; 3]);
}

#[test]
fn unreadable_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("garbage.png");
    std::fs::write(&path, b"not an image").expect("write");
    assert!(load_image(&path).is_err());
}
