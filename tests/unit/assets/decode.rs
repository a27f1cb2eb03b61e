use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn png_encoding_preserves_pixels() {
    let mut frame = RgbaFrame::filled(3, 2, Rgba8::opaque(10, 20, 30));
    frame.data[0..4].copy_from_slice(&[200, 0, 0, 128]);

    let encoded = encode_png(&frame).unwrap();
    assert_eq!((encoded.width, encoded.height), (3, 2));
    assert_eq!(&encoded.bytes()[1..4], b"PNG");

    let back = encoded.decode().unwrap();
    assert_eq!(back, frame);
}

#[test]
fn data_url_has_png_prefix() {
    let encoded = encode_png(&RgbaFrame::filled(1, 1, Rgba8::WHITE)).unwrap();
    let url = encoded.to_data_url();
    assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let bogus = ImageFrame::from_encoded(4, 4, b"definitely not an image".to_vec());
    assert!(bogus.decode().is_err());
    assert!(decode_image(&[]).is_err());
}

#[test]
fn empty_frames_are_not_encoded() {
    let empty = RgbaFrame::filled(0, 5, Rgba8::WHITE);
    assert!(encode_png(&empty).is_err());
}

#[test]
fn from_path_probes_dimensions() {
    let dir = std::path::PathBuf::from("target").join("unit_decode");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("probe.png");
    let encoded = encode_png(&RgbaFrame::filled(7, 5, Rgba8::WHITE)).unwrap();
    std::fs::write(&path, encoded.bytes()).unwrap();

    let loaded = ImageFrame::from_path(&path).unwrap();
    assert_eq!((loaded.width, loaded.height), (7, 5));
    assert!(ImageFrame::from_path(dir.join("missing.png")).is_err());
}
