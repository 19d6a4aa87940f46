use super::*;

#[test]
fn filled_premultiplies_translucent_colors() {
    let f = FrameRGBA::filled(2, 1, Rgba8 { r: 255, g: 0, b: 0, a: 128 });
    assert_eq!(f.pixel(0, 0), Some([128, 0, 0, 128]));
    assert_eq!(f.pixel(2, 0), None);
    let straight = f.to_straight_rgba();
    assert_eq!(&straight[..4], &[255, 0, 0, 128]);
}

#[test]
fn flatten_composites_over_background() {
    let f = FrameRGBA::filled(1, 1, Rgba8 { r: 0, g: 0, b: 0, a: 0 });
    assert_eq!(f.flatten_rgb(Rgba8::WHITE), vec![255, 255, 255]);
    let f = FrameRGBA::filled(1, 1, Rgba8::rgb(10, 20, 30));
    assert_eq!(f.flatten_rgb(Rgba8::WHITE), vec![10, 20, 30]);
}

#[test]
fn png_round_trip_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/frame.png");
    let f = FrameRGBA::filled(3, 2, Rgba8::rgb(0, 0, 255));
    f.save(&path).unwrap();
    let back = FrameRGBA::load(&path).unwrap();
    assert_eq!(back, f);
}

#[test]
fn jpeg_is_written_for_jpg_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.jpg");
    FrameRGBA::filled(8, 8, Rgba8::rgb(200, 200, 200))
        .save(&path)
        .unwrap();
    let back = FrameRGBA::load(&path).unwrap();
    assert_eq!((back.width, back.height), (8, 8));
    let px = back.pixel(4, 4).unwrap();
    assert!(px[0].abs_diff(200) <= 3);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = FrameRGBA::filled(1, 1, Rgba8::WHITE)
        .save(&dir.path().join("frame.tiff"))
        .unwrap_err();
    assert!(matches!(err, PostproError::Validation(_)));
}

#[test]
fn load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(FrameRGBA::load(&dir.path().join("nope.png")).is_err());
}
