use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn skips_missing_and_mismatched_frames() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    let c = dir.path().join("c.png");
    let missing = dir.path().join("missing.png");
    FrameRGBA::filled(4, 4, Rgba8::BLACK).save(&a).unwrap();
    FrameRGBA::filled(5, 4, Rgba8::BLACK).save(&b).unwrap();
    FrameRGBA::filled(4, 4, Rgba8::WHITE).save(&c).unwrap();

    let seq = load_sequence(&[missing, a.clone(), b, c.clone()]).unwrap();
    assert_eq!(seq.len(), 2);
    assert_eq!(seq.size(), (4, 4));
    assert_eq!(seq.paths(), &[a, c]);
}

#[test]
fn no_readable_frame_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("junk.png"), b"not a png").unwrap();
    let err = load_sequence(&[dir.path().join("junk.png"), dir.path().join("none.png")])
        .unwrap_err()
        .to_string();
    assert!(err.contains("none of the 2 requested frames"));
}
