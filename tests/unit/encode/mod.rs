use super::*;
use crate::foundation::core::Rgba8;
use crate::render::frame::FrameRGBA;

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("a/b/c/out.mp4");
    ensure_parent_dir(&target).unwrap();
    assert!(dir.path().join("a/b/c").is_dir());
    // bare file names have no parent to create
    ensure_parent_dir(Path::new("out.mp4")).unwrap();
}

#[test]
fn encode_sequence_streams_frames_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for (i, c) in [Rgba8::BLACK, Rgba8::WHITE].into_iter().enumerate() {
        let p = dir.path().join(format!("f{i}.png"));
        FrameRGBA::filled(4, 2, c).save(&p).unwrap();
        paths.push(p);
    }
    let seq = load_sequence(&paths).unwrap();
    let mut sink = InMemorySink::new();
    encode_sequence(&mut sink, &seq, Fps::new(2, 1).unwrap()).unwrap();
    assert!(sink.is_finished());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps.num), (4, 2, 2));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);
    assert_eq!(sink.frames()[1].1.pixel(0, 0), Some([255, 255, 255, 255]));
}
