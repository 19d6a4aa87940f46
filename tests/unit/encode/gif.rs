use super::*;
use image::AnimationDecoder;

#[test]
fn writes_looping_animation_with_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("anim/out.gif");
    let mut sink = GifSink::new(&out);
    sink.begin(SinkConfig {
        width: 6,
        height: 4,
        fps: crate::foundation::core::Fps::new(2, 1).unwrap(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &FrameRGBA::filled(6, 4, Rgba8::rgb(255, 0, 0)))
        .unwrap();
    sink.push_frame(FrameIndex(1), &FrameRGBA::filled(6, 4, Rgba8::rgb(0, 0, 255)))
        .unwrap();
    sink.end().unwrap();

    let file = std::io::BufReader::new(File::open(&out).unwrap());
    let decoder = image::codecs::gif::GifDecoder::new(file).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 2);
    let (num, den) = frames[0].delay().numer_denom_ms();
    assert_eq!(num / den, 500);
}

#[test]
fn rejects_out_of_order_and_mismatched_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = GifSink::new(dir.path().join("x.gif"));
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        fps: crate::foundation::core::Fps::new(1, 1).unwrap(),
    })
    .unwrap();
    let f = FrameRGBA::filled(2, 2, Rgba8::WHITE);
    sink.push_frame(FrameIndex(1), &f).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &f).is_err());
    let big = FrameRGBA::filled(3, 2, Rgba8::WHITE);
    assert!(sink.push_frame(FrameIndex(2), &big).is_err());
}
