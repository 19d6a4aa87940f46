use super::*;

#[test]
fn flatten_transparent_pixel_returns_background() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0, 0, 0, 0],
        premultiplied: true,
    };
    let mut dst = vec![0u8; 4];
    flatten_over_bg_to_opaque_rgba8(&mut dst, &frame, Rgba8::rgb(10, 20, 30)).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_pixel_is_identity() {
    let frame = FrameRGBA::filled(1, 1, Rgba8::rgb(1, 2, 3));
    let mut dst = vec![0u8; 4];
    flatten_over_bg_to_opaque_rgba8(&mut dst, &frame, Rgba8::WHITE).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn flatten_premultiplies_straight_frames() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![255, 0, 0, 128],
        premultiplied: false,
    };
    let mut dst = vec![0u8; 4];
    flatten_over_bg_to_opaque_rgba8(&mut dst, &frame, Rgba8::BLACK).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_rejects_length_mismatch() {
    let frame = FrameRGBA::filled(2, 1, Rgba8::WHITE);
    let mut dst = vec![0u8; 4];
    assert!(flatten_over_bg_to_opaque_rgba8(&mut dst, &frame, Rgba8::WHITE).is_err());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA::filled(2, 2, Rgba8::WHITE);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn odd_sized_frames_encode_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("clip/odd.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(SinkConfig {
        width: 33,
        height: 17,
        fps: Fps::new(1, 1).unwrap(),
    })
    .unwrap();
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &FrameRGBA::filled(33, 17, Rgba8::rgb(0, 0, 200)))
            .unwrap();
    }
    sink.end().unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn failed_stream_stops_the_child() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("broken.mp4")));
    sink.begin(SinkConfig {
        width: 4,
        height: 4,
        fps: Fps::new(1, 1).unwrap(),
    })
    .unwrap();
    let wrong = FrameRGBA::filled(2, 2, Rgba8::WHITE);
    assert!(sink.push_frame(FrameIndex(0), &wrong).is_err());
    assert!(sink.child.is_some());

    sink.abort();
    assert!(sink.child.is_none());
    assert!(sink.stdin.is_none());
    assert!(sink.stderr_drain.is_none());
    assert!(sink.end().is_err());
}

#[test]
fn dropping_an_unstarted_sink_is_quiet() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    drop(sink);
}
