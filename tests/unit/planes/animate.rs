use serde_json::json;

use super::*;
use crate::dataset::AxisLabel;
use crate::encode::gif_supported;
use crate::foundation::core::Rgba8;
use crate::planes::tests::{action_options, fixed_env, plane_dataset};
use crate::render::FrameRGBA;
use crate::schema::merge_options;

fn options(input: serde_json::Value) -> Options {
    action_options("hh.makegif", DEFS, input)
}

#[test]
fn name_and_imagefilename_are_required() {
    assert!(merge_options("hh.animate", &json!({"name": "a.mp4"}), DEFS, &[]).is_err());
    let unnamed = options(json!({"name": "", "imagefilename": "f.png"}));
    assert!(AnimateAction::new(&unnamed, Container::Gif).is_err());
    let ok = options(json!({"name": "a.gif", "imagefilename": "f_{iter}.png", "fps": 2.5}));
    let action = AnimateAction::new(&ok, Container::Gif).unwrap();
    assert_eq!(action.name(), "makegif");
    assert_eq!(action.fps.as_f64(), 2.5);
}

#[test]
fn frame_paths_follow_plane_iterations() {
    let opts = options(json!({
        "name": "a.gif",
        "imagefilename": "f_{iplane}_{iter}_{time}.png",
    }));
    let action = AnimateAction::new(&opts, Container::Gif).unwrap();
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    assert_eq!(
        action.frame_paths(&ctx).unwrap(),
        vec![PathBuf::from("f_0_10_0.5.png"), PathBuf::from("f_0_20_1.0.png")]
    );
}

#[test]
fn makegif_times_override_uses_list_index_as_iter() {
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    for times in [json!("[100, 200]"), json!([100, 200]), json!("arange(100, 201, 100)")] {
        let opts = options(json!({
            "name": "a.gif",
            "imagefilename": "f_{time:.0f}_{iter}.png",
            "times": times,
        }));
        let action = AnimateAction::new(&opts, Container::Gif).unwrap();
        assert_eq!(
            action.frame_paths(&ctx).unwrap(),
            vec![PathBuf::from("f_100_0.png"), PathBuf::from("f_200_1.png")]
        );
    }
}

#[test]
fn unusable_times_override_falls_back() {
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    for times in [json!("[100, "), json!("undefined_name * 2"), json!(true)] {
        let opts = options(json!({
            "name": "a.gif",
            "imagefilename": "f_{iter}.png",
            "times": times,
        }));
        let action = AnimateAction::new(&opts, Container::Gif).unwrap();
        assert_eq!(
            action.frame_paths(&ctx).unwrap(),
            vec![PathBuf::from("f_10.png"), PathBuf::from("f_20.png")]
        );
    }
}

#[test]
fn animate_ignores_times() {
    let opts = options(json!({
        "name": "a.mp4",
        "imagefilename": "f_{iter}.png",
        "times": "[1]",
    }));
    let action = AnimateAction::new(&opts, Container::Mp4).unwrap();
    assert!(action.times.is_none());
}

#[test]
fn no_readable_frame_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(json!({
        "name": dir.path().join("out.gif").to_str().unwrap(),
        "imagefilename": format!("{}/missing_{{iter}}.png", dir.path().display()),
    }));
    let action = AnimateAction::new(&opts, Container::Gif).unwrap();
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    let res = action.execute(&ctx, &mut fixed_env());
    if gif_supported() {
        assert!(res.is_err());
    } else {
        assert!(res.is_ok());
    }
}

#[cfg(feature = "gif")]
#[test]
fn makegif_skips_mismatched_frames_and_writes_gif() {
    let dir = tempfile::tempdir().unwrap();
    FrameRGBA::filled(8, 6, Rgba8::BLACK).save(&dir.path().join("f_10.png")).unwrap();
    FrameRGBA::filled(4, 4, Rgba8::WHITE).save(&dir.path().join("f_20.png")).unwrap();
    let out = dir.path().join("movies/out.gif");
    let opts = options(json!({
        "name": out.to_str().unwrap(),
        "imagefilename": format!("{}/f_{{iter}}.png", dir.path().display()),
    }));
    let action = AnimateAction::new(&opts, Container::Gif).unwrap();
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    action.execute(&ctx, &mut fixed_env()).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
}
