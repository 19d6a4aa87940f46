use serde_json::json;

use super::*;
use crate::dataset::AxisLabel;
use crate::planes::tests::{action_options, fixed_env, plane_dataset};
use crate::render::FrameRGBA;

#[test]
fn requires_lattice_and_centre() {
    assert!(ENTRY.instantiate("hh", &json!({})).is_err());
    assert!(ENTRY
        .instantiate("hh", &json!({"LR": 1.0, "NR": 8, "NTheta": 16, "xc": 1.5}))
        .is_err());
    let ok = json!({"LR": 1.0, "NR": 8, "NTheta": 16, "xc": 1.5, "yc": 1.0});
    assert_eq!(ENTRY.instantiate("hh", &ok).unwrap().name(), "plot_radial");
    let bad = json!({"LR": -1.0, "NR": 8, "NTheta": 16, "xc": 1.5, "yc": 1.0});
    assert!(ENTRY.instantiate("hh", &bad).is_err());
}

#[test]
fn finite_range_ignores_nan_and_falls_back() {
    assert_eq!(finite_range(&[f64::NAN, 2.0, -1.0, f64::INFINITY]), (-1.0, 2.0));
    assert_eq!(finite_range(&[f64::NAN]), (0.0, 1.0));
    assert_eq!(finite_range(&[]), (0.0, 1.0));
}

#[test]
fn partial_bounds_fall_back_to_auto() {
    let base = json!({"LR": 1.0, "NR": 4, "NTheta": 8, "xc": 1.5, "yc": 1.0, "vmin": 0.0});
    let opts = action_options("hh.plot_radial", DEFS, base);
    assert!(opts.is_set("vmin"));
    // Builds without complaint; bounds are derived from the data at run time.
    assert!(RadialAction::build(&opts).is_ok());
}

#[test]
fn saves_polar_image_per_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let opts = action_options(
        "hh.plot_radial",
        DEFS,
        json!({
            "LR": 1.0,
            "NR": 16,
            "NTheta": 32,
            "xc": 1.5,
            "yc": 1.0,
            "figsize": [2, 2],
            "dpi": 50,
            "title": "Wake $U$",
            "savefile": format!("{}/polar_{{time}}_{{iter}}.png", dir.path().display()),
        }),
    );
    let action = RadialAction::build(&opts).unwrap();
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    action.execute(&ctx, &mut fixed_env()).unwrap();

    for name in ["polar_0.5_10.png", "polar_1.0_20.png"] {
        let img = FrameRGBA::load(&dir.path().join(name)).unwrap();
        assert_eq!((img.width, img.height), (100, 100));
    }
}
