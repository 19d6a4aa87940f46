use serde_json::json;

use super::*;
use crate::dataset::AxisLabel;
use crate::planes::tests::{action_options, fixed_env, plane_dataset};
use crate::render::FrameRGBA;

fn build(input: serde_json::Value) -> PostproResult<Box<dyn Action>> {
    ENTRY.instantiate("hh", &input)
}

#[test]
fn defaults_build() {
    let action = build(json!({})).unwrap();
    assert_eq!(action.name(), "plot");
    assert!(!action.needs_plane_coords());
}

#[test]
fn rejects_bad_levels_ticks_and_aspect() {
    assert!(build(json!({"clevels": "[3, 2, 1]"})).is_err());
    assert!(build(json!({"clevels": "linspace(0, 1,"})).is_err());
    assert!(build(json!({"cbar_nticks": 1})).is_err());
    assert!(build(json!({"axisscale": "stretch"})).is_err());
    assert!(build(json!({"cmap": "not-a-map"})).is_err());
    assert!(build(json!({"plotturbines": {"basexyz": [0, 0, 0]}})).is_err());
}

#[test]
fn turbines_accept_one_mapping_or_a_list() {
    let turbine = json!({
        "basexyz": [1.0, 1.0, 0.0],
        "hubheight": 0.5,
        "rotordiameter": 1.0,
        "nacelledir": 270.0,
    });
    assert!(build(json!({"plotturbines": turbine.clone()})).is_ok());
    assert!(build(json!({"plotturbines": [turbine.clone(), turbine]})).is_ok());
}

#[test]
fn writes_one_image_per_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let template = format!("{}/img/vx_{{iplane}}_{{iter}}.png", dir.path().display());
    let opts = action_options(
        "hh.plot",
        DEFS,
        json!({
            "title": "t = {time:.2f} $U_x$",
            "plotfunc": "velocityx * 2",
            "clevels": "linspace(0, 10, 11)",
            "cbar_nticks": 3,
            "figsize": [3, 2],
            "dpi": 40,
            "savefile": template,
        }),
    );
    let action = PlotAction::build(&opts).unwrap();

    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    let mut env = fixed_env();
    action.execute(&ctx, &mut env).unwrap();

    for iter in [10, 20] {
        let path = dir.path().join(format!("img/vx_0_{iter}.png"));
        let img = FrameRGBA::load(&path).unwrap();
        assert_eq!((img.width, img.height), (120, 80));
    }
}

#[test]
fn literal_savefile_is_rewritten_each_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("last.png");
    let opts = action_options(
        "hh.plot",
        DEFS,
        json!({
            "clevels": "linspace(0, 10, 11)",
            "figsize": [3, 2],
            "dpi": 40,
            "savefile": out.display().to_string(),
        }),
    );
    let action = PlotAction::build(&opts).unwrap();

    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    action.execute(&ctx, &mut fixed_env()).unwrap();

    let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(written.len(), 1);
    assert!(FrameRGBA::load(&out).is_ok());
}

#[test]
fn plotfunc_length_mismatch_is_an_error() {
    let opts = action_options("hh.plot", DEFS, json!({"plotfunc": "[1, 2, 3]"}));
    let action = PlotAction::build(&opts).unwrap();
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    assert!(action.execute(&ctx, &mut fixed_env()).is_err());
}

#[test]
fn draws_into_a_declared_subplot() {
    let dir = tempfile::tempdir().unwrap();
    let opts = action_options(
        "hh.plot",
        DEFS,
        json!({
            "figname": "shared",
            "axesnumfunc": "iplane + 1",
            "xscalefunc": "x / 2",
            "savefile": format!("{}/shared_{{iter}}.png", dir.path().display()),
        }),
    );
    let action = PlotAction::build(&opts).unwrap();
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();

    let mut env = fixed_env();
    env.figures
        .insert("shared", Figure::new([4.0, 2.0], 30.0, 1, 2).unwrap());
    action.execute(&ctx, &mut env).unwrap();

    let fig = env.figures.get("shared").unwrap();
    assert!(fig.panels()[0].is_none());
    let Some(Panel::Contour(panel)) = &fig.panels()[1] else {
        panic!("subplot 1 was not filled");
    };
    assert_eq!(panel.xs[3], 1.5);
    let img = FrameRGBA::load(&dir.path().join("shared_20.png")).unwrap();
    assert_eq!((img.width, img.height), (120, 60));
}

#[test]
fn missing_figure_is_an_error() {
    let opts = action_options(
        "hh.plot",
        DEFS,
        json!({"figname": "nope", "axesnumfunc": "0"}),
    );
    let action = PlotAction::build(&opts).unwrap();
    let ds = plane_dataset();
    let ctx = PlaneContext::new("hh", &ds, AxisLabel::X, AxisLabel::Y, 0).unwrap();
    assert!(action.execute(&ctx, &mut fixed_env()).is_err());
}
