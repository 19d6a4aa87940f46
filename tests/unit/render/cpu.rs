use super::*;
use crate::foundation::core::Rgba8;
use crate::foundation::math::linspace;
use crate::render::colormap::{Colormap, LevelBands};
use crate::render::figure::{AxisScale, ContourPanel};

fn ramp_panel() -> ContourPanel {
    let (n1, n2) = (3, 4);
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for i in 0..n1 {
        for j in 0..n2 {
            xs.push(j as f64);
            ys.push(i as f64);
        }
    }
    ContourPanel {
        values: xs.clone(),
        xs,
        ys,
        n1,
        n2,
        bands: LevelBands::new(linspace(0.0, 3.0, 7), &Colormap::by_name("jet").unwrap())
            .unwrap(),
        colorbar: None,
        xlabel: None,
        ylabel: None,
        xlim: None,
        ylim: None,
        axis_scale: AxisScale::Auto,
        title: String::new(),
        fontsize: 8.0,
        overlays: Vec::new(),
    }
}

#[test]
fn empty_figure_renders_white() {
    let fig = Figure::new([2.0, 1.0], 20.0, 1, 1).unwrap();
    let frame = FigureRenderer::new().render(&fig).unwrap();
    assert_eq!((frame.width, frame.height), (40, 20));
    assert!(frame.premultiplied);
    assert!(frame.data.chunks_exact(4).all(|p| p == [255, 255, 255, 255]));
}

#[test]
fn contour_panel_paints_field_colors() {
    let fig = Figure::single([4.0, 3.0], 50.0, Panel::Contour(Box::new(ramp_panel()))).unwrap();
    let frame = FigureRenderer::default().render(&fig).unwrap();
    assert_eq!((frame.width, frame.height), (200, 150));
    let white = Rgba8::WHITE;
    let colored = frame
        .data
        .chunks_exact(4)
        .filter(|p| p[..3] != [white.r, white.g, white.b])
        .count();
    assert!(colored > 200 * 150 / 4, "only {colored} non-white pixels");
    assert!(frame.data.chunks_exact(4).all(|p| p[3] == 255));
}
