use super::*;

fn panel() -> ContourPanel {
    let cmap = Colormap::by_name("viridis").unwrap();
    ContourPanel {
        xs: vec![0.0, 1.0, 0.0, 1.0],
        ys: vec![0.0, 0.0, 1.0, 1.0],
        n1: 2,
        n2: 2,
        values: vec![0.0, 1.0, 2.0, 3.0],
        bands: LevelBands::new(vec![0.0, 1.5, 3.0], &cmap).unwrap(),
        colorbar: None,
        xlabel: None,
        ylabel: None,
        xlim: None,
        ylim: None,
        axis_scale: AxisScale::Scaled,
        title: String::new(),
        fontsize: 10.0,
        overlays: Vec::new(),
    }
}

#[test]
fn axis_scale_parses_known_modes() {
    assert_eq!(AxisScale::parse("scaled").unwrap(), AxisScale::Scaled);
    assert_eq!(AxisScale::parse("equal").unwrap(), AxisScale::Equal);
    assert_eq!(AxisScale::parse("auto").unwrap(), AxisScale::Auto);
    assert!(AxisScale::parse("stretch").is_err());
    assert!(AxisScale::Image.keeps_data_aspect());
    assert!(!AxisScale::Tight.keeps_data_aspect());
}

#[test]
fn contour_panel_validates_grid_lengths() {
    assert!(panel().validate().is_ok());
    let mut p = panel();
    p.values.pop();
    assert!(p.validate().is_err());
    let mut p = panel();
    p.n1 = 1;
    p.n2 = 4;
    assert!(p.validate().is_err());
}

#[test]
fn figure_size_and_cells() {
    let fig = Figure::new([4.0, 2.0], 50.0, 2, 2).unwrap();
    assert_eq!(fig.pixel_size(), (200, 100));
    assert_eq!(fig.len(), 4);
    assert_eq!(fig.cell_rect(0), Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(fig.cell_rect(3), Rect::new(100.0, 50.0, 200.0, 100.0));
}

#[test]
fn figure_rejects_bad_dimensions() {
    assert!(Figure::new([0.0, 2.0], 50.0, 1, 1).is_err());
    assert!(Figure::new([2.0, 2.0], 50.0, 0, 1).is_err());
    assert!(Figure::new([400.0, 2.0], 100.0, 1, 1).is_err());
}

#[test]
fn set_panel_checks_index_and_content() {
    let mut fig = Figure::new([4.0, 2.0], 50.0, 1, 2).unwrap();
    fig.set_panel(1, Panel::Contour(Box::new(panel()))).unwrap();
    assert!(fig.panels()[0].is_none());
    assert!(fig.panels()[1].is_some());
    let err = fig
        .set_panel(2, Panel::Contour(Box::new(panel())))
        .unwrap_err();
    assert!(err.to_string().contains("out of range"));
    let mut bad = panel();
    bad.xs.clear();
    assert!(fig.set_panel(0, Panel::Contour(Box::new(bad))).is_err());
}

#[test]
fn store_reports_undeclared_figures() {
    let mut store = FigureStore::new();
    store.insert("wake", Figure::new([1.0, 1.0], 10.0, 1, 1).unwrap());
    assert!(store.get("wake").is_ok());
    assert!(store.get_mut("wake").is_ok());
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["wake"]);
    let err = store.get("other").unwrap_err().to_string();
    assert!(err.contains("figure 'other' was not declared"));
}
