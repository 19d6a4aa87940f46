use super::*;

/// x along dim2 = [0, 1, 2], y along dim1 = [10, 20].
fn grid() -> (RectGrid, Vec<f64>) {
    let xs = vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
    let ys = vec![10.0, 10.0, 10.0, 20.0, 20.0, 20.0];
    let field = vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
    (RectGrid::from_coords(&xs, &ys, 2, 3).unwrap(), field)
}

#[test]
fn bilinear_and_nearest_inside_the_grid() {
    let (g, f) = grid();
    assert_eq!(g.u(), &[0.0, 1.0, 2.0]);
    assert_eq!(g.v(), &[10.0, 20.0]);
    assert!((g.sample(&f, 0.5, 15.0, InterpMethod::Linear) - 5.5).abs() < 1e-12);
    assert_eq!(g.sample(&f, 2.0, 20.0, InterpMethod::Linear), 12.0);
    assert_eq!(g.sample(&f, 1.6, 11.0, InterpMethod::Nearest), 2.0);
}

#[test]
fn outside_points_are_nan() {
    let (g, f) = grid();
    assert!(g.sample(&f, -0.1, 15.0, InterpMethod::Linear).is_nan());
    assert!(g.sample(&f, 1.0, 25.0, InterpMethod::Nearest).is_nan());
    assert!(g.sample(&f, f64::NAN, 15.0, InterpMethod::Linear).is_nan());
}

#[test]
fn transposed_and_descending_axes() {
    // x runs along dim1 (descending), y along dim2.
    let xs = vec![2.0, 2.0, 0.0, 0.0];
    let ys = vec![5.0, 6.0, 5.0, 6.0];
    let field = vec![20.0, 21.0, 0.0, 1.0];
    let g = RectGrid::from_coords(&xs, &ys, 2, 2).unwrap();
    assert_eq!(g.u(), &[2.0, 0.0]);
    assert!((g.sample(&field, 1.0, 5.5, InterpMethod::Linear) - 10.5).abs() < 1e-12);
}

#[test]
fn rejects_skewed_grids_and_bad_methods() {
    let xs = vec![0.0, 1.0, 0.5, 1.5];
    let ys = vec![0.0, 0.0, 1.0, 1.0];
    assert!(RectGrid::from_coords(&xs, &ys, 2, 2).is_err());
    assert!(RectGrid::from_coords(&xs, &ys, 3, 2).is_err());
    assert_eq!(InterpMethod::parse("nearest").unwrap(), InterpMethod::Nearest);
    assert!(InterpMethod::parse("cubic").is_err());
}
