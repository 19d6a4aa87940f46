use super::*;

#[test]
fn theta_covers_full_turn_without_duplicate_endpoint() {
    let p = PolarGrid::new(2.0, 5, 8).unwrap();
    assert_eq!(p.theta.len(), 8);
    assert_eq!(p.theta[0], 0.0);
    assert!((p.theta[7] - 7.0 * TAU / 8.0).abs() < 1e-12);
    assert!(p.theta.iter().all(|&t| t < TAU));
    assert_eq!(p.r, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    assert_eq!(p.radius(), 2.0);
}

#[test]
fn rejects_degenerate_lattices() {
    assert!(PolarGrid::new(0.0, 4, 4).is_err());
    assert!(PolarGrid::new(1.0, 1, 4).is_err());
    assert!(PolarGrid::new(1.0, 4, 1).is_err());
}

#[test]
fn resamples_linear_field_exactly() {
    // f = x on a 5x5 grid over [-2, 2]^2.
    let n = 5usize;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for i in 0..n {
        for j in 0..n {
            xs.push(j as f64 - 2.0);
            ys.push(i as f64 - 2.0);
        }
    }
    let field = xs.clone();
    let grid = RectGrid::from_coords(&xs, &ys, n, n).unwrap();
    let polar = PolarGrid::new(1.0, 3, 4).unwrap();
    let out = cart_to_radial(&grid, &field, 0.0, 0.0, &polar);
    assert_eq!(out.len(), 12);
    // r = 1: theta 0, pi/2, pi, 3pi/2 -> x = 1, 0, -1, 0
    let last = &out[8..];
    let expected = [1.0, 0.0, -1.0, 0.0];
    for (a, b) in last.iter().zip(expected) {
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }

    let outside = cart_to_radial(&grid, &field, 1.5, 0.0, &polar);
    assert!(outside[8].is_nan());
}
