use super::*;

#[test]
fn linspace_includes_both_endpoints() {
    let v = linspace(2.0, 7.0, 121);
    assert_eq!(v.len(), 121);
    assert_eq!(v[0], 2.0);
    assert_eq!(v[120], 7.0);
    assert!((v[1] - v[0] - 5.0 / 120.0).abs() < 1e-12);
    assert!(linspace(0.0, 1.0, 0).is_empty());
    assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
}

#[test]
fn arange_is_half_open() {
    assert_eq!(arange(0.0, 2.0, 0.5).unwrap(), vec![0.0, 0.5, 1.0, 1.5]);
    assert!(arange(0.0, 1.0, 0.0).is_none());
    assert!(arange(5.0, 1.0, 1.0).unwrap().is_empty());
}

#[test]
fn nice_ticks_land_on_round_numbers() {
    assert_eq!(nice_ticks(0.0, 12.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
    let t = nice_ticks(-0.3, 0.95, 5);
    assert_eq!(t, vec![-0.25, 0.0, 0.25, 0.5, 0.75]);
    assert_eq!(nice_ticks(4.0, 4.0, 5), vec![4.0]);
    assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
}

#[test]
fn tick_labels_use_step_precision() {
    assert_eq!(format_ticks(&[0.0, 2.0, 4.0]), vec!["0", "2", "4"]);
    assert_eq!(format_ticks(&[-0.25, 0.0, 0.25]), vec!["-0.25", "0.00", "0.25"]);
    assert_eq!(format_ticks(&[1.5]), vec!["1.5"]);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}
