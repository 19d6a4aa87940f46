use super::*;

#[test]
fn fps_from_integral_and_fractional_values() {
    assert_eq!(Fps::from_f64(20.0).unwrap(), Fps { num: 20, den: 1 });
    let f = Fps::from_f64(2.5).unwrap();
    assert_eq!(f, Fps { num: 2500, den: 1000 });
    assert!((f.frame_duration_secs() - 0.4).abs() < 1e-12);
    assert!(Fps::from_f64(0.0).is_err());
    assert!(Fps::from_f64(f64::NAN).is_err());
}

#[test]
fn color_parse_accepts_hex_codes_and_names() {
    assert_eq!(Rgba8::parse("k").unwrap(), Rgba8::BLACK);
    assert_eq!(Rgba8::parse("#ff8000").unwrap(), Rgba8::rgb(255, 128, 0));
    assert_eq!(Rgba8::parse("#00000080").unwrap().a, 128);
    assert!(Rgba8::parse("#zz0000").is_err());
    assert!(Rgba8::parse("chartreuse-ish").is_err());
}

#[test]
fn color_alpha_and_hex_helpers() {
    let c = Rgba8::rgb(1, 2, 3).with_alpha(0.5);
    assert_eq!(c.a, 128);
    assert_eq!(c.to_hex(), "#010203");
}
