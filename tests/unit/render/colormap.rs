use super::*;

#[test]
fn endpoints_match_table_stops() {
    let c = Colormap::by_name("viridis").unwrap();
    assert_eq!(c.sample(0.0), Rgba8::rgb(0x44, 0x01, 0x54));
    assert_eq!(c.sample(1.0), Rgba8::rgb(0xfd, 0xe7, 0x25));
    assert_eq!(c.sample(-3.0), c.sample(0.0));
    assert_eq!(c.sample(7.0), c.sample(1.0));
}

#[test]
fn reversed_suffix_flips_the_map() {
    let c = Colormap::by_name("coolwarm_r").unwrap();
    assert_eq!(c.name(), "coolwarm_r");
    assert_eq!(c.sample(0.0), Rgba8::rgb(0xb4, 0x04, 0x26));
}

#[test]
fn gray_interpolates_linearly() {
    let c = Colormap::by_name("gray").unwrap();
    assert_eq!(c.sample(0.5), Rgba8::rgb(128, 128, 128));
}

#[test]
fn unknown_map_lists_known_names() {
    let err = Colormap::by_name("rainbowish").unwrap_err().to_string();
    assert!(err.contains("unknown colormap 'rainbowish'"));
    assert!(err.contains("coolwarm"));
}

#[test]
fn bands_color_midpoints_and_extend_both_ends() {
    let gray = Colormap::by_name("gray").unwrap();
    let bands = LevelBands::new(vec![0.0, 1.0, 2.0], &gray).unwrap();
    assert_eq!(bands.band_colors().len(), 2);
    assert_eq!(bands.band_colors()[0], gray.sample(0.25));
    assert_eq!(bands.band_colors()[1], gray.sample(0.75));
    assert_eq!(bands.color_of(0.5), Some(gray.sample(0.25)));
    assert_eq!(bands.color_of(1.0), Some(gray.sample(0.75)));
    assert_eq!(bands.color_of(2.0), Some(gray.sample(0.75)));
    assert_eq!(bands.color_of(-1.0), Some(bands.under()));
    assert_eq!(bands.color_of(9.0), Some(bands.over()));
    assert_eq!(bands.color_of(f64::NAN), None);
}

#[test]
fn bands_reject_bad_levels() {
    let c = Colormap::by_name("jet").unwrap();
    assert!(LevelBands::new(vec![1.0], &c).is_err());
    assert!(LevelBands::new(vec![0.0, 0.0, 1.0], &c).is_err());
    assert!(LevelBands::new(vec![0.0, f64::NAN], &c).is_err());
    assert!(LevelBands::new(vec![2.0, 1.0], &c).is_err());
}
