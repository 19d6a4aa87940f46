use super::*;
use crate::expression::MapEnv;

fn env() -> MapEnv {
    MapEnv::new()
        .with("time", 456.0)
        .with("iter", 12i64)
        .with("iplane", 0i64)
        .with("iplot", 3i64)
}

#[test]
fn substitutes_ints_and_floats_like_python() {
    let t = Template::parse("plane_{iplane}_{iter}_{time}.png").unwrap();
    assert_eq!(t.render(&env()).unwrap(), "plane_0_12_456.0.png");
}

#[test]
fn applies_format_specs() {
    let t = Template::parse("{iter:05d}|{time:.2f}|{time:e}|{time*1000:g}|{iplot:>4}").unwrap();
    assert_eq!(
        t.render(&env()).unwrap(),
        "00012|456.00|4.560000e+02|456000|   3"
    );
    let t = Template::parse("{iter+0.5:08.3f}|{-time:+.0f}|{time:<7}|").unwrap();
    assert_eq!(t.render(&env()).unwrap(), "0012.500|-456|456.0  |");
}

#[test]
fn general_format_switches_to_exponent() {
    let t = Template::parse("{1234567.0:g}|{0.00001:g}|{0.5:.3g}").unwrap();
    assert_eq!(t.render(&env()).unwrap(), "1.23457e+06|1e-05|0.5");
}

#[test]
fn escapes_and_errors() {
    let t = Template::parse("{{literal}} {iter}").unwrap();
    assert_eq!(t.render(&env()).unwrap(), "{literal} 12");
    assert!(Template::parse("oops}").is_err());
    assert!(Template::parse("{iter").is_err());
    assert!(Template::parse("{}").is_err());
    assert!(Template::parse("{iter:zz}").is_err());
    assert!(Template::parse("plain.png").unwrap().is_literal());
}

#[test]
fn placeholder_errors_point_into_the_template() {
    let err = Template::parse("img/{ iter @ 2 }.png").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unexpected character '@'"), "{msg}");
    assert!(msg.ends_with("    img/{ iter @ 2 }.png\n               ^"), "{msg}");
}

#[test]
fn missing_names_fail_at_render() {
    let t = Template::parse("{nope}").unwrap();
    assert!(t.render(&env()).is_err());
}

#[test]
fn title_keeps_math_segments_verbatim() {
    let t = TitleTemplate::parse("$U_{h}$ at t={time:.1f} s, plot {iplot}").unwrap();
    assert_eq!(t.render(&env()).unwrap(), "$U_{h}$ at t=456.0 s, plot 3");
    let t = TitleTemplate::parse("cost $5").unwrap();
    assert_eq!(t.render(&env()).unwrap(), "cost $5");
}
