use serde_json::json;

use super::*;

const DEFS: &[OptionDef] = &[
    OptionDef::required("name", OptionDefault::Str(""), "An arbitrary name"),
    OptionDef::optional("fps", OptionDefault::Int(1), "Frames per second"),
    OptionDef::optional("figsize", OptionDefault::Floats(&[8.0, 5.0]), "Figure size"),
    OptionDef::optional("vmin", OptionDefault::Null, "Minimum color range"),
    OptionDef::optional("cbar", OptionDefault::Bool(true), "Include colorbar"),
];

#[test]
fn defaults_fill_absent_keys() {
    let o = merge_options("t", &json!({"name": "wake"}), DEFS, &[]).unwrap();
    assert_eq!(o.str("name").unwrap(), "wake");
    assert_eq!(o.usize("fps").unwrap(), 1);
    assert_eq!(o.f64_pair("figsize").unwrap(), [8.0, 5.0]);
    assert_eq!(o.opt_f64("vmin").unwrap(), None);
    assert!(o.bool("cbar").unwrap());
    assert!(!o.is_set("vmin"));
}

#[test]
fn missing_required_key_is_an_error() {
    let err = merge_options("t", &json!({"fps": 3}), DEFS, &[]).unwrap_err();
    assert!(err.to_string().contains("required option 'name'"));
}

#[test]
fn unknown_keys_are_rejected_unless_listed_as_extra() {
    let input = json!({"name": "a", "plot": {"cmap": "viridis"}, "bogus": 1});
    let err = merge_options("t", &input, DEFS, &["plot"]).unwrap_err();
    assert!(err.to_string().contains("bogus"));
    assert!(!err.to_string().contains("plot,"));

    let input = json!({"name": "a", "plot": {"cmap": "viridis"}});
    let o = merge_options("t", &input, DEFS, &["plot"]).unwrap();
    assert_eq!(o.raw("plot"), Some(&json!({"cmap": "viridis"})));
}

#[test]
fn null_input_behaves_like_empty_mapping() {
    let defs = &DEFS[1..];
    let o = merge_options("t", &Value::Null, defs, &[]).unwrap();
    assert_eq!(o.usize("fps").unwrap(), 1);
    assert!(merge_options("t", &json!(3), defs, &[]).is_err());
}

#[test]
fn typed_accessors_report_mismatches() {
    let o = merge_options("t.a", &json!({"name": 5, "fps": -1}), DEFS, &[]).unwrap();
    let err = o.str("name").unwrap_err().to_string();
    assert!(err.contains("t.a.name"), "{err}");
    assert!(o.usize("fps").is_err());
    assert_eq!(o.opt_expr("name").unwrap().as_deref(), Some("5"));
}

#[test]
fn describe_lists_every_key() {
    let s = describe("animate", "Generate animation", DEFS);
    for d in DEFS {
        assert!(s.contains(d.key));
    }
    assert!(s.contains("required"));
}
