use serde_json::json;

use super::*;
use crate::planes::tests::fixed_env;

#[test]
fn registers_each_declared_figure() {
    let plugin = entry()
        .instantiate(&json!([
            {"name": "top", "nrows": 2, "ncols": 1},
            {"name": "side", "figsize": [4, 4], "dpi": 50},
        ]))
        .unwrap();
    assert_eq!(plugin.name(), "figure");

    let mut env = fixed_env();
    plugin.execute(&mut env).unwrap();
    assert_eq!(env.figures.get("top").unwrap().len(), 2);
    assert_eq!(env.figures.get("side").unwrap().pixel_size(), (200, 200));
}

#[test]
fn rejects_bad_geometry_before_running() {
    assert!(entry().instantiate(&json!({"name": "f", "nrows": 0})).is_err());
    assert!(entry().instantiate(&json!({"nrows": 1})).is_err());
    assert!(entry().instantiate(&json!({"name": "f", "plot": {}})).is_err());
}
