use super::*;

#[test]
fn interns_names_once_and_folds_pi() {
    let p = compile_source("velocityx * velocityx + np.pi").unwrap();
    assert_eq!(p.names, vec!["velocityx".to_owned()]);
    assert!(
        p.consts
            .iter()
            .any(|c| *c == ConstVal::F64(std::f64::consts::PI))
    );
}

#[test]
fn rejects_unknown_functions_and_bad_arity() {
    let e = compile_source("frobnicate(1)").unwrap_err();
    assert!(e.message.contains("unknown function"));
    let e = compile_source("sqrt(1, 2)").unwrap_err();
    assert!(e.message.contains("sqrt expects 1 args"));
    assert!(compile_source("arange()").is_err());
    assert!(compile_source("arange(1, 2, 3, 4)").is_err());
}

#[test]
fn rejects_attribute_access() {
    assert!(compile_source("db.velocityx").is_err());
}
