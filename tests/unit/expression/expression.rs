use super::*;

#[test]
fn compiles_once_and_evaluates_against_env() {
    let e = Expression::compile("sqrt(velocityx**2 + velocityy**2)").unwrap();
    assert_eq!(e.names(), ["velocityx", "velocityy"]);
    let env = MapEnv::new()
        .with("velocityx", vec![3.0, 0.0])
        .with("velocityy", vec![4.0, 2.0]);
    assert_eq!(e.eval(&env).unwrap(), Value::Array(vec![5.0, 2.0]));
}

#[test]
fn unknown_identifier_is_an_evaluation_error() {
    let e = Expression::compile("velocityx + 1").unwrap();
    let err = e.eval(&MapEnv::new()).unwrap_err();
    assert!(matches!(err, PostproError::Evaluation(_)));
    assert!(err.to_string().contains("unknown identifier 'velocityx'"));
}

#[test]
fn parse_failures_are_expression_errors() {
    let err = Expression::compile("lambda x: x").unwrap_err();
    assert!(matches!(err, PostproError::Expression(_)));
}

#[test]
fn chained_and_closure_envs() {
    let inner = MapEnv::new().with("x", 1.0).with("y", 2.0);
    let outer = |name: &str| (name == "x").then_some(Value::Float(10.0));
    let env = ChainEnv::new(vec![&outer as &dyn Env, &inner]);
    let e = Expression::compile("x + y").unwrap();
    assert_eq!(e.eval_f64(&env).unwrap(), 12.0);
}

#[test]
fn compile_errors_point_at_the_offending_byte() {
    let err = Expression::compile("velocityx @ 2").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unexpected character '@'"), "{msg}");
    assert!(msg.ends_with("    velocityx @ 2\n              ^"), "{msg}");
}

#[test]
fn chained_comparisons_read_like_python() {
    let env = MapEnv::new().with("x", vec![-1.0, 2.0, 7.0]);
    let yes = Expression::compile("3 > 2 > 1").unwrap();
    assert_eq!(yes.eval(&MapEnv::new()).unwrap(), Value::Bool(true));
    let no = Expression::compile("1 < 2 < 2").unwrap();
    assert_eq!(no.eval(&MapEnv::new()).unwrap(), Value::Bool(false));
    let band = Expression::compile("0 < x < 5").unwrap();
    assert_eq!(band.eval(&env).unwrap(), Value::Array(vec![0.0, 1.0, 0.0]));
}
