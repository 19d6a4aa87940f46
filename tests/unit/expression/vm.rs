use super::*;
use crate::expression::compile::compile_source;

fn run(src: &str) -> Value {
    let p = compile_source(src).unwrap();
    eval_program(&p, |name| match name {
        "a" => Ok(Value::Array(vec![1.0, 2.0, 3.0])),
        "b" => Ok(Value::Array(vec![3.0, 2.0, 1.0])),
        "n" => Ok(Value::Int(7)),
        other => Err(VmError::new(format!("unbound {other}"))),
    })
    .unwrap()
}

#[test]
fn integer_arithmetic_stays_integral() {
    assert_eq!(run("1 + 2 * 3"), Value::Int(7));
    assert_eq!(run("2 ** 10"), Value::Int(1024));
    assert_eq!(run("7 / 2"), Value::Float(3.5));
    assert_eq!(run("-7 % 3"), Value::Int(2));
    assert_eq!(run("7 % -3"), Value::Int(-2));
    assert_eq!(run("2 ** -1"), Value::Float(0.5));
}

#[test]
fn float_modulo_follows_divisor_sign() {
    assert_eq!(run("-7.5 % 2"), Value::Float(0.5));
}

#[test]
fn integer_modulo_by_zero_is_an_error() {
    let p = compile_source("n % 0").unwrap();
    let err = eval_program(&p, |_| Ok(Value::Int(1))).unwrap_err();
    assert!(err.message.contains("by zero"));
}

#[test]
fn arrays_broadcast_elementwise() {
    assert_eq!(run("a * 2"), Value::Array(vec![2.0, 4.0, 6.0]));
    assert_eq!(run("a + b"), Value::Array(vec![4.0, 4.0, 4.0]));
    assert_eq!(run("sqrt(a**2)"), Value::Array(vec![1.0, 2.0, 3.0]));
    assert_eq!(run("a > 1"), Value::Array(vec![0.0, 1.0, 1.0]));
    assert_eq!(
        run("where(a > b, a, -b)"),
        Value::Array(vec![-3.0, -2.0, 3.0])
    );
}

#[test]
fn mismatched_array_lengths_fail() {
    let p = compile_source("a + [1, 2]").unwrap();
    let err = eval_program(&p, |_| Ok(Value::Array(vec![1.0, 2.0, 3.0]))).unwrap_err();
    assert!(err.message.contains("length mismatch"));
}

#[test]
fn reductions_and_generators() {
    assert_eq!(run("max(a)"), Value::Float(3.0));
    assert_eq!(run("min(n, 3)"), Value::Int(3));
    assert_eq!(run("mean(a)"), Value::Float(2.0));
    assert_eq!(run("linspace(0, 1, 3)"), Value::Array(vec![0.0, 0.5, 1.0]));
    assert_eq!(run("arange(3)"), Value::Array(vec![0.0, 1.0, 2.0]));
    assert_eq!(
        run("arange(100, 400, 100)"),
        Value::Array(vec![100.0, 200.0, 300.0])
    );
    assert_eq!(run("[1, a, 5]"), Value::Array(vec![1.0, 1.0, 2.0, 3.0, 5.0]));
}

#[test]
fn logic_and_comparisons_on_scalars() {
    assert_eq!(run("1 < 2 && !(n == 7)"), Value::Bool(false));
    assert_eq!(run("true || false"), Value::Bool(true));
    assert_eq!(run("clamp(15, 0, 10)"), Value::Float(10.0));
}

#[test]
fn value_coercions() {
    assert_eq!(Value::Array(vec![2.5]).as_f64().unwrap(), 2.5);
    assert!(Value::Array(vec![1.0, 2.0]).as_f64().is_err());
    assert_eq!(Value::Float(4.0).as_i64().unwrap(), 4);
    assert!(Value::Float(4.5).as_i64().is_err());
    assert_eq!(Value::Int(3).to_f64_vec().unwrap(), vec![3.0]);
}
