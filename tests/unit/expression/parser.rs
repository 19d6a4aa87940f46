use super::*;
use crate::expression::ast::Expr;

#[test]
fn parses_arithmetic_precedence() {
    let e = parse_expr("1+2*3").unwrap();
    match e {
        Expr::Binary {
            op: BinaryOp::Add, ..
        } => {}
        other => panic!("unexpected ast: {other:?}"),
    }
}

#[test]
fn power_binds_tighter_than_unary_minus_and_is_right_associative() {
    let e = parse_expr("-x**2").unwrap();
    match e {
        Expr::Unary {
            op: UnaryOp::Neg,
            expr,
        } => assert!(matches!(
            *expr,
            Expr::Binary {
                op: BinaryOp::Pow,
                ..
            }
        )),
        other => panic!("unexpected ast: {other:?}"),
    }

    let e = parse_expr("2^3^2").unwrap();
    match e {
        Expr::Binary {
            op: BinaryOp::Pow,
            right,
            ..
        } => assert!(matches!(
            *right,
            Expr::Binary {
                op: BinaryOp::Pow,
                ..
            }
        )),
        other => panic!("unexpected ast: {other:?}"),
    }
}

#[test]
fn parses_namespaced_calls_and_lists() {
    let e = parse_expr("np.linspace(0, 12, 121)").unwrap();
    match e {
        Expr::Call { func, args } => {
            assert_eq!(func, "linspace");
            assert_eq!(args.len(), 3);
        }
        other => panic!("unexpected ast: {other:?}"),
    }

    let e = parse_expr("[100, 200.5, 300,]").unwrap();
    assert_eq!(
        e,
        Expr::List(vec![
            Expr::Lit(Lit::Int(100)),
            Expr::Lit(Lit::F64(200.5)),
            Expr::Lit(Lit::Int(300)),
        ])
    );
}

#[test]
fn rejects_unknown_namespaces_and_garbage() {
    assert!(parse_expr("os.system(1)").is_err());
    assert!(parse_expr("lambda db, i: db['velocityx'][i]").is_err());
    assert!(parse_expr("1 +").is_err());
    assert!(parse_expr("(1").is_err());
}

#[test]
fn chained_comparisons_expand_to_a_conjunction() {
    let e = parse_expr("0 < x <= 5").unwrap();
    match e {
        Expr::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Binary { op: BinaryOp::Lt, .. }));
            assert!(matches!(*right, Expr::Binary { op: BinaryOp::Le, .. }));
        }
        other => panic!("unexpected ast: {other:?}"),
    }
}
