use crate::expression::ast::{BinaryOp, Expr, Lit, UnaryOp};
use crate::expression::bytecode::{BuiltinId, BytecodeProgram, ConstVal, Op};
use crate::expression::error::ExprError;
use crate::expression::parser::parse_expr;

pub(crate) fn compile_source(src: &str) -> Result<BytecodeProgram, ExprError> {
    let ast = parse_expr(src)?;
    lower_to_bytecode(&ast)
}

pub(crate) fn lower_to_bytecode(expr: &Expr) -> Result<BytecodeProgram, ExprError> {
    let mut p = BytecodeProgram::new();
    lower(expr, &mut p)?;
    Ok(p)
}

fn lower(expr: &Expr, p: &mut BytecodeProgram) -> Result<(), ExprError> {
    match expr {
        Expr::Lit(lit) => {
            let c = match *lit {
                Lit::Int(v) => ConstVal::Int(v),
                Lit::F64(v) => ConstVal::F64(v),
                Lit::Bool(v) => ConstVal::Bool(v),
            };
            let idx = p.push_const(c);
            p.ops.push(Op::PushConst(idx));
        }
        Expr::Path(segments) => lower_path(segments, p)?,
        Expr::Unary { op, expr } => {
            lower(expr, p)?;
            p.ops.push(match op {
                UnaryOp::Neg => Op::Neg,
                UnaryOp::Not => Op::Not,
            });
        }
        Expr::Binary { op, left, right } => {
            lower(left, p)?;
            lower(right, p)?;
            p.ops.push(match op {
                BinaryOp::Add => Op::Add,
                BinaryOp::Sub => Op::Sub,
                BinaryOp::Mul => Op::Mul,
                BinaryOp::Div => Op::Div,
                BinaryOp::Mod => Op::Mod,
                BinaryOp::Pow => Op::Pow,
                BinaryOp::Eq => Op::Eq,
                BinaryOp::Ne => Op::Ne,
                BinaryOp::Lt => Op::Lt,
                BinaryOp::Le => Op::Le,
                BinaryOp::Gt => Op::Gt,
                BinaryOp::Ge => Op::Ge,
                BinaryOp::And => Op::And,
                BinaryOp::Or => Op::Or,
            });
        }
        Expr::List(items) => {
            for item in items {
                lower(item, p)?;
            }
            let n = u32::try_from(items.len())
                .map_err(|_| ExprError::new(0, "list literal too long"))?;
            p.ops.push(Op::MakeList(n));
        }
        Expr::Call { func, args } => {
            let Some(id) = BuiltinId::from_name(func) else {
                return Err(ExprError::new(0, format!("unknown function '{func}'")));
            };
            let (lo, hi) = id.arity();
            if args.len() < lo || args.len() > hi {
                let expected = if lo == hi {
                    format!("{lo}")
                } else {
                    format!("{lo}..={hi}")
                };
                return Err(ExprError::new(
                    0,
                    format!(
                        "{func} expects {expected} args, got {}",
                        args.len()
                    ),
                ));
            }
            for a in args {
                lower(a, p)?;
            }
            p.ops.push(Op::CallBuiltin {
                id,
                argc: args.len() as u8,
            });
        }
    }
    Ok(())
}

fn lower_path(segments: &[String], p: &mut BytecodeProgram) -> Result<(), ExprError> {
    let name = match segments {
        [name] => name.as_str(),
        [ns, name] if matches!(ns.as_str(), "np" | "numpy" | "math") && name == "pi" => "pi",
        _ => {
            return Err(ExprError::new(
                0,
                format!("attribute access is not supported: {}", segments.join(".")),
            ));
        }
    };
    if name == "pi" {
        let idx = p.push_const(ConstVal::F64(std::f64::consts::PI));
        p.ops.push(Op::PushConst(idx));
    } else {
        let idx = p.intern_name(name);
        p.ops.push(Op::LoadVar(idx));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/expression/compile.rs"]
mod tests;
