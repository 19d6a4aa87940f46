use crate::expression::bytecode::{BuiltinId, BytecodeProgram, ConstVal, Op};
use crate::foundation::error::{PostproError, PostproResult};
use crate::foundation::math::{arange, linspace};

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// Boolean scalar.
    Bool(bool),
    /// Flat array; element-wise operations broadcast scalars against it.
    Array(Vec<f64>),
}

#[derive(Debug, Clone)]
pub(crate) struct VmError {
    pub(crate) message: String,
}

impl VmError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vm error: {}", self.message)
    }
}

impl std::error::Error for VmError {}

pub(crate) fn vm_to_postpro(e: VmError) -> PostproError {
    PostproError::evaluation(e.message)
}

pub(crate) fn eval_program(
    p: &BytecodeProgram,
    mut load_var: impl FnMut(&str) -> Result<Value, VmError>,
) -> Result<Value, VmError> {
    let mut stack: Vec<Value> = Vec::with_capacity(16);

    for &op in &p.ops {
        match op {
            Op::PushConst(idx) => {
                let c = p
                    .consts
                    .get(idx.0 as usize)
                    .ok_or_else(|| VmError::new("const idx out of range"))?;
                stack.push(match *c {
                    ConstVal::Int(v) => Value::Int(v),
                    ConstVal::F64(v) => Value::Float(v),
                    ConstVal::Bool(v) => Value::Bool(v),
                });
            }
            Op::LoadVar(idx) => {
                let name = p
                    .names
                    .get(idx.0 as usize)
                    .ok_or_else(|| VmError::new("name idx out of range"))?;
                stack.push(load_var(name)?);
            }

            Op::Neg => {
                let v = pop(&mut stack)?;
                stack.push(match v {
                    Value::Int(i) => i
                        .checked_neg()
                        .map(Value::Int)
                        .unwrap_or(Value::Float(-(i as f64))),
                    Value::Bool(b) => Value::Int(-i64::from(b)),
                    Value::Float(f) => Value::Float(-f),
                    Value::Array(a) => Value::Array(a.into_iter().map(|x| -x).collect()),
                });
            }
            Op::Not => {
                let v = pop(&mut stack)?;
                stack.push(match v {
                    Value::Array(a) => Value::Array(a.into_iter().map(|x| flag(x == 0.0)).collect()),
                    scalar => Value::Bool(!scalar.is_truthy()?),
                });
            }

            Op::Add => arith(&mut stack, i64::checked_add, |a, b| a + b)?,
            Op::Sub => arith(&mut stack, i64::checked_sub, |a, b| a - b)?,
            Op::Mul => arith(&mut stack, i64::checked_mul, |a, b| a * b)?,
            Op::Div => float_op(&mut stack, |a, b| a / b)?,
            Op::Mod => arith(&mut stack, int_mod, float_mod)?,
            Op::Pow => arith(&mut stack, int_pow, f64::powf)?,

            Op::Eq => compare(&mut stack, |a, b| a == b)?,
            Op::Ne => compare(&mut stack, |a, b| a != b)?,
            Op::Lt => compare(&mut stack, |a, b| a < b)?,
            Op::Le => compare(&mut stack, |a, b| a <= b)?,
            Op::Gt => compare(&mut stack, |a, b| a > b)?,
            Op::Ge => compare(&mut stack, |a, b| a >= b)?,
            Op::And => logic(&mut stack, |a, b| a && b)?,
            Op::Or => logic(&mut stack, |a, b| a || b)?,

            Op::MakeList(n) => {
                let n = n as usize;
                if stack.len() < n {
                    return Err(VmError::new("stack underflow in list literal"));
                }
                let items = stack.split_off(stack.len() - n);
                let mut out = Vec::with_capacity(n);
                for item in items {
                    match item {
                        Value::Array(a) => out.extend(a),
                        scalar => out.push(scalar.scalar()?),
                    }
                }
                stack.push(Value::Array(out));
            }
            Op::CallBuiltin { id, argc } => call_builtin(&mut stack, id, argc)?,
        }
    }

    if stack.len() != 1 {
        return Err(VmError::new(format!(
            "stack has {} values at end of program",
            stack.len()
        )));
    }
    pop(&mut stack)
}

impl Value {
    /// Scalar as `f64`; arrays of length one are unwrapped.
    pub fn as_f64(&self) -> PostproResult<f64> {
        self.scalar().map_err(vm_to_postpro)
    }

    /// Scalar as an integer; floats must be integral.
    pub fn as_i64(&self) -> PostproResult<i64> {
        self.int().map_err(vm_to_postpro)
    }

    /// Flatten into a list of floats; scalars become a single element.
    pub fn to_f64_vec(&self) -> PostproResult<Vec<f64>> {
        self.flat().map_err(vm_to_postpro)
    }

    pub(crate) fn scalar(&self) -> Result<f64, VmError> {
        match self {
            Self::Int(v) => Ok(*v as f64),
            Self::Float(v) => Ok(*v),
            Self::Bool(v) => Ok(f64::from(u8::from(*v))),
            Self::Array(a) if a.len() == 1 => Ok(a[0]),
            Self::Array(a) => Err(VmError::new(format!(
                "expected scalar, got array of length {}",
                a.len()
            ))),
        }
    }

    pub(crate) fn int(&self) -> Result<i64, VmError> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Bool(v) => Ok(i64::from(*v)),
            other => {
                let f = other.scalar()?;
                if f.fract() != 0.0 || !f.is_finite() {
                    return Err(VmError::new(format!("expected integer, got {f}")));
                }
                Ok(f as i64)
            }
        }
    }

    pub(crate) fn flat(&self) -> Result<Vec<f64>, VmError> {
        match self {
            Self::Array(a) => Ok(a.clone()),
            scalar => Ok(vec![scalar.scalar()?]),
        }
    }

    /// Number of elements; scalars count as one.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(a) => a.len(),
            _ => 1,
        }
    }

    /// True for an empty array.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Array(a) if a.is_empty())
    }

    /// Short name of the value kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Array(_) => "array",
        }
    }

    pub(crate) fn is_truthy(&self) -> Result<bool, VmError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(i) => Ok(*i != 0),
            Self::Float(f) => Ok(*f != 0.0),
            Self::Array(_) => Err(VmError::new("truth value of an array is ambiguous")),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Self::Array(v)
    }
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

fn pop(stack: &mut Vec<Value>) -> Result<Value, VmError> {
    stack.pop().ok_or_else(|| VmError::new("stack underflow"))
}

fn pop_pair(stack: &mut Vec<Value>) -> Result<(Value, Value), VmError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    Ok((a, b))
}

fn int_like(v: &Value) -> Option<i64> {
    match v {
        Value::Int(i) => Some(*i),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn int_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    // Result takes the sign of the divisor.
    Some(if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r })
}

fn float_mod(a: f64, b: f64) -> f64 {
    a - b * (a / b).floor()
}

fn int_pow(a: i64, b: i64) -> Option<i64> {
    let e = u32::try_from(b).ok()?;
    a.checked_pow(e)
}

/// Apply `f` element-wise with scalar broadcasting.
fn zip_map(a: &Value, b: &Value, f: impl Fn(f64, f64) -> f64) -> Result<Value, VmError> {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            if x.len() == y.len() {
                Ok(Value::Array(x.iter().zip(y).map(|(p, q)| f(*p, *q)).collect()))
            } else if y.len() == 1 {
                Ok(Value::Array(x.iter().map(|p| f(*p, y[0])).collect()))
            } else if x.len() == 1 {
                Ok(Value::Array(y.iter().map(|q| f(x[0], *q)).collect()))
            } else {
                Err(VmError::new(format!(
                    "array length mismatch: {} vs {}",
                    x.len(),
                    y.len()
                )))
            }
        }
        (Value::Array(x), s) => {
            let s = s.scalar()?;
            Ok(Value::Array(x.iter().map(|p| f(*p, s)).collect()))
        }
        (s, Value::Array(y)) => {
            let s = s.scalar()?;
            Ok(Value::Array(y.iter().map(|q| f(s, *q)).collect()))
        }
        (a, b) => Ok(Value::Float(f(a.scalar()?, b.scalar()?))),
    }
}

fn arith(
    stack: &mut Vec<Value>,
    fi: impl Fn(i64, i64) -> Option<i64>,
    ff: impl Fn(f64, f64) -> f64,
) -> Result<(), VmError> {
    let (a, b) = pop_pair(stack)?;
    if let (Some(x), Some(y)) = (int_like(&a), int_like(&b)) {
        if let Some(v) = fi(x, y) {
            stack.push(Value::Int(v));
            return Ok(());
        }
        if y == 0 {
            return Err(VmError::new("integer division or modulo by zero"));
        }
    }
    stack.push(zip_map(&a, &b, ff)?);
    Ok(())
}

fn float_op(stack: &mut Vec<Value>, f: impl Fn(f64, f64) -> f64) -> Result<(), VmError> {
    let (a, b) = pop_pair(stack)?;
    stack.push(zip_map(&a, &b, f)?);
    Ok(())
}

fn compare(stack: &mut Vec<Value>, f: impl Fn(f64, f64) -> bool) -> Result<(), VmError> {
    let (a, b) = pop_pair(stack)?;
    let v = zip_map(&a, &b, |x, y| flag(f(x, y)))?;
    stack.push(match v {
        Value::Array(_) => v,
        scalar => Value::Bool(scalar.scalar()? != 0.0),
    });
    Ok(())
}

fn logic(stack: &mut Vec<Value>, f: impl Fn(bool, bool) -> bool) -> Result<(), VmError> {
    let (a, b) = pop_pair(stack)?;
    if !matches!(a, Value::Array(_)) && !matches!(b, Value::Array(_)) {
        stack.push(Value::Bool(f(a.is_truthy()?, b.is_truthy()?)));
        return Ok(());
    }
    stack.push(zip_map(&a, &b, |x, y| flag(f(x != 0.0, y != 0.0)))?);
    Ok(())
}

fn map_unary(v: Value, f: impl Fn(f64) -> f64) -> Result<Value, VmError> {
    Ok(match v {
        Value::Array(a) => Value::Array(a.into_iter().map(f).collect()),
        scalar => Value::Float(f(scalar.scalar()?)),
    })
}

fn reduce(v: &Value, name: &str, f: impl Fn(f64, f64) -> f64) -> Result<Value, VmError> {
    match v {
        Value::Array(a) => {
            let mut it = a.iter().copied();
            let first = it
                .next()
                .ok_or_else(|| VmError::new(format!("{name} of an empty array")))?;
            Ok(Value::Float(it.fold(first, f)))
        }
        scalar => Ok(scalar.clone()),
    }
}

fn call_builtin(stack: &mut Vec<Value>, id: BuiltinId, argc: u8) -> Result<(), VmError> {
    let argc = argc as usize;
    if stack.len() < argc {
        return Err(VmError::new("stack underflow in builtin call"));
    }
    let args = stack.split_off(stack.len() - argc);

    let out = match (id, args.as_slice()) {
        (BuiltinId::Abs, [x]) => match x {
            Value::Int(i) => Value::Int(i.saturating_abs()),
            other => map_unary(other.clone(), f64::abs)?,
        },
        (BuiltinId::Sqrt, [x]) => map_unary(x.clone(), f64::sqrt)?,
        (BuiltinId::Exp, [x]) => map_unary(x.clone(), f64::exp)?,
        (BuiltinId::Log, [x]) => map_unary(x.clone(), f64::ln)?,
        (BuiltinId::Log10, [x]) => map_unary(x.clone(), f64::log10)?,
        (BuiltinId::Sin, [x]) => map_unary(x.clone(), f64::sin)?,
        (BuiltinId::Cos, [x]) => map_unary(x.clone(), f64::cos)?,
        (BuiltinId::Tan, [x]) => map_unary(x.clone(), f64::tan)?,
        (BuiltinId::Atan2, [y, x]) => zip_map(y, x, f64::atan2)?,
        (BuiltinId::Hypot, [a, b]) => zip_map(a, b, f64::hypot)?,
        (BuiltinId::Pow, [a, b]) => zip_map(a, b, f64::powf)?,
        (BuiltinId::Min, [x]) => reduce(x, "min", f64::min)?,
        (BuiltinId::Max, [x]) => reduce(x, "max", f64::max)?,
        (BuiltinId::Min, [a, b]) => match (int_like(a), int_like(b)) {
            (Some(x), Some(y)) => Value::Int(x.min(y)),
            _ => zip_map(a, b, f64::min)?,
        },
        (BuiltinId::Max, [a, b]) => match (int_like(a), int_like(b)) {
            (Some(x), Some(y)) => Value::Int(x.max(y)),
            _ => zip_map(a, b, f64::max)?,
        },
        (BuiltinId::Clamp, [x, lo, hi]) => {
            let lo = lo.scalar()?;
            let hi = hi.scalar()?;
            if lo > hi {
                return Err(VmError::new(format!("clamp bounds inverted: {lo} > {hi}")));
            }
            map_unary(x.clone(), |v| v.clamp(lo, hi))?
        }
        (BuiltinId::Where, [cond, a, b]) => {
            let n = cond.len().max(a.len()).max(b.len());
            let pick = |v: &Value, i: usize| -> Result<f64, VmError> {
                match v {
                    Value::Array(arr) if arr.len() == n => Ok(arr[i]),
                    Value::Array(arr) if arr.len() == 1 => Ok(arr[0]),
                    Value::Array(arr) => Err(VmError::new(format!(
                        "where: array length {} does not match {n}",
                        arr.len()
                    ))),
                    scalar => scalar.scalar(),
                }
            };
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                let c = pick(cond, i)? != 0.0;
                out.push(if c { pick(a, i)? } else { pick(b, i)? });
            }
            if [cond, a, b].iter().all(|v| !matches!(v, Value::Array(_))) {
                Value::Float(out[0])
            } else {
                Value::Array(out)
            }
        }
        (BuiltinId::Linspace, [start, stop, n]) => {
            let n = n.int()?;
            let n = usize::try_from(n)
                .map_err(|_| VmError::new(format!("linspace: negative sample count {n}")))?;
            Value::Array(linspace(start.scalar()?, stop.scalar()?, n))
        }
        (BuiltinId::Arange, rest) => {
            let (start, stop, step) = match rest {
                [stop] => (0.0, stop.scalar()?, 1.0),
                [start, stop] => (start.scalar()?, stop.scalar()?, 1.0),
                [start, stop, step] => (start.scalar()?, stop.scalar()?, step.scalar()?),
                _ => return Err(VmError::new("arange expects 1..=3 args")),
            };
            Value::Array(
                arange(start, stop, step)
                    .ok_or_else(|| VmError::new("arange: step must be finite and non-zero"))?,
            )
        }
        (BuiltinId::Mean, [x]) => {
            let v = x.flat()?;
            if v.is_empty() {
                return Err(VmError::new("mean of an empty array"));
            }
            Value::Float(v.iter().sum::<f64>() / v.len() as f64)
        }
        (id, args) => {
            return Err(VmError::new(format!(
                "{id:?} called with {} args",
                args.len()
            )));
        }
    };

    stack.push(out);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/expression/vm.rs"]
mod tests;
