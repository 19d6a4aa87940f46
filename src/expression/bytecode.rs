#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConstIdx(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NameIdx(pub(crate) u32);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConstVal {
    Int(i64),
    F64(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinId {
    Abs,
    Sqrt,
    Exp,
    Log,
    Log10,
    Sin,
    Cos,
    Tan,
    Atan2,
    Hypot,
    Pow,
    Min,
    Max,
    Clamp,
    Where,
    Linspace,
    Arange,
    Mean,
}

impl BuiltinId {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "abs" => Self::Abs,
            "sqrt" => Self::Sqrt,
            "exp" => Self::Exp,
            "log" => Self::Log,
            "log10" => Self::Log10,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "atan2" | "arctan2" => Self::Atan2,
            "hypot" => Self::Hypot,
            "pow" | "power" => Self::Pow,
            "min" | "amin" => Self::Min,
            "max" | "amax" => Self::Max,
            "clamp" | "clip" => Self::Clamp,
            "where" => Self::Where,
            "linspace" => Self::Linspace,
            "arange" => Self::Arange,
            "mean" => Self::Mean,
            _ => return None,
        })
    }

    /// Accepted argument counts, inclusive.
    pub(crate) fn arity(self) -> (usize, usize) {
        match self {
            Self::Abs
            | Self::Sqrt
            | Self::Exp
            | Self::Log
            | Self::Log10
            | Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Mean => (1, 1),
            Self::Atan2 | Self::Hypot | Self::Pow => (2, 2),
            Self::Min | Self::Max => (1, 2),
            Self::Clamp | Self::Where | Self::Linspace => (3, 3),
            Self::Arange => (1, 3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    PushConst(ConstIdx),
    LoadVar(NameIdx),

    Neg,
    Not,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,

    MakeList(u32),
    CallBuiltin { id: BuiltinId, argc: u8 },
}

#[derive(Debug, Clone)]
pub(crate) struct BytecodeProgram {
    pub(crate) ops: Vec<Op>,
    pub(crate) consts: Vec<ConstVal>,
    pub(crate) names: Vec<String>,
}

impl BytecodeProgram {
    pub(crate) fn new() -> Self {
        Self {
            ops: Vec::new(),
            consts: Vec::new(),
            names: Vec::new(),
        }
    }

    pub(crate) fn push_const(&mut self, c: ConstVal) -> ConstIdx {
        let idx = ConstIdx(self.consts.len() as u32);
        self.consts.push(c);
        idx
    }

    pub(crate) fn intern_name(&mut self, name: &str) -> NameIdx {
        if let Some(i) = self.names.iter().position(|n| n == name) {
            return NameIdx(i as u32);
        }
        self.names.push(name.to_owned());
        NameIdx((self.names.len() - 1) as u32)
    }
}
