//! Sandboxed expression language used by option values such as `plotfunc`, `clevels`,
//! scale functions and title/file-name templates.

pub(crate) mod ast;
pub(crate) mod bytecode;
pub(crate) mod compile;
pub(crate) mod error;
pub(crate) mod lexer;
pub(crate) mod parser;
pub(crate) mod template;
pub(crate) mod vm;

use std::collections::BTreeMap;

use crate::expression::bytecode::BytecodeProgram;
use crate::expression::error::ExprError;
use crate::foundation::error::{PostproError, PostproResult};

pub use template::{FormatSpec, Template, TitleTemplate};
pub use vm::Value;

/// Name resolution for expression identifiers.
pub trait Env {
    /// Value bound to `name`, or `None` when unbound.
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl<F> Env for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn lookup(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

/// Plain map-backed environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, Value>,
}

impl MapEnv {
    /// Empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Builder form of [`MapEnv::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }
}

impl Env for MapEnv {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.vars.get(name).cloned()
    }
}

/// Environment consulted in order; the first binding wins.
pub struct ChainEnv<'a> {
    layers: Vec<&'a dyn Env>,
}

impl<'a> ChainEnv<'a> {
    /// Chain the given environments, highest priority first.
    pub fn new(layers: Vec<&'a dyn Env>) -> Self {
        Self { layers }
    }
}

impl Env for ChainEnv<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.layers.iter().find_map(|env| env.lookup(name))
    }
}

/// A parsed and compiled expression, ready for repeated evaluation.
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    program: BytecodeProgram,
}

impl Expression {
    /// Parse and compile `src`.
    pub fn compile(src: &str) -> PostproResult<Self> {
        Self::from_source(src).map_err(|e| PostproError::expression(e.pointed(src)))
    }

    pub(crate) fn from_source(src: &str) -> Result<Self, ExprError> {
        Ok(Self {
            source: src.to_owned(),
            program: compile::compile_source(src)?,
        })
    }

    /// Source text as written in the configuration.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Free identifiers the expression reads, in first-use order.
    pub fn names(&self) -> &[String] {
        &self.program.names
    }

    /// Evaluate against `env`. Unbound identifiers are an error.
    pub fn eval(&self, env: &dyn Env) -> PostproResult<Value> {
        vm::eval_program(&self.program, |name| {
            env.lookup(name)
                .ok_or_else(|| vm::VmError::new(format!("unknown identifier '{name}'")))
        })
        .map_err(|e| PostproError::evaluation(format!("'{}': {}", self.source, e.message)))
    }

    /// Evaluate and coerce to a list of floats.
    pub fn eval_f64_list(&self, env: &dyn Env) -> PostproResult<Vec<f64>> {
        self.eval(env)?.to_f64_vec()
    }

    /// Evaluate and coerce to a scalar.
    pub fn eval_f64(&self, env: &dyn Env) -> PostproResult<f64> {
        self.eval(env)?.as_f64()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/expression.rs"]
mod tests;
