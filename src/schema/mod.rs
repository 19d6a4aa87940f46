//! Declarative option schemas.
//!
//! Plugins and actions describe their configuration as a static list of [`OptionDef`]s.
//! User input is merged against that list into an [`Options`] bag, which then offers typed
//! accessors so each consumer can build its own strongly typed settings.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value;

use crate::foundation::error::{PostproError, PostproResult};

/// Default value of a declared option.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OptionDefault {
    /// No value (`null`).
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String (also used for expression sources).
    Str(&'static str),
    /// List of floats.
    Floats(&'static [f64]),
    /// List of strings.
    Strs(&'static [&'static str]),
}

impl OptionDefault {
    /// JSON representation of the default.
    pub fn to_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(v) => Value::Bool(v),
            Self::Int(v) => Value::from(v),
            Self::Float(v) => Value::from(v),
            Self::Str(v) => Value::from(v),
            Self::Floats(v) => Value::from(v.to_vec()),
            Self::Strs(v) => Value::from(v.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>()),
        }
    }
}

/// One declared configuration option.
#[derive(Clone, Copy, Debug)]
pub struct OptionDef {
    /// Option name as written in the configuration document.
    pub key: &'static str,
    /// Whether the user must provide it.
    pub required: bool,
    /// Value used when the user does not provide it.
    pub default: OptionDefault,
    /// Human readable description.
    pub help: &'static str,
}

impl OptionDef {
    /// Declare an optional key.
    pub const fn optional(key: &'static str, default: OptionDefault, help: &'static str) -> Self {
        Self {
            key,
            required: false,
            default,
            help,
        }
    }

    /// Declare a required key.
    pub const fn required(key: &'static str, default: OptionDefault, help: &'static str) -> Self {
        Self {
            key,
            required: true,
            default,
            help,
        }
    }
}

/// Merge user input against `defs`.
///
/// Declared keys take the user value or their default. A missing required key or a key
/// that is neither declared nor listed in `extra_keys` is an error. Extra keys (nested
/// action sections) are carried through untouched. A `null` input counts as an empty
/// mapping.
pub fn merge_options(
    owner: &str,
    input: &Value,
    defs: &[OptionDef],
    extra_keys: &[&str],
) -> PostproResult<Options> {
    let empty = serde_json::Map::new();
    let map = match input {
        Value::Object(m) => m,
        Value::Null => &empty,
        other => {
            return Err(PostproError::validation(format!(
                "{owner}: expected a mapping of options, got {}",
                type_name(other)
            )));
        }
    };

    let unknown: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|k| !defs.iter().any(|d| d.key == *k) && !extra_keys.contains(k))
        .collect();
    if !unknown.is_empty() {
        return Err(PostproError::validation(format!(
            "{owner}: unrecognized option(s): {}",
            unknown.join(", ")
        )));
    }

    let mut values = BTreeMap::new();
    for def in defs {
        let v = match map.get(def.key) {
            Some(v) => v.clone(),
            None if def.required => {
                return Err(PostproError::validation(format!(
                    "{owner}: required option '{}' not present",
                    def.key
                )));
            }
            None => def.default.to_value(),
        };
        values.insert(def.key.to_owned(), v);
    }
    for key in extra_keys {
        if let Some(v) = map.get(*key) {
            values.insert((*key).to_owned(), v.clone());
        }
    }

    Ok(Options {
        owner: owner.to_owned(),
        values,
    })
}

/// Render a schema as a human-readable table.
pub fn describe(title: &str, blurb: &str, defs: &[OptionDef]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}: {blurb}");
    let width = defs.iter().map(|d| d.key.len()).max().unwrap_or(0);
    for d in defs {
        let flag = if d.required { "required" } else { "optional" };
        let _ = writeln!(
            out,
            "  {:<width$}  {flag:<8}  default: {:<28}  {}",
            d.key,
            d.default.to_value().to_string(),
            d.help,
        );
    }
    out
}

/// Merged configuration values of one plugin or action.
#[derive(Clone, Debug)]
pub struct Options {
    owner: String,
    values: BTreeMap<String, Value>,
}

impl Options {
    /// Name used to prefix error messages (`plugin.action`).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether `key` holds a non-null value.
    pub fn is_set(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(|v| !v.is_null())
    }

    /// Raw value of `key`, if present.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn get(&self, key: &str) -> PostproResult<&Value> {
        self.values.get(key).ok_or_else(|| {
            PostproError::evaluation(format!("{}: option '{key}' is not declared", self.owner))
        })
    }

    fn type_err(&self, key: &str, expected: &str, got: &Value) -> PostproError {
        PostproError::validation(format!(
            "{}.{key}: expected {expected}, got {}",
            self.owner,
            type_name(got)
        ))
    }

    /// String value.
    pub fn str(&self, key: &str) -> PostproResult<&str> {
        match self.get(key)? {
            Value::String(s) => Ok(s),
            other => Err(self.type_err(key, "a string", other)),
        }
    }

    /// String value or `None` for `null`.
    pub fn opt_str(&self, key: &str) -> PostproResult<Option<&str>> {
        match self.get(key)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(self.type_err(key, "a string or null", other)),
        }
    }

    /// Expression source: strings are taken verbatim, numbers are rendered as literals.
    pub fn opt_expr(&self, key: &str) -> PostproResult<Option<String>> {
        match self.get(key)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(self.type_err(key, "an expression string", other)),
        }
    }

    /// Expression source that must be present.
    pub fn expr(&self, key: &str) -> PostproResult<String> {
        self.opt_expr(key)?.ok_or_else(|| {
            PostproError::validation(format!("{}.{key}: expression is required", self.owner))
        })
    }

    /// Boolean value.
    pub fn bool(&self, key: &str) -> PostproResult<bool> {
        match self.get(key)? {
            Value::Bool(b) => Ok(*b),
            other => Err(self.type_err(key, "a boolean", other)),
        }
    }

    /// Float value.
    pub fn f64(&self, key: &str) -> PostproResult<f64> {
        self.opt_f64(key)?
            .ok_or_else(|| PostproError::validation(format!("{}.{key}: value is required", self.owner)))
    }

    /// Float value or `None` for `null`.
    pub fn opt_f64(&self, key: &str) -> PostproResult<Option<f64>> {
        match self.get(key)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.type_err(key, "a finite number", &Value::Null)),
            other => Err(self.type_err(key, "a number", other)),
        }
    }

    /// Non-negative integer value.
    pub fn usize(&self, key: &str) -> PostproResult<usize> {
        self.opt_usize(key)?
            .ok_or_else(|| PostproError::validation(format!("{}.{key}: value is required", self.owner)))
    }

    /// Non-negative integer value or `None` for `null`.
    pub fn opt_usize(&self, key: &str) -> PostproResult<Option<usize>> {
        match self.get(key)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_u64()
                .and_then(|v| usize::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| self.type_err(key, "a non-negative integer", &Value::Number(n.clone()))),
            other => Err(self.type_err(key, "a non-negative integer", other)),
        }
    }

    /// List of floats; `null` yields an empty list.
    pub fn f64_list(&self, key: &str) -> PostproResult<Vec<f64>> {
        Ok(self.opt_f64_list(key)?.unwrap_or_default())
    }

    /// List of floats or `None` for `null`. A bare number is a one-element list.
    pub fn opt_f64_list(&self, key: &str) -> PostproResult<Option<Vec<f64>>> {
        match self.get(key)? {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(n.as_f64().map(|v| vec![v])),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_f64().ok_or_else(|| self.type_err(key, "a list of numbers", v)))
                .collect::<PostproResult<Vec<_>>>()
                .map(Some),
            other => Err(self.type_err(key, "a list of numbers", other)),
        }
    }

    /// Pair of floats (`[a, b]`) or `None` for `null`.
    pub fn opt_f64_pair(&self, key: &str) -> PostproResult<Option<[f64; 2]>> {
        match self.opt_f64_list(key)? {
            None => Ok(None),
            Some(v) if v.len() == 2 => Ok(Some([v[0], v[1]])),
            Some(v) => Err(PostproError::validation(format!(
                "{}.{key}: expected 2 values, got {}",
                self.owner,
                v.len()
            ))),
        }
    }

    /// Pair of floats that must be present.
    pub fn f64_pair(&self, key: &str) -> PostproResult<[f64; 2]> {
        self.opt_f64_pair(key)?
            .ok_or_else(|| PostproError::validation(format!("{}.{key}: value is required", self.owner)))
    }

    /// List of non-negative integers; `null` yields an empty list.
    pub fn u64_list(&self, key: &str) -> PostproResult<Vec<u64>> {
        match self.get(key)? {
            Value::Null => Ok(Vec::new()),
            Value::Number(n) => n
                .as_u64()
                .map(|v| vec![v])
                .ok_or_else(|| self.type_err(key, "a list of non-negative integers", &Value::Number(n.clone()))),
            Value::Array(items) => items
                .iter()
                .map(|v| {
                    v.as_u64()
                        .ok_or_else(|| self.type_err(key, "a list of non-negative integers", v))
                })
                .collect(),
            other => Err(self.type_err(key, "a list of non-negative integers", other)),
        }
    }

    /// List of strings; a bare string is a one-element list.
    pub fn str_list(&self, key: &str) -> PostproResult<Vec<String>> {
        match self.get(key)? {
            Value::Null => Ok(Vec::new()),
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| self.type_err(key, "a list of strings", v))
                })
                .collect(),
            other => Err(self.type_err(key, "a list of strings", other)),
        }
    }

    /// Deserialize `key` into a structured value (`null` yields `None`).
    pub fn opt_structured<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> PostproResult<Option<T>> {
        match self.get(key)? {
            Value::Null => Ok(None),
            v => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| PostproError::validation(format!("{}.{key}: {e}", self.owner))),
        }
    }
}

pub(crate) fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/options.rs"]
mod tests;
