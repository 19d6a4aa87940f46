use serde_json::Value;

use crate::foundation::error::{PostproError, PostproResult};
use crate::plugin::context::PlaneContext;
use crate::plugin::engine::RunEnv;
use crate::schema::{OptionDef, Options, describe, merge_options};

/// A configured post-processing step run against one loaded plane.
pub trait Action {
    /// Registered action name.
    fn name(&self) -> &'static str;

    /// Whether the action reads the plane-local `a1/a2/a3` coordinates.
    fn needs_plane_coords(&self) -> bool {
        false
    }

    /// Run against `ctx`, writing outputs and using the shared run state in `env`.
    fn execute(&self, ctx: &PlaneContext<'_>, env: &mut RunEnv) -> PostproResult<()>;
}

/// Validates merged options and builds the action.
pub type ActionBuilder = fn(&Options) -> PostproResult<Box<dyn Action>>;

/// Registry entry describing one action.
#[derive(Clone, Copy)]
pub struct ActionEntry {
    /// Key of the action section inside a plugin input.
    pub name: &'static str,
    /// One-line description.
    pub blurb: &'static str,
    /// Whether every plugin input must contain the section.
    pub required: bool,
    /// Option schema.
    pub defs: &'static [OptionDef],
    /// Constructor.
    pub build: ActionBuilder,
}

impl ActionEntry {
    /// Merge `input` against the schema and build the action.
    pub fn instantiate(&self, owner: &str, input: &Value) -> PostproResult<Box<dyn Action>> {
        let opts = merge_options(&format!("{owner}.{}", self.name), input, self.defs, &[])?;
        let action = (self.build)(&opts)?;
        tracing::info!("Initialized {} inside {owner}", self.name);
        Ok(action)
    }
}

impl std::fmt::Debug for ActionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEntry")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Actions of a plugin, kept in registration order.
#[derive(Debug, Default, Clone)]
pub struct ActionRegistry {
    entries: Vec<ActionEntry>,
}

impl ActionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry`; names must be unique.
    pub fn register(&mut self, entry: ActionEntry) -> PostproResult<()> {
        if self.contains(entry.name) {
            return Err(PostproError::validation(format!(
                "action '{}' is already registered",
                entry.name
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Entry registered as `name`.
    pub fn get(&self, name: &str) -> Option<&ActionEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Registered names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// Entries in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionEntry> {
        self.entries.iter()
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no action is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build every action whose section is present in `opts`, in registration order.
    /// Absent sections are skipped; an absent required section is an error.
    pub fn instantiate_present(&self, opts: &Options) -> PostproResult<Vec<Box<dyn Action>>> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match opts.raw(entry.name) {
                Some(section) => out.push(entry.instantiate(opts.owner(), section)?),
                None if entry.required => {
                    return Err(PostproError::validation(format!(
                        "{}: required action '{}' not present",
                        opts.owner(),
                        entry.name
                    )));
                }
                None => {}
            }
        }
        Ok(out)
    }

    /// Schema listing of every action.
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                let title = if e.required {
                    format!("{} (required)", e.name)
                } else {
                    e.name.to_owned()
                };
                describe(&title, e.blurb, e.defs)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/action.rs"]
mod tests;
