use serde_json::Value;

use crate::foundation::error::{PostproError, PostproResult};
use crate::plugin::action::ActionRegistry;
use crate::plugin::as_input_list;
use crate::plugin::engine::RunEnv;
use crate::schema::{OptionDef, Options, describe, merge_options};

/// A top-level task configured by one key of the document.
pub trait Plugin {
    /// Registered plugin name.
    fn name(&self) -> &'static str;

    /// Run every configured input.
    fn execute(&self, env: &mut RunEnv) -> PostproResult<()>;
}

/// Builds a plugin from its merged inputs (one per list entry) and its action registry.
pub type PluginBuilder = fn(&[Options], &ActionRegistry) -> PostproResult<Box<dyn Plugin>>;

/// Registry entry describing one plugin.
pub struct PluginEntry {
    /// Top-level document key.
    pub name: &'static str,
    /// One-line description.
    pub blurb: &'static str,
    /// Option schema of each input.
    pub defs: &'static [OptionDef],
    /// Nested actions accepted inside each input.
    pub actions: ActionRegistry,
    /// Constructor.
    pub build: PluginBuilder,
}

impl PluginEntry {
    /// Merge every input (single mapping or list) and build the plugin.
    #[tracing::instrument(skip(self, input), fields(plugin = self.name))]
    pub fn instantiate(&self, input: &Value) -> PostproResult<Box<dyn Plugin>> {
        let inputs = as_input_list(input);
        if inputs.is_empty() {
            return Err(PostproError::validation(format!(
                "{}: expected at least one input",
                self.name
            )));
        }
        let extra = self.actions.names();
        let many = inputs.len() > 1;
        let opts = inputs
            .iter()
            .enumerate()
            .map(|(k, v)| {
                let owner = if many {
                    format!("{}[{k}]", self.name)
                } else {
                    self.name.to_owned()
                };
                merge_options(&owner, v, self.defs, &extra)
            })
            .collect::<PostproResult<Vec<_>>>()?;
        let plugin = (self.build)(&opts, &self.actions)?;
        tracing::info!("Initialized {}", self.name);
        Ok(plugin)
    }

    /// Schema listing of the plugin and its actions.
    pub fn describe(&self) -> String {
        let mut out = describe(self.name, self.blurb, self.defs);
        if !self.actions.is_empty() {
            out.push_str("\nactions:\n");
            for line in self.actions.describe().lines() {
                if !line.is_empty() {
                    out.push_str("  ");
                }
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("name", &self.name)
            .field("actions", &self.actions.names())
            .finish_non_exhaustive()
    }
}

/// Plugins in registration (execution) order.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: Vec<PluginEntry>,
}

impl PluginRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry`; names must be unique.
    pub fn register(&mut self, entry: PluginEntry) -> PostproResult<()> {
        if self.get(entry.name).is_some() {
            return Err(PostproError::validation(format!(
                "plugin '{}' is already registered",
                entry.name
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Entry registered as `name`.
    pub fn get(&self, name: &str) -> Option<&PluginEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Registered names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// Entries in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginEntry> {
        self.entries.iter()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/registry.rs"]
mod tests;
