//! Plugin and action registries, per-plane context and the engine that runs a document.

mod action;
mod context;
mod engine;
mod registry;

pub use action::{Action, ActionBuilder, ActionEntry, ActionRegistry};
pub use context::{PlaneContext, SliceEnv};
pub use engine::{Engine, RunEnv, load_document};
pub use registry::{Plugin, PluginBuilder, PluginEntry, PluginRegistry};

/// Accept a single mapping or a list of mappings.
pub(crate) fn as_input_list(input: &serde_json::Value) -> Vec<&serde_json::Value> {
    match input {
        serde_json::Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}
