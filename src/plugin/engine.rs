use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;

use crate::dataset::{JsonSampleSource, PlaneSource};
use crate::foundation::error::{PostproError, PostproResult};
use crate::plugin::registry::PluginRegistry;
use crate::render::{FigureRenderer, FigureStore};
use crate::schema::type_name;

/// Mutable state shared by every plugin of one run.
pub struct RunEnv {
    /// Reader used to load plane data.
    pub source: Box<dyn PlaneSource>,
    /// Figures declared by the `figure` plugin.
    pub figures: FigureStore,
    /// Renderer producing image files.
    pub renderer: FigureRenderer,
}

impl RunEnv {
    /// Environment reading JSON sample files.
    pub fn new() -> Self {
        Self::with_source(Box::new(JsonSampleSource))
    }

    /// Environment reading plane data through `source`.
    pub fn with_source(source: Box<dyn PlaneSource>) -> Self {
        Self {
            source,
            figures: FigureStore::new(),
            renderer: FigureRenderer::new(),
        }
    }
}

impl Default for RunEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs configuration documents against a plugin registry.
#[derive(Debug)]
pub struct Engine {
    registry: PluginRegistry,
}

impl Engine {
    /// Engine over `registry`.
    pub fn new(registry: PluginRegistry) -> Self {
        Self { registry }
    }

    /// Engine with the built-in `figure` and `instantaneousplanes` plugins.
    pub fn builtin() -> PostproResult<Self> {
        Ok(Self::new(crate::planes::builtin_plugins()?))
    }

    /// Registered plugins.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Run every registered plugin whose key is present in `doc`, in registration order.
    ///
    /// All plugins are constructed (and their options validated) before the first one runs.
    #[tracing::instrument(skip_all)]
    pub fn run(&self, doc: &Value, env: &mut RunEnv) -> PostproResult<()> {
        let empty = serde_json::Map::new();
        let map = match doc {
            Value::Object(m) => m,
            Value::Null => &empty,
            other => {
                return Err(PostproError::validation(format!(
                    "configuration document must be a mapping of plugin names, got {}",
                    type_name(other)
                )));
            }
        };

        let known = self.registry.names();
        let unknown: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|k| !known.contains(k))
            .collect();
        if !unknown.is_empty() {
            return Err(PostproError::validation(format!(
                "unknown plugin(s): {} (known: {})",
                unknown.join(", "),
                known.join(", ")
            )));
        }

        let mut plugins = Vec::new();
        for entry in self.registry.iter() {
            if let Some(input) = map.get(entry.name) {
                plugins.push(entry.instantiate(input)?);
            }
        }
        if plugins.is_empty() {
            tracing::warn!("configuration document has no plugin sections");
        }
        for plugin in &plugins {
            tracing::info!("Running {}", plugin.name());
            plugin.execute(env)?;
        }
        Ok(())
    }

    /// Load `path` with [`load_document`] and run it.
    pub fn run_file(&self, path: &Path, env: &mut RunEnv) -> PostproResult<()> {
        let doc = load_document(path)?;
        self.run(&doc, env)
    }

    /// Schema help for one plugin, or for every plugin when `name` is `None`.
    pub fn describe(&self, name: Option<&str>) -> PostproResult<String> {
        match name {
            Some(n) => self.registry.get(n).map(|e| e.describe()).ok_or_else(|| {
                PostproError::validation(format!(
                    "unknown plugin '{n}' (known: {})",
                    self.registry.names().join(", ")
                ))
            }),
            None => Ok(self
                .registry
                .iter()
                .map(|e| e.describe())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}

/// Read a YAML or JSON configuration document. Files ending in `.json` are parsed as JSON,
/// anything else as YAML.
pub fn load_document(path: &Path) -> PostproResult<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read configuration '{}'", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&text)
            .map_err(|e| PostproError::serde(format!("parse '{}': {e}", path.display())))
    } else {
        serde_yaml::from_str(&text)
            .map_err(|e| PostproError::serde(format!("parse '{}': {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/engine.rs"]
mod tests;
