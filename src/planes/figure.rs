use crate::foundation::error::PostproResult;
use crate::plugin::{ActionRegistry, Plugin, PluginEntry, RunEnv};
use crate::render::Figure;
use crate::schema::{OptionDef, OptionDefault as D, Options};

const DEFS: &[OptionDef] = &[
    OptionDef::required("name", D::Str(""), "Name the plot actions refer to with figname"),
    OptionDef::optional("nrows", D::Int(1), "Number of subplot rows"),
    OptionDef::optional("ncols", D::Int(1), "Number of subplot columns"),
    OptionDef::optional("figsize", D::Floats(&[12.0, 3.0]), "Figure size in inches"),
    OptionDef::optional("dpi", D::Int(125), "Figure resolution in dots per inch"),
];

pub(super) fn entry() -> PluginEntry {
    PluginEntry {
        name: "figure",
        blurb: "Declare a figure with subplots shared by several planes",
        defs: DEFS,
        actions: ActionRegistry::new(),
        build: FigurePlugin::build,
    }
}

#[derive(Debug)]
struct FigureDecl {
    name: String,
    nrows: usize,
    ncols: usize,
    figsize: [f64; 2],
    dpi: f64,
}

/// Adds empty figures to the run's figure store.
#[derive(Debug)]
struct FigurePlugin {
    decls: Vec<FigureDecl>,
}

impl FigurePlugin {
    fn build(inputs: &[Options], _actions: &ActionRegistry) -> PostproResult<Box<dyn Plugin>> {
        let decls = inputs
            .iter()
            .map(|o| {
                let decl = FigureDecl {
                    name: o.str("name")?.to_owned(),
                    nrows: o.usize("nrows")?,
                    ncols: o.usize("ncols")?,
                    figsize: super::figsize(o)?,
                    dpi: o.f64("dpi")?,
                };
                // Surface bad geometry before any plane is loaded.
                Figure::new(decl.figsize, decl.dpi, decl.nrows, decl.ncols)?;
                Ok(decl)
            })
            .collect::<PostproResult<Vec<_>>>()?;
        Ok(Box::new(Self { decls }))
    }
}

impl Plugin for FigurePlugin {
    fn name(&self) -> &'static str {
        "figure"
    }

    fn execute(&self, env: &mut RunEnv) -> PostproResult<()> {
        for d in &self.decls {
            let fig = Figure::new(d.figsize, d.dpi, d.nrows, d.ncols)?;
            env.figures.insert(d.name.clone(), fig);
            tracing::info!(rows = d.nrows, cols = d.ncols, "Created figure {}", d.name);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/planes/figure.rs"]
mod tests;
