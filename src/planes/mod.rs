//! The `instantaneousplanes` plugin, its actions, and the `figure` plugin.

mod animate;
mod figure;
mod interpolate;
mod plot;
mod radial;

use std::path::PathBuf;

use crate::dataset::{AxisLabel, LoadRequest, Selection, compute_axis1axis2_coords};
use crate::expression::{Template, Value as ExprValue};
use crate::foundation::error::{PostproError, PostproResult};
use crate::plugin::{
    Action, ActionRegistry, PlaneContext, Plugin, PluginEntry, PluginRegistry, RunEnv,
};
use crate::schema::{OptionDef, OptionDefault as D, Options};

pub use interpolate::{InterpolatedRow, PointSystem, interpolate_points};

const PLANE_DEFS: &[OptionDef] = &[
    OptionDef::required("name", D::Str(""), "An arbitrary name"),
    OptionDef::required("ncfile", D::Str(""), "Sample file holding the plane data"),
    OptionDef::optional("iters", D::Floats(&[]), "Which iterations to pull from the sample file"),
    OptionDef::optional("times", D::Null, "Which times to pull from the sample file"),
    OptionDef::optional("trange", D::Null, "Pull a range of times from the sample file"),
    OptionDef::required("xaxis", D::Str("x"), "Which axis to use on the abscissa"),
    OptionDef::required("yaxis", D::Str("y"), "Which axis to use on the ordinate"),
    OptionDef::required("iplane", D::Int(0), "Which plane to pull from the sample file"),
    OptionDef::optional("group", D::Null, "Which group to pull from the sample file"),
    OptionDef::optional(
        "varnames",
        D::Strs(&["velocityx", "velocityy", "velocityz"]),
        "Variables to extract from the sample file",
    ),
    OptionDef::optional("snapshotfile", D::Str(""), "Name of a JSON file to save the loaded plane data"),
];

/// Registry with the `figure` and `instantaneousplanes` plugins, in that order.
pub fn builtin_plugins() -> PostproResult<PluginRegistry> {
    let mut reg = PluginRegistry::new();
    reg.register(figure::entry())?;
    reg.register(PluginEntry {
        name: "instantaneousplanes",
        blurb: "Make instantaneous plots from sampled planes",
        defs: PLANE_DEFS,
        actions: plane_actions()?,
        build: InstantaneousPlanes::build,
    })?;
    Ok(reg)
}

/// Actions of `instantaneousplanes` in execution order.
pub fn plane_actions() -> PostproResult<ActionRegistry> {
    let mut reg = ActionRegistry::new();
    reg.register(plot::ENTRY)?;
    reg.register(interpolate::ENTRY)?;
    reg.register(animate::ANIMATE)?;
    reg.register(animate::MAKEGIF)?;
    reg.register(radial::ENTRY)?;
    Ok(reg)
}

struct PlaneJob {
    name: String,
    request: LoadRequest,
    xaxis: AxisLabel,
    yaxis: AxisLabel,
    iplane: usize,
    snapshot: Option<PathBuf>,
    actions: Vec<Box<dyn Action>>,
}

impl PlaneJob {
    fn from_options(opts: &Options, actions: &ActionRegistry) -> PostproResult<Self> {
        let actions = actions.instantiate_present(opts)?;
        let trange = opts.opt_f64_pair("trange")?;
        let times = opts.opt_f64_list("times")?;
        let snapshot = opts.str("snapshotfile")?;
        Ok(Self {
            name: opts.str("name")?.to_owned(),
            request: LoadRequest {
                path: PathBuf::from(opts.str("ncfile")?),
                group: opts.opt_str("group")?.map(str::to_owned),
                varnames: opts.str_list("varnames")?,
                selection: Selection::from_options(opts.u64_list("iters")?, times, trange),
            },
            xaxis: AxisLabel::parse(opts.str("xaxis")?)?,
            yaxis: AxisLabel::parse(opts.str("yaxis")?)?,
            iplane: opts.usize("iplane")?,
            snapshot: (!snapshot.is_empty()).then(|| PathBuf::from(snapshot)),
            actions,
        })
    }

    #[tracing::instrument(skip(self, env), fields(plane = %self.name))]
    fn run(&self, env: &mut RunEnv) -> PostproResult<()> {
        let mut ds = env.source.load(&self.request)?;
        let wants_local = self.xaxis.is_plane_local()
            || self.yaxis.is_plane_local()
            || self.actions.iter().any(|a| a.needs_plane_coords());
        if wants_local {
            compute_axis1axis2_coords(&mut ds)?;
        }
        tracing::info!(
            iterations = ds.timesteps.len(),
            planes = ds.nplanes(),
            vars = ds.varnames().collect::<Vec<_>>().join(","),
            "Loaded {}",
            self.request.path.display()
        );
        if let Some(path) = &self.snapshot {
            ds.write_snapshot(path)?;
            tracing::info!("Saved snapshot {}", path.display());
        }

        let ctx = PlaneContext::new(&self.name, &ds, self.xaxis, self.yaxis, self.iplane)?;
        for action in &self.actions {
            tracing::info!("Executing {}", action.name());
            action.execute(&ctx, env)?;
        }
        Ok(())
    }
}

/// Loads each configured plane and runs its actions.
struct InstantaneousPlanes {
    jobs: Vec<PlaneJob>,
}

impl InstantaneousPlanes {
    fn build(inputs: &[Options], actions: &ActionRegistry) -> PostproResult<Box<dyn Plugin>> {
        let jobs = inputs
            .iter()
            .map(|o| PlaneJob::from_options(o, actions))
            .collect::<PostproResult<Vec<_>>>()?;
        Ok(Box::new(Self { jobs }))
    }
}

impl Plugin for InstantaneousPlanes {
    fn name(&self) -> &'static str {
        "instantaneousplanes"
    }

    fn execute(&self, env: &mut RunEnv) -> PostproResult<()> {
        for job in &self.jobs {
            job.run(env)?;
        }
        Ok(())
    }
}

/// Parse an optional file-name template; the empty string means "not set".
fn opt_template(opts: &Options, key: &str) -> PostproResult<Option<Template>> {
    let src = opts.str(key)?;
    if src.is_empty() {
        return Ok(None);
    }
    Template::parse(src)
        .map(Some)
        .map_err(|e| PostproError::validation(format!("{}.{key}: {e}", opts.owner())))
}

/// Field of `n` samples from an expression result; scalars fill the whole grid.
fn field_values(v: ExprValue, n: usize, what: &str) -> PostproResult<Vec<f64>> {
    match v {
        ExprValue::Array(a) if a.len() == n => Ok(a),
        ExprValue::Array(a) => Err(PostproError::evaluation(format!(
            "{what} produced {} values, the plane grid has {n}",
            a.len()
        ))),
        scalar => Ok(vec![scalar.as_f64()?; n]),
    }
}

/// Figure size option as a positive `[width, height]` pair in inches.
fn figsize(opts: &Options) -> PostproResult<[f64; 2]> {
    let fs = opts.f64_pair("figsize")?;
    if !(fs[0] > 0.0 && fs[1] > 0.0) {
        return Err(PostproError::validation(format!(
            "{}.figsize: expected positive sizes, got {fs:?}",
            opts.owner()
        )));
    }
    Ok(fs)
}

#[cfg(test)]
#[path = "../../tests/unit/planes/mod.rs"]
mod tests;
