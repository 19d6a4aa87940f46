use std::path::PathBuf;

use crate::expression::{Expression, Template};
use crate::foundation::error::{PostproError, PostproResult};
use crate::interp::{PolarGrid, RectGrid, cart_to_radial};
use crate::planes::{field_values, figsize, opt_template};
use crate::plugin::{Action, ActionEntry, PlaneContext, RunEnv};
use crate::render::{Colormap, Figure, Panel, PolarPanel};
use crate::schema::{OptionDef, OptionDefault as D, Options};

const POLAR_FONTSIZE: f64 = 10.0;

const DEFS: &[OptionDef] = &[
    OptionDef::optional("title", D::Str(""), "Title of the plot"),
    OptionDef::optional("plotfunc", D::Str("velocityx"), "Expression of the plane variables to plot"),
    OptionDef::optional("cmap", D::Str("coolwarm"), "Colormap for the polar plot"),
    OptionDef::optional("cbar", D::Bool(true), "Include a colorbar"),
    OptionDef::optional("dpi", D::Int(125), "Figure resolution in dots per inch"),
    OptionDef::optional("figsize", D::Floats(&[8.0, 5.0]), "Figure size in inches"),
    OptionDef::optional("savefile", D::Str(""), "Filename template to save the image"),
    OptionDef::optional("vmin", D::Null, "Lower color bound"),
    OptionDef::optional("vmax", D::Null, "Upper color bound"),
    OptionDef::required("LR", D::Null, "Outer radius of the polar lattice"),
    OptionDef::required("NR", D::Int(256), "Number of radial points"),
    OptionDef::required("NTheta", D::Int(256), "Number of angular points"),
    OptionDef::required("xc", D::Null, "Abscissa of the polar centre"),
    OptionDef::required("yc", D::Null, "Ordinate of the polar centre"),
];

pub(super) const ENTRY: ActionEntry = ActionEntry {
    name: "plot_radial",
    blurb: "Remap the plane onto polar coordinates and plot it",
    required: false,
    defs: DEFS,
    build: RadialAction::build,
};

#[derive(Debug)]
pub(crate) struct RadialAction {
    title: String,
    plotfunc: Expression,
    cmap: Colormap,
    colorbar: bool,
    dpi: f64,
    figsize: [f64; 2],
    savefile: Option<Template>,
    bounds: Option<(f64, f64)>,
    polar: PolarGrid,
    centre: (f64, f64),
}

impl RadialAction {
    fn build(opts: &Options) -> PostproResult<Box<dyn Action>> {
        let polar = PolarGrid::new(opts.f64("LR")?, opts.usize("NR")?, opts.usize("NTheta")?)
            .map_err(|e| PostproError::validation(format!("{}: {e}", opts.owner())))?;
        let bounds = match (opts.opt_f64("vmin")?, opts.opt_f64("vmax")?) {
            (Some(lo), Some(hi)) => Some((lo, hi)),
            (None, None) => None,
            _ => {
                tracing::debug!("{}: vmin and vmax not both set, using the data range", opts.owner());
                None
            }
        };
        Ok(Box::new(Self {
            title: opts.str("title")?.to_owned(),
            plotfunc: Expression::compile(&opts.expr("plotfunc")?)?,
            cmap: Colormap::by_name(opts.str("cmap")?)?,
            colorbar: opts.bool("cbar")?,
            dpi: opts.f64("dpi")?,
            figsize: figsize(opts)?,
            savefile: opt_template(opts, "savefile")?,
            bounds,
            polar,
            centre: (opts.f64("xc")?, opts.f64("yc")?),
        }))
    }
}

/// Finite min and max of `values`; `(0, 1)` when nothing is finite.
pub(crate) fn finite_range(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

impl Action for RadialAction {
    fn name(&self) -> &'static str {
        "plot_radial"
    }

    #[tracing::instrument(skip(self, ctx, env), fields(plane = ctx.name()))]
    fn execute(&self, ctx: &PlaneContext<'_>, env: &mut RunEnv) -> PostproResult<()> {
        let (n1, n2) = ctx.dataset().grid_shape();
        let grid = RectGrid::from_coords(
            ctx.axis_coords(ctx.xaxis())?,
            ctx.axis_coords(ctx.yaxis())?,
            n1,
            n2,
        )?;

        for iplot in 0..ctx.iters().len() {
            let slice = ctx.slice_env(iplot);
            let field = field_values(self.plotfunc.eval(&slice)?, n1 * n2, self.plotfunc.source())?;
            let values = cart_to_radial(&grid, &field, self.centre.0, self.centre.1, &self.polar);
            let (vmin, vmax) = self.bounds.unwrap_or_else(|| finite_range(&values));

            let panel = PolarPanel {
                r: self.polar.r.clone(),
                theta: self.polar.theta.clone(),
                values,
                vmin,
                vmax,
                cmap: self.cmap.clone(),
                colorbar: self.colorbar,
                title: self.title.clone(),
                fontsize: POLAR_FONTSIZE,
            };
            let fig = Figure::single(self.figsize, self.dpi, Panel::Polar(Box::new(panel)))?;
            let frame = env.renderer.render(&fig)?;

            if let Some(savefile) = &self.savefile {
                let path = PathBuf::from(savefile.render(&slice)?);
                frame.save(&path)?;
                tracing::debug!(iter = ctx.iters()[iplot], "Saved {}", path.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/planes/radial.rs"]
mod tests;
