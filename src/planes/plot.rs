use std::path::PathBuf;

use serde::Deserialize;

use crate::expression::{ChainEnv, Env, Expression, MapEnv, Template, TitleTemplate, Value};
use crate::foundation::error::{PostproError, PostproResult};
use crate::planes::{field_values, figsize, opt_template};
use crate::plugin::{Action, ActionEntry, PlaneContext, RunEnv};
use crate::render::{
    AxisScale, ColorbarSpec, Colormap, ContourPanel, Figure, LevelBands, Panel, TurbineSpec,
};
use crate::schema::{OptionDef, OptionDefault as D, Options};

const DEFS: &[OptionDef] = &[
    OptionDef::optional("title", D::Str(""), "Title of the plot"),
    OptionDef::optional(
        "plotfunc",
        D::Str("sqrt(velocityx**2 + velocityy**2)"),
        "Expression of the plane variables to plot",
    ),
    OptionDef::optional("clevels", D::Str("linspace(0, 12, 121)"), "Color levels (expression)"),
    OptionDef::optional("cmap", D::Str("coolwarm"), "Colormap for the contour plot"),
    OptionDef::optional("cbar", D::Bool(true), "Include a colorbar"),
    OptionDef::optional("cbar_label", D::Null, "Label for the colorbar"),
    OptionDef::optional("cbar_nticks", D::Null, "Number of ticks on the colorbar"),
    OptionDef::optional("xlabel", D::Str("X [m]"), "Label on the X-axis"),
    OptionDef::optional("ylabel", D::Str("Y [m]"), "Label on the Y-axis"),
    OptionDef::optional("xlim", D::Null, "Axis limits on the X-axis"),
    OptionDef::optional("ylim", D::Null, "Axis limits on the Y-axis"),
    OptionDef::optional("dpi", D::Int(125), "Figure resolution in dots per inch"),
    OptionDef::optional("figsize", D::Floats(&[12.0, 3.0]), "Figure size in inches"),
    OptionDef::optional("fontsize", D::Int(14), "Font size in points"),
    OptionDef::optional("savefile", D::Str(""), "Filename template to save the image"),
    OptionDef::optional("xscalefunc", D::Str("x"), "Expression of x applied to the abscissa"),
    OptionDef::optional("yscalefunc", D::Str("y"), "Expression of y applied to the ordinate"),
    OptionDef::optional("figname", D::Null, "Name of a figure declared by the figure plugin"),
    OptionDef::optional("axesnumfunc", D::Null, "Subplot index as an expression of iplane"),
    OptionDef::optional(
        "axisscale",
        D::Str("scaled"),
        "Axes aspect: equal, scaled, tight, auto, image or square",
    ),
    OptionDef::optional("plotturbines", D::Null, "Turbine outlines drawn over the field"),
];

pub(super) const ENTRY: ActionEntry = ActionEntry {
    name: "plot",
    blurb: "Make filled contour plots of the plane",
    required: false,
    defs: DEFS,
    build: PlotAction::build,
};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Box<TurbineSpec>),
    Many(Vec<TurbineSpec>),
}

/// Subplot of a shared figure that receives the panel.
#[derive(Debug)]
struct FigureTarget {
    figname: String,
    axesnum: Expression,
}

#[derive(Debug)]
pub(crate) struct PlotAction {
    title: TitleTemplate,
    plotfunc: Expression,
    bands: LevelBands,
    colorbar: Option<ColorbarSpec>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    xlim: Option<[f64; 2]>,
    ylim: Option<[f64; 2]>,
    dpi: f64,
    figsize: [f64; 2],
    fontsize: f64,
    savefile: Option<Template>,
    xscale: Expression,
    yscale: Expression,
    target: Option<FigureTarget>,
    axis_scale: AxisScale,
    turbines: Vec<TurbineSpec>,
}

impl PlotAction {
    fn build(opts: &Options) -> PostproResult<Box<dyn Action>> {
        let owner = opts.owner();
        let cmap = Colormap::by_name(opts.str("cmap")?)?;
        let levels = Expression::compile(&opts.expr("clevels")?)?.eval_f64_list(&MapEnv::new())?;
        let bands = LevelBands::new(levels, &cmap)
            .map_err(|e| PostproError::validation(format!("{owner}.clevels: {e}")))?;

        let colorbar = if opts.bool("cbar")? {
            let nticks = opts.opt_usize("cbar_nticks")?;
            if nticks.is_some_and(|k| k < 2) {
                return Err(PostproError::validation(format!(
                    "{owner}.cbar_nticks: need at least 2 ticks"
                )));
            }
            Some(ColorbarSpec {
                label: opts.opt_str("cbar_label")?.map(str::to_owned),
                nticks,
            })
        } else {
            None
        };

        let target = match (opts.opt_str("figname")?, opts.opt_expr("axesnumfunc")?) {
            (Some(figname), Some(src)) => Some(FigureTarget {
                figname: figname.to_owned(),
                axesnum: Expression::compile(&src)?,
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "{owner}: figname and axesnumfunc must be set together, drawing a standalone figure"
                );
                None
            }
            (None, None) => None,
        };

        let turbines = match opts.opt_structured::<OneOrMany>("plotturbines")? {
            None => Vec::new(),
            Some(OneOrMany::One(t)) => vec![*t],
            Some(OneOrMany::Many(ts)) => ts,
        };

        Ok(Box::new(Self {
            title: TitleTemplate::parse(opts.str("title")?)?,
            plotfunc: Expression::compile(&opts.expr("plotfunc")?)?,
            bands,
            colorbar,
            xlabel: opts.opt_str("xlabel")?.map(str::to_owned),
            ylabel: opts.opt_str("ylabel")?.map(str::to_owned),
            xlim: opts.opt_f64_pair("xlim")?,
            ylim: opts.opt_f64_pair("ylim")?,
            dpi: opts.f64("dpi")?,
            figsize: figsize(opts)?,
            fontsize: opts.f64("fontsize")?,
            savefile: opt_template(opts, "savefile")?,
            xscale: Expression::compile(&opts.expr("xscalefunc")?)?,
            yscale: Expression::compile(&opts.expr("yscalefunc")?)?,
            target,
            axis_scale: AxisScale::parse(opts.str("axisscale")?)?,
            turbines,
        }))
    }

    /// Scaled plotting coordinates; `var` (`x` or `y`) is bound to the raw axis array.
    fn scaled(
        &self,
        func: &Expression,
        var: &str,
        raw: &[f64],
        env: &dyn Env,
    ) -> PostproResult<Vec<f64>> {
        let bound = MapEnv::new().with(var, Value::Array(raw.to_vec()));
        let chain = ChainEnv::new(vec![&bound as &dyn Env, env]);
        field_values(func.eval(&chain)?, raw.len(), func.source())
    }

    fn panel(&self, ctx: &PlaneContext<'_>, iplot: usize) -> PostproResult<ContourPanel> {
        let ds = ctx.dataset();
        let (n1, n2) = ds.grid_shape();
        let env = ctx.slice_env(iplot);
        let values = field_values(self.plotfunc.eval(&env)?, n1 * n2, self.plotfunc.source())?;

        let overlays = self
            .turbines
            .iter()
            .map(|t| t.outlines(ctx.xaxis().component(), ctx.yaxis().component()))
            .collect::<PostproResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        let panel = ContourPanel {
            xs: self.scaled(&self.xscale, "x", ctx.axis_coords(ctx.xaxis())?, &env)?,
            ys: self.scaled(&self.yscale, "y", ctx.axis_coords(ctx.yaxis())?, &env)?,
            n1,
            n2,
            values,
            bands: self.bands.clone(),
            colorbar: self.colorbar.clone(),
            xlabel: self.xlabel.clone(),
            ylabel: self.ylabel.clone(),
            xlim: self.xlim,
            ylim: self.ylim,
            axis_scale: self.axis_scale,
            title: self.title.render(&env)?,
            fontsize: self.fontsize,
            overlays,
        };
        panel.validate()?;
        Ok(panel)
    }

    fn subplot_index(target: &FigureTarget, iplane: usize) -> PostproResult<usize> {
        let env = MapEnv::new().with("iplane", Value::Int(iplane as i64));
        let idx = target.axesnum.eval(&env)?.as_i64()?;
        usize::try_from(idx).map_err(|_| {
            PostproError::evaluation(format!(
                "axesnumfunc '{}' gave negative subplot index {idx}",
                target.axesnum.source()
            ))
        })
    }
}

impl Action for PlotAction {
    fn name(&self) -> &'static str {
        "plot"
    }

    #[tracing::instrument(skip(self, ctx, env), fields(plane = ctx.name()))]
    fn execute(&self, ctx: &PlaneContext<'_>, env: &mut RunEnv) -> PostproResult<()> {
        if let Some(savefile) = &self.savefile
            && self.target.is_none()
            && savefile.is_literal()
            && ctx.iters().len() > 1
        {
            tracing::warn!(
                "savefile '{}' has no placeholders, every iteration overwrites it",
                savefile.source()
            );
        }
        for iplot in 0..ctx.iters().len() {
            let panel = Panel::Contour(Box::new(self.panel(ctx, iplot)?));
            let frame = match &self.target {
                Some(target) => {
                    let index = Self::subplot_index(target, ctx.iplane())?;
                    let fig = env.figures.get_mut(&target.figname)?;
                    fig.set_panel(index, panel)?;
                    env.renderer.render(fig)?
                }
                None => {
                    let fig = Figure::single(self.figsize, self.dpi, panel)?;
                    env.renderer.render(&fig)?
                }
            };

            if let Some(savefile) = &self.savefile {
                let path = PathBuf::from(savefile.render(&ctx.slice_env(iplot))?);
                frame.save(&path)?;
                tracing::debug!(iter = ctx.iters()[iplot], "Saved {}", path.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/planes/plot.rs"]
mod tests;
