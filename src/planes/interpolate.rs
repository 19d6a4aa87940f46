use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{PostproError, PostproResult};
use crate::interp::{InterpMethod, RectGrid};
use crate::plugin::{Action, ActionEntry, PlaneContext, RunEnv};
use crate::schema::{OptionDef, OptionDefault as D, Options};

const DEFS: &[OptionDef] = &[
    OptionDef::required("pointlocations", D::Null, "List of points to interpolate at"),
    OptionDef::required(
        "pointcoordsystem",
        D::Str("XYZ"),
        "Coordinate system of the points: XYZ or A1A2",
    ),
    OptionDef::required(
        "varnames",
        D::Strs(&["velocityx", "velocityy", "velocityz"]),
        "Variables to interpolate",
    ),
    OptionDef::optional("method", D::Str("linear"), "Interpolation method: linear or nearest"),
    OptionDef::optional("savefile", D::Str(""), "CSV file to write the interpolated values"),
    OptionDef::optional("iters", D::Null, "Subset of the loaded iterations to interpolate"),
];

pub(super) const ENTRY: ActionEntry = ActionEntry {
    name: "interpolate",
    blurb: "Interpolate plane data at given points",
    required: false,
    defs: DEFS,
    build: InterpolateAction::build,
};

/// Coordinate system of probe points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointSystem {
    /// Global `[x, y, z]`, projected onto the plane axes.
    Xyz,
    /// Plane-local `[a1, a2]`.
    A1A2,
}

impl PointSystem {
    /// Parse `XYZ` or `A1A2` (case-insensitive).
    pub fn parse(s: &str) -> PostproResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "XYZ" => Ok(Self::Xyz),
            "A1A2" => Ok(Self::A1A2),
            _ => Err(PostproError::validation(format!(
                "unknown point coordinate system '{s}' (expected XYZ or A1A2)"
            ))),
        }
    }

    fn dims(self) -> usize {
        match self {
            Self::Xyz => 3,
            Self::A1A2 => 2,
        }
    }

    fn column_names(self) -> &'static [&'static str] {
        match self {
            Self::Xyz => &["x", "y", "z"],
            Self::A1A2 => &["a1", "a2"],
        }
    }
}

/// Interpolated values of one point at one iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolatedRow {
    /// Iteration.
    pub iter: u64,
    /// Time of the iteration.
    pub time: f64,
    /// Point as given, in its own coordinate system.
    pub point: Vec<f64>,
    /// One value per requested variable; NaN outside the plane.
    pub values: Vec<f64>,
}

/// Probe `varnames` of the context plane at `points`.
///
/// Interpolation runs in plane-local `a1/a2` coordinates, which must already be loaded.
/// `iters` restricts the output to a subset of the loaded iterations.
pub fn interpolate_points(
    ctx: &PlaneContext<'_>,
    points: &[Vec<f64>],
    system: PointSystem,
    varnames: &[String],
    method: InterpMethod,
    iters: Option<&[u64]>,
) -> PostproResult<Vec<InterpolatedRow>> {
    let ds = ctx.dataset();
    let (n1, n2) = ds.grid_shape();
    let grid = RectGrid::from_coords(
        ds.coord_plane("a1", ctx.iplane())?,
        ds.coord_plane("a2", ctx.iplane())?,
        n1,
        n2,
    )?;

    let local = points
        .iter()
        .map(|p| to_local(ctx, p, system))
        .collect::<PostproResult<Vec<_>>>()?;

    let selected: Vec<u64> = match iters {
        Some(list) => list.to_vec(),
        None => ctx.iters().to_vec(),
    };

    let mut rows = Vec::with_capacity(selected.len() * points.len());
    for iter in selected {
        let time = ds.time_of(iter)?;
        let fields = varnames
            .iter()
            .map(|v| ds.field_slice(v, ctx.iplane(), iter))
            .collect::<PostproResult<Vec<_>>>()?;
        for (point, &(u, v)) in points.iter().zip(&local) {
            rows.push(InterpolatedRow {
                iter,
                time,
                point: point.clone(),
                values: fields.iter().map(|f| grid.sample(f, u, v, method)).collect(),
            });
        }
    }
    Ok(rows)
}

fn to_local(ctx: &PlaneContext<'_>, p: &[f64], system: PointSystem) -> PostproResult<(f64, f64)> {
    if p.len() != system.dims() {
        return Err(PostproError::validation(format!(
            "point {p:?} has {} coordinates, {system:?} needs {}",
            p.len(),
            system.dims()
        )));
    }
    match system {
        PointSystem::A1A2 => Ok((p[0], p[1])),
        PointSystem::Xyz => {
            let attrs = ctx.dataset().attrs.ok_or_else(|| {
                PostproError::validation("XYZ points need the plane origin/axis attributes")
            })?;
            let l = attrs.to_local([p[0], p[1], p[2]])?;
            Ok((l[0], l[1]))
        }
    }
}

/// Write `iter,time,<coords>,<vars>` rows.
pub(crate) fn write_csv(
    path: &Path,
    system: PointSystem,
    varnames: &[String],
    rows: &[InterpolatedRow],
) -> PostproResult<()> {
    crate::encode::ensure_parent_dir(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("create '{}'", path.display()))?;
    let mut w = std::io::BufWriter::new(file);

    let mut header = vec!["iter", "time"];
    header.extend_from_slice(system.column_names());
    header.extend(varnames.iter().map(String::as_str));
    writeln!(w, "{}", header.join(",")).context("write csv header")?;

    for row in rows {
        let mut cells = vec![row.iter.to_string(), row.time.to_string()];
        cells.extend(row.point.iter().map(f64::to_string));
        cells.extend(row.values.iter().map(f64::to_string));
        writeln!(w, "{}", cells.join(",")).context("write csv row")?;
    }
    w.flush().context("flush csv")?;
    Ok(())
}

#[derive(Debug)]
pub(crate) struct InterpolateAction {
    points: Vec<Vec<f64>>,
    system: PointSystem,
    varnames: Vec<String>,
    method: InterpMethod,
    savefile: Option<PathBuf>,
    iters: Option<Vec<u64>>,
}

impl InterpolateAction {
    fn build(opts: &Options) -> PostproResult<Box<dyn Action>> {
        let system = PointSystem::parse(opts.str("pointcoordsystem")?)?;
        let points = opts
            .opt_structured::<Vec<Vec<f64>>>("pointlocations")?
            .unwrap_or_default();
        if points.is_empty() {
            return Err(PostproError::validation(format!(
                "{}.pointlocations: at least one point is needed",
                opts.owner()
            )));
        }
        if let Some(bad) = points.iter().find(|p| p.len() != system.dims()) {
            return Err(PostproError::validation(format!(
                "{}.pointlocations: point {bad:?} does not have {} coordinates",
                opts.owner(),
                system.dims()
            )));
        }
        let savefile = opts.str("savefile")?;
        Ok(Box::new(Self {
            points,
            system,
            varnames: opts.str_list("varnames")?,
            method: InterpMethod::parse(opts.str("method")?)?,
            savefile: (!savefile.is_empty()).then(|| PathBuf::from(savefile)),
            iters: opts.is_set("iters").then(|| opts.u64_list("iters")).transpose()?,
        }))
    }
}

impl Action for InterpolateAction {
    fn name(&self) -> &'static str {
        "interpolate"
    }

    fn needs_plane_coords(&self) -> bool {
        true
    }

    #[tracing::instrument(skip(self, ctx, _env), fields(plane = ctx.name()))]
    fn execute(&self, ctx: &PlaneContext<'_>, _env: &mut RunEnv) -> PostproResult<()> {
        let rows = interpolate_points(
            ctx,
            &self.points,
            self.system,
            &self.varnames,
            self.method,
            self.iters.as_deref(),
        )?;
        match &self.savefile {
            Some(path) => {
                write_csv(path, self.system, &self.varnames, &rows)?;
                tracing::info!(rows = rows.len(), "Saved {}", path.display());
            }
            None => {
                for row in &rows {
                    tracing::info!(
                        iter = row.iter,
                        point = ?row.point,
                        values = ?row.values,
                        "interpolated"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/planes/interpolate.rs"]
mod tests;
