//! Turbine overlays: rotor disc and tower projected onto the plotted plane.

use serde::Deserialize;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{PostproError, PostproResult};
use crate::render::figure::Polyline;

const DISC_SEGMENTS: usize = 64;

/// Stroke style of a turbine outline.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LineStyleSpec {
    /// Line width in points.
    #[serde(default = "default_lw")]
    pub lw: f64,
    /// Line color (`#rrggbb` or a one-letter name).
    #[serde(default = "default_color")]
    pub color: String,
    /// Stroke opacity.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_lw() -> f64 {
    1.0
}

fn default_color() -> String {
    "k".to_owned()
}

fn default_alpha() -> f64 {
    0.75
}

impl Default for LineStyleSpec {
    fn default() -> Self {
        Self {
            lw: default_lw(),
            color: default_color(),
            alpha: default_alpha(),
        }
    }
}

/// One turbine as configured under `plotturbines`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TurbineSpec {
    /// Tower base position.
    pub basexyz: [f64; 3],
    /// Hub height above the base.
    pub hubheight: f64,
    /// Rotor diameter.
    pub rotordiameter: f64,
    /// Nacelle direction in compass degrees (0 = north, 90 = east).
    pub nacelledir: f64,
    /// Component drawn along the horizontal axis.
    #[serde(default)]
    pub ix: Option<usize>,
    /// Component drawn along the vertical axis.
    #[serde(default)]
    pub iy: Option<usize>,
    /// Outline style; defaults to a thin translucent black line.
    #[serde(default)]
    pub linestyle: Option<LineStyleSpec>,
}

impl TurbineSpec {
    /// Disc and tower outlines in plot coordinates. `default_ix`/`default_iy` (usually
    /// [`AxisLabel::component`](crate::dataset::AxisLabel::component) of the plot axes)
    /// apply when the turbine does not name its components.
    pub fn outlines(&self, default_ix: usize, default_iy: usize) -> PostproResult<Vec<Polyline>> {
        let ix = self.ix.unwrap_or(default_ix);
        let iy = self.iy.unwrap_or(default_iy);
        if ix > 2 || iy > 2 {
            return Err(PostproError::validation(format!(
                "turbine component indices must be 0..=2, got ix={ix} iy={iy}"
            )));
        }
        if !(self.rotordiameter > 0.0) {
            return Err(PostproError::validation(format!(
                "turbine rotordiameter must be positive, got {}",
                self.rotordiameter
            )));
        }
        let style = self.linestyle.clone().unwrap_or_default();
        let color = Rgba8::parse(&style.color)?.with_alpha(style.alpha);

        let d = self.nacelledir.to_radians();
        // Unit vector in the rotor plane, perpendicular to the nacelle axis.
        let tangent = [d.cos(), -d.sin(), 0.0];
        let hub = [
            self.basexyz[0],
            self.basexyz[1],
            self.basexyz[2] + self.hubheight,
        ];
        let radius = 0.5 * self.rotordiameter;

        let project = |p: [f64; 3]| Point::new(p[ix], p[iy]);
        let disc: Vec<Point> = (0..=DISC_SEGMENTS)
            .map(|k| {
                let a = std::f64::consts::TAU * k as f64 / DISC_SEGMENTS as f64;
                let (s, c) = a.sin_cos();
                project([
                    hub[0] + radius * c * tangent[0],
                    hub[1] + radius * c * tangent[1],
                    hub[2] + radius * s,
                ])
            })
            .collect();
        let tower = vec![project(self.basexyz), project(hub)];

        Ok(vec![
            Polyline {
                points: disc,
                color,
                width_pt: style.lw,
            },
            Polyline {
                points: tower,
                color,
                width_pt: style.lw,
            },
        ])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/turbine.rs"]
mod tests;
