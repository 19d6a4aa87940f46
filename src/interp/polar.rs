use std::f64::consts::TAU;

use crate::foundation::error::{PostproError, PostproResult};
use crate::foundation::math::linspace;
use crate::interp::{InterpMethod, RectGrid};

/// Polar sampling lattice: `r = linspace(0, LR, NR)` and `NTheta` angles in `[0, 2π)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PolarGrid {
    /// Radii.
    pub r: Vec<f64>,
    /// Angles in radians, counter-clockwise from east.
    pub theta: Vec<f64>,
}

impl PolarGrid {
    /// Build the lattice; `linspace(0, 2π, NTheta + 1)` without its duplicate endpoint.
    pub fn new(lr: f64, nr: usize, ntheta: usize) -> PostproResult<Self> {
        if !(lr.is_finite() && lr > 0.0) {
            return Err(PostproError::validation(format!(
                "LR must be a positive radius, got {lr}"
            )));
        }
        if nr < 2 || ntheta < 2 {
            return Err(PostproError::validation(format!(
                "NR and NTheta must be at least 2, got {nr} and {ntheta}"
            )));
        }
        let mut theta = linspace(0.0, TAU, ntheta + 1);
        theta.pop();
        Ok(Self {
            r: linspace(0.0, lr, nr),
            theta,
        })
    }
}

/// Resample `field` around `(xc, yc)` onto `polar`, row-major `[NR, NTheta]`.
pub fn cart_to_radial(
    grid: &RectGrid,
    field: &[f64],
    xc: f64,
    yc: f64,
    polar: &PolarGrid,
) -> Vec<f64> {
    let mut out = Vec::with_capacity(polar.r.len() * polar.theta.len());
    for &r in &polar.r {
        for &t in &polar.theta {
            let x = xc + r * t.cos();
            let y = yc + r * t.sin();
            out.push(grid.sample(field, x, y, InterpMethod::Linear));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/interp/polar.rs"]
mod tests;
