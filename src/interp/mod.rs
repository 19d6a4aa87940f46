//! Interpolation on structured plane grids: point probes and Cartesian-to-polar
//! resampling.

pub(crate) mod polar;

use crate::foundation::error::{PostproError, PostproResult};

pub use polar::{PolarGrid, cart_to_radial};

/// Interpolation scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpMethod {
    /// Bilinear within the enclosing cell.
    Linear,
    /// Value of the closest node.
    Nearest,
}

impl InterpMethod {
    /// Parse `linear` or `nearest`.
    pub fn parse(s: &str) -> PostproResult<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            other => Err(PostproError::validation(format!(
                "unknown interpolation method '{other}', expected linear or nearest"
            ))),
        }
    }
}

/// Rectilinear view of a plane's 2-D coordinate arrays.
///
/// `u` is the abscissa axis and `v` the ordinate axis; either may run along the first or
/// the second storage dimension and may be ascending or descending.
#[derive(Clone, Debug, PartialEq)]
pub struct RectGrid {
    u: Vec<f64>,
    v: Vec<f64>,
    n1: usize,
    n2: usize,
    transposed: bool,
}

impl RectGrid {
    /// Build from flattened `[n1, n2]` abscissa/ordinate arrays.
    pub fn from_coords(xs: &[f64], ys: &[f64], n1: usize, n2: usize) -> PostproResult<Self> {
        if n1 == 0 || n2 == 0 || xs.len() != n1 * n2 || ys.len() != n1 * n2 {
            return Err(PostproError::validation(format!(
                "coordinate arrays of length {}/{} do not match grid {n1}x{n2}",
                xs.len(),
                ys.len()
            )));
        }
        let along2 = |a: &[f64]| (a[n2 - 1] - a[0]).abs();
        let along1 = |a: &[f64]| (a[(n1 - 1) * n2] - a[0]).abs();
        let transposed = along1(xs) > along2(xs) || (along1(xs) == along2(xs) && along2(ys) > along1(ys));

        let (u, v): (Vec<f64>, Vec<f64>) = if transposed {
            ((0..n1).map(|i| xs[i * n2]).collect(), ys[..n2].to_vec())
        } else {
            (xs[..n2].to_vec(), (0..n1).map(|i| ys[i * n2]).collect())
        };

        let grid = Self {
            u,
            v,
            n1,
            n2,
            transposed,
        };
        grid.check_rectilinear(xs, ys)?;
        Ok(grid)
    }

    fn check_rectilinear(&self, xs: &[f64], ys: &[f64]) -> PostproResult<()> {
        let tol = |axis: &[f64]| {
            let (lo, hi) = min_max(axis);
            (hi - lo).abs().max(1.0) * 1e-6
        };
        let (tu, tv) = (tol(&self.u), tol(&self.v));
        for i in 0..self.n1 {
            for j in 0..self.n2 {
                let (iu, iv) = self.axis_indices(i, j);
                let k = i * self.n2 + j;
                if (xs[k] - self.u[iu]).abs() > tu || (ys[k] - self.v[iv]).abs() > tv {
                    return Err(PostproError::validation(
                        "plane grid is not rectilinear in the selected axes",
                    ));
                }
            }
        }
        for (name, axis) in [("abscissa", &self.u), ("ordinate", &self.v)] {
            if !is_strictly_monotonic(axis) {
                return Err(PostproError::validation(format!(
                    "{name} coordinates are not strictly monotonic"
                )));
            }
        }
        Ok(())
    }

    // (storage i, j) -> (u index, v index)
    fn axis_indices(&self, i: usize, j: usize) -> (usize, usize) {
        if self.transposed { (i, j) } else { (j, i) }
    }

    fn flat(&self, iu: usize, iv: usize) -> usize {
        if self.transposed {
            iu * self.n2 + iv
        } else {
            iv * self.n2 + iu
        }
    }

    /// Abscissa node values.
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    /// Ordinate node values.
    pub fn v(&self) -> &[f64] {
        &self.v
    }

    /// Interpolate `field` (flattened `[n1, n2]`) at `(x, y)`. Outside the grid: NaN.
    pub fn sample(&self, field: &[f64], x: f64, y: f64, method: InterpMethod) -> f64 {
        let (Some((iu, fu)), Some((iv, fv))) = (locate(&self.u, x), locate(&self.v, y)) else {
            return f64::NAN;
        };
        let at = |du: usize, dv: usize| {
            let a = (iu + du).min(self.u.len() - 1);
            let b = (iv + dv).min(self.v.len() - 1);
            field.get(self.flat(a, b)).copied().unwrap_or(f64::NAN)
        };
        match method {
            InterpMethod::Nearest => at(usize::from(fu >= 0.5), usize::from(fv >= 0.5)),
            InterpMethod::Linear => {
                let mut acc = 0.0;
                for (du, wu) in [(0, 1.0 - fu), (1, fu)] {
                    for (dv, wv) in [(0, 1.0 - fv), (1, fv)] {
                        let w = wu * wv;
                        if w != 0.0 {
                            acc += w * at(du, dv);
                        }
                    }
                }
                acc
            }
        }
    }
}

fn min_max(a: &[f64]) -> (f64, f64) {
    a.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn is_strictly_monotonic(a: &[f64]) -> bool {
    a.windows(2).all(|w| w[1] > w[0]) || a.windows(2).all(|w| w[1] < w[0])
}

/// Lower node index and fractional offset of `t` along `axis`.
fn locate(axis: &[f64], t: f64) -> Option<(usize, f64)> {
    let n = axis.len();
    if !t.is_finite() || n == 0 {
        return None;
    }
    if n == 1 {
        let tol = axis[0].abs().max(1.0) * 1e-9;
        return ((t - axis[0]).abs() <= tol).then_some((0, 0.0));
    }
    let ascending = axis[n - 1] > axis[0];
    let (lo, hi) = if ascending {
        (axis[0], axis[n - 1])
    } else {
        (axis[n - 1], axis[0])
    };
    let eps = (hi - lo) * 1e-12;
    if t < lo - eps || t > hi + eps {
        return None;
    }
    let k = if ascending {
        axis.partition_point(|&a| a <= t)
    } else {
        axis.partition_point(|&a| a >= t)
    };
    let i = k.saturating_sub(1).min(n - 2);
    let frac = (t - axis[i]) / (axis[i + 1] - axis[i]);
    Some((i, frac.clamp(0.0, 1.0)))
}

#[cfg(test)]
#[path = "../../tests/unit/interp/grid.rs"]
mod tests;
