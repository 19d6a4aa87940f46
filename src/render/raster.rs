//! CPU rasterization of field data straight into a premultiplied RGBA8 buffer.

use std::f64::consts::TAU;

use crate::foundation::core::{Affine, Point, Rect, Rgba8};
use crate::render::colormap::LevelBands;
use crate::render::figure::{ContourPanel, PolarPanel};

/// Mutable view of an RGBA8 canvas with a clip rectangle in pixel units.
pub(crate) struct Canvas<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(data: &'a mut [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 4);
        Self {
            data,
            width,
            height,
        }
    }

    fn put(&mut self, x: u32, y: u32, c: Rgba8) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        // Field colors are opaque, so premultiplied and straight bytes coincide.
        self.data[i..i + 4].copy_from_slice(&[c.r, c.g, c.b, 255]);
    }

    /// Integer pixel span `[lo, hi)` covered by `[a, b]` on an axis of `n` pixels.
    fn span(a: f64, b: f64, n: u32) -> (u32, u32) {
        let lo = a.floor().max(0.0).min(f64::from(n));
        let hi = b.ceil().max(0.0).min(f64::from(n));
        (lo as u32, hi as u32)
    }
}

/// Fill the panel's grid cells as pairs of triangles, colored by the level band of the
/// linearly interpolated value at each pixel centre.
pub(crate) fn fill_contour(canvas: &mut Canvas<'_>, clip: Rect, p: &ContourPanel, to_px: Affine) {
    let node = |k: usize| -> Option<(Point, f64)> {
        let (x, y, v) = (p.xs[k], p.ys[k], p.values[k]);
        (x.is_finite() && y.is_finite() && v.is_finite()).then(|| (to_px * Point::new(x, y), v))
    };
    for i in 0..p.n1 - 1 {
        for j in 0..p.n2 - 1 {
            let k00 = i * p.n2 + j;
            let (k01, k10, k11) = (k00 + 1, k00 + p.n2, k00 + p.n2 + 1);
            let (Some(a), Some(b), Some(c), Some(d)) = (node(k00), node(k01), node(k10), node(k11))
            else {
                continue;
            };
            fill_triangle(canvas, clip, &p.bands, [a, b, d]);
            fill_triangle(canvas, clip, &p.bands, [a, d, c]);
        }
    }
}

fn fill_triangle(canvas: &mut Canvas<'_>, clip: Rect, bands: &LevelBands, tri: [(Point, f64); 3]) {
    let [(p0, v0), (p1, v1), (p2, v2)] = tri;
    let area = (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y);
    if area.abs() < 1e-12 {
        return;
    }
    let min_x = p0.x.min(p1.x).min(p2.x).max(clip.x0);
    let max_x = p0.x.max(p1.x).max(p2.x).min(clip.x1);
    let min_y = p0.y.min(p1.y).min(p2.y).max(clip.y0);
    let max_y = p0.y.max(p1.y).max(p2.y).min(clip.y1);
    if min_x >= max_x || min_y >= max_y {
        return;
    }
    let (x_lo, x_hi) = Canvas::span(min_x, max_x, canvas.width);
    let (y_lo, y_hi) = Canvas::span(min_y, max_y, canvas.height);
    let eps = -1e-9;

    for py in y_lo..y_hi {
        let cy = f64::from(py) + 0.5;
        if cy < clip.y0 || cy > clip.y1 {
            continue;
        }
        for px in x_lo..x_hi {
            let cx = f64::from(px) + 0.5;
            if cx < clip.x0 || cx > clip.x1 {
                continue;
            }
            let w0 = ((p1.x - cx) * (p2.y - cy) - (p2.x - cx) * (p1.y - cy)) / area;
            let w1 = ((p2.x - cx) * (p0.y - cy) - (p0.x - cx) * (p2.y - cy)) / area;
            let w2 = 1.0 - w0 - w1;
            if w0 < eps || w1 < eps || w2 < eps {
                continue;
            }
            if let Some(c) = bands.color_of(w0 * v0 + w1 * v1 + w2 * v2) {
                canvas.put(px, py, c);
            }
        }
    }
}

fn nearest_index(sorted: &[f64], v: f64) -> usize {
    let k = sorted.partition_point(|&s| s < v);
    if k == 0 {
        return 0;
    }
    if k >= sorted.len() {
        return sorted.len() - 1;
    }
    if v - sorted[k - 1] <= sorted[k] - v { k - 1 } else { k }
}

/// Shade the disc of `radius` pixels around `center` by the nearest polar lattice cell.
pub(crate) fn fill_polar(canvas: &mut Canvas<'_>, center: Point, radius: f64, p: &PolarPanel) {
    let rmax = p.r.last().copied().unwrap_or(0.0);
    let ntheta = p.theta.len();
    if rmax <= 0.0 || ntheta == 0 || p.values.len() != p.r.len() * ntheta {
        return;
    }
    let dtheta = TAU / ntheta as f64;
    let span = if p.vmax > p.vmin { p.vmax - p.vmin } else { 0.0 };

    let (x_lo, x_hi) = Canvas::span(center.x - radius, center.x + radius, canvas.width);
    let (y_lo, y_hi) = Canvas::span(center.y - radius, center.y + radius, canvas.height);
    for py in y_lo..y_hi {
        let dy = center.y - (f64::from(py) + 0.5);
        for px in x_lo..x_hi {
            let dx = f64::from(px) + 0.5 - center.x;
            let rho = dx.hypot(dy);
            if rho > radius {
                continue;
            }
            let ir = nearest_index(&p.r, rho / radius * rmax);
            let t = dy.atan2(dx).rem_euclid(TAU);
            let it = ((t - p.theta[0]) / dtheta).round().rem_euclid(ntheta as f64) as usize;
            let v = p.values[ir * ntheta + it.min(ntheta - 1)];
            if v.is_nan() {
                continue;
            }
            let frac = if span > 0.0 { (v - p.vmin) / span } else { 0.5 };
            canvas.put(px, py, p.cmap.sample(frac));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
