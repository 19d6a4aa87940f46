//! Pixel geometry of panels: margins, aspect, ticks and the data-to-pixel mapping.

use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{PostproError, PostproResult};
use crate::foundation::math::{format_ticks, linspace, nice_ticks};
use crate::render::figure::{AxisScale, ContourPanel, PolarPanel};

/// Average glyph advance relative to the font size.
const GLYPH_ADVANCE: f64 = 0.6;

pub(crate) fn font_px(pt: f64, dpi: f64) -> f64 {
    pt * dpi / 72.0
}

pub(crate) fn text_width(s: &str, px: f64) -> f64 {
    s.chars().count() as f64 * px * GLYPH_ADVANCE
}

pub(crate) struct Ticks {
    pub(crate) values: Vec<f64>,
    pub(crate) labels: Vec<String>,
}

impl Ticks {
    fn new(values: Vec<f64>) -> Self {
        let labels = format_ticks(&values);
        Self { values, labels }
    }

    fn max_width(&self, px: f64) -> f64 {
        self.labels
            .iter()
            .map(|l| text_width(l, px))
            .fold(0.0, f64::max)
    }
}

pub(crate) struct ColorbarLayout {
    pub(crate) rect: Rect,
    pub(crate) ticks: Ticks,
}

pub(crate) struct ContourLayout {
    pub(crate) plot: Rect,
    pub(crate) xlim: [f64; 2],
    pub(crate) ylim: [f64; 2],
    pub(crate) xticks: Ticks,
    pub(crate) yticks: Ticks,
    pub(crate) colorbar: Option<ColorbarLayout>,
    pub(crate) to_px: Affine,
    pub(crate) font: f64,
    pub(crate) tick_len: f64,
    pub(crate) pad: f64,
}

fn finite_range(values: &[f64]) -> Option<[f64; 2]> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    (lo <= hi).then_some([lo, hi])
}

fn widen(r: [f64; 2]) -> [f64; 2] {
    if r[0] == r[1] {
        [r[0] - 0.5, r[1] + 0.5]
    } else {
        r
    }
}

fn ticks_within(lim: [f64; 2], target: usize) -> Vec<f64> {
    let (lo, hi) = (lim[0].min(lim[1]), lim[0].max(lim[1]));
    let eps = (hi - lo) * 1e-9;
    nice_ticks(lo, hi, target)
        .into_iter()
        .filter(|t| *t >= lo - eps && *t <= hi + eps)
        .collect()
}

/// Ticks of a contour colorbar: `nticks` values evenly spaced over the level range, or
/// round numbers when not overridden.
pub(crate) fn colorbar_ticks(levels: &[f64], nticks: Option<usize>) -> Vec<f64> {
    let (lo, hi) = (levels[0], levels[levels.len() - 1]);
    match nticks {
        Some(k) => linspace(lo, hi, k),
        None => ticks_within([lo, hi], 6),
    }
}

/// Fractional position (0 bottom, 1 top) of `v` on a colorbar whose bands have equal length.
pub(crate) fn uniform_band_position(levels: &[f64], v: f64) -> f64 {
    let n = levels.len() - 1;
    if v <= levels[0] {
        return 0.0;
    }
    if v >= levels[n] {
        return 1.0;
    }
    let k = levels.partition_point(|&l| l <= v).saturating_sub(1).min(n - 1);
    let frac = (v - levels[k]) / (levels[k + 1] - levels[k]);
    (k as f64 + frac) / n as f64
}

fn fit_aspect(avail: Rect, ratio: f64) -> Rect {
    // ratio = height / width of the box
    let (w, h) = (avail.width(), avail.height());
    let (bw, bh) = if w * ratio <= h {
        (w, w * ratio)
    } else {
        (h / ratio, h)
    };
    let c = avail.center();
    Rect::new(c.x - bw / 2.0, c.y - bh / 2.0, c.x + bw / 2.0, c.y + bh / 2.0)
}

pub(crate) fn layout_contour(cell: Rect, p: &ContourPanel, dpi: f64) -> PostproResult<ContourLayout> {
    let xlim = p
        .xlim
        .unwrap_or_else(|| widen(finite_range(&p.xs).unwrap_or([0.0, 1.0])));
    let ylim = p
        .ylim
        .unwrap_or_else(|| widen(finite_range(&p.ys).unwrap_or([0.0, 1.0])));
    if xlim[0] == xlim[1] || ylim[0] == ylim[1] {
        return Err(PostproError::validation(format!(
            "degenerate axis limits x={xlim:?} y={ylim:?}"
        )));
    }

    let font = font_px(p.fontsize, dpi);
    let pad = 0.35 * font;
    let tick_len = 0.35 * font;

    let xticks = Ticks::new(ticks_within(xlim, 6));
    let yticks = Ticks::new(ticks_within(ylim, 5));

    let left = pad
        + yticks.max_width(font)
        + pad * 0.5
        + tick_len
        + if p.ylabel.is_some() { 1.3 * font } else { 0.0 };
    let bottom = tick_len
        + pad * 0.5
        + font
        + if p.xlabel.is_some() { 1.3 * font } else { 0.0 }
        + pad;
    let top = if p.title.is_empty() { 0.6 * font } else { 1.7 * font };

    let cbar_ticks = p
        .colorbar
        .as_ref()
        .map(|c| Ticks::new(colorbar_ticks(p.bands.levels(), c.nticks)));
    let cbar_gap = 0.05 * dpi;
    let right = match (&p.colorbar, &cbar_ticks) {
        (Some(spec), Some(t)) => {
            cbar_gap
                + tick_len
                + pad * 0.5
                + t.max_width(font)
                + pad
                + if spec.label.is_some() { 1.3 * font } else { 0.0 }
        }
        _ => 0.6 * font,
    };

    let mut avail = Rect::new(
        cell.x0 + left,
        cell.y0 + top,
        cell.x1 - right,
        cell.y1 - bottom,
    );
    if p.colorbar.is_some() {
        // Bar width is 3% of the axes width.
        let aw = avail.width() / 1.03;
        avail.x1 = avail.x0 + aw;
    }
    if avail.width() < 2.0 || avail.height() < 2.0 {
        return Err(PostproError::validation(format!(
            "figure cell of {:.0}x{:.0} px is too small for the axes decorations",
            cell.width(),
            cell.height()
        )));
    }

    let dx = (xlim[1] - xlim[0]).abs();
    let dy = (ylim[1] - ylim[0]).abs();
    let plot = if p.axis_scale.keeps_data_aspect() {
        fit_aspect(avail, dy / dx)
    } else if p.axis_scale == AxisScale::Square {
        fit_aspect(avail, 1.0)
    } else {
        avail
    };

    let sx = plot.width() / (xlim[1] - xlim[0]);
    let sy = plot.height() / (ylim[1] - ylim[0]);
    let to_px = Affine::new([
        sx,
        0.0,
        0.0,
        -sy,
        plot.x0 - xlim[0] * sx,
        plot.y1 + ylim[0] * sy,
    ]);

    let colorbar = cbar_ticks.map(|ticks| ColorbarLayout {
        rect: Rect::new(
            plot.x1 + cbar_gap,
            plot.y0,
            plot.x1 + cbar_gap + 0.03 * plot.width(),
            plot.y1,
        ),
        ticks,
    });

    Ok(ContourLayout {
        plot,
        xlim,
        ylim,
        xticks,
        yticks,
        colorbar,
        to_px,
        font,
        tick_len,
        pad,
    })
}

pub(crate) struct PolarLayout {
    pub(crate) center: Point,
    pub(crate) radius: f64,
    pub(crate) rticks: Ticks,
    pub(crate) colorbar: Option<ColorbarLayout>,
    pub(crate) font: f64,
    pub(crate) tick_len: f64,
    pub(crate) pad: f64,
}

pub(crate) fn layout_polar(cell: Rect, p: &PolarPanel, dpi: f64) -> PostproResult<PolarLayout> {
    let font = font_px(p.fontsize, dpi);
    let pad = 0.35 * font;
    let tick_len = 0.35 * font;
    let label_room = 2.4 * font;
    let top = if p.title.is_empty() { 0.0 } else { 1.5 * font };

    let cbar_ticks = p
        .colorbar
        .then(|| Ticks::new(ticks_within([p.vmin, p.vmax], 6)));
    let cbar_room = cbar_ticks
        .as_ref()
        .map_or(0.0, |t| 0.15 * cell.width() + t.max_width(font));

    let avail = Rect::new(
        cell.x0 + label_room,
        cell.y0 + top + label_room,
        cell.x1 - label_room - cbar_room,
        cell.y1 - label_room,
    );
    let radius = 0.5 * avail.width().min(avail.height());
    if radius < 2.0 {
        return Err(PostproError::validation(format!(
            "figure cell of {:.0}x{:.0} px is too small for a polar plot",
            cell.width(),
            cell.height()
        )));
    }
    let center = avail.center();
    let rmax = p.r.last().copied().unwrap_or(1.0);
    let rticks = Ticks::new(
        ticks_within([0.0, rmax], 4)
            .into_iter()
            .filter(|t| *t > 0.0)
            .collect(),
    );

    let colorbar = cbar_ticks.map(|ticks| {
        let h = 2.0 * radius;
        let x0 = center.x + radius + label_room + 0.05 * cell.width();
        ColorbarLayout {
            rect: Rect::new(x0, center.y - radius, x0 + h / 20.0, center.y + radius),
            ticks,
        }
    });

    Ok(PolarLayout {
        center,
        radius,
        rticks,
        colorbar,
        font,
        tick_len,
        pad,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
