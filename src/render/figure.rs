//! Figure model: a subplot grid of contour and polar panels.

use std::collections::BTreeMap;

use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{PostproError, PostproResult};
use crate::render::colormap::{Colormap, LevelBands};

const MAX_DIM: u32 = 16_384;

/// Axes aspect handling, after matplotlib's `ax.axis(mode)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisScale {
    /// Equal data units on both axes.
    Equal,
    /// Equal units, box shrunk to the data extent.
    Scaled,
    /// Limits fitted to the data, box fills the cell.
    Tight,
    /// Box fills the cell.
    Auto,
    /// Equal units with limits fitted to the data.
    Image,
    /// Square axes box.
    Square,
}

impl AxisScale {
    /// Parse one of `equal, scaled, tight, auto, image, square`.
    pub fn parse(s: &str) -> PostproResult<Self> {
        Ok(match s {
            "equal" => Self::Equal,
            "scaled" => Self::Scaled,
            "tight" => Self::Tight,
            "auto" => Self::Auto,
            "image" => Self::Image,
            "square" => Self::Square,
            other => {
                return Err(PostproError::validation(format!(
                    "unknown axisscale '{other}' (expected equal, scaled, tight, auto, image or square)"
                )));
            }
        })
    }

    pub(crate) fn keeps_data_aspect(self) -> bool {
        matches!(self, Self::Equal | Self::Scaled | Self::Image)
    }
}

/// Open or closed line drawn in data coordinates over a panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    /// Vertices in data coordinates.
    pub points: Vec<Point>,
    /// Stroke color, alpha included.
    pub color: Rgba8,
    /// Stroke width in points.
    pub width_pt: f64,
}

/// Colorbar settings of a contour panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorbarSpec {
    /// Label drawn along the bar.
    pub label: Option<String>,
    /// Number of evenly spaced ticks between the first and last level.
    pub nticks: Option<usize>,
}

/// Filled contour plot over a structured 2-D grid.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourPanel {
    /// Abscissa per node, flattened `[n1, n2]`.
    pub xs: Vec<f64>,
    /// Ordinate per node, flattened `[n1, n2]`.
    pub ys: Vec<f64>,
    /// Grid rows.
    pub n1: usize,
    /// Grid columns.
    pub n2: usize,
    /// Field value per node, flattened `[n1, n2]`.
    pub values: Vec<f64>,
    /// Level bands and colors.
    pub bands: LevelBands,
    /// Colorbar, if drawn.
    pub colorbar: Option<ColorbarSpec>,
    /// X axis label.
    pub xlabel: Option<String>,
    /// Y axis label.
    pub ylabel: Option<String>,
    /// X limits override.
    pub xlim: Option<[f64; 2]>,
    /// Y limits override.
    pub ylim: Option<[f64; 2]>,
    /// Aspect mode.
    pub axis_scale: AxisScale,
    /// Title, `$...$` segments rendered as math text.
    pub title: String,
    /// Font size in points for labels, ticks and title.
    pub fontsize: f64,
    /// Lines drawn on top of the field.
    pub overlays: Vec<Polyline>,
}

impl ContourPanel {
    /// Check array lengths against the grid.
    pub fn validate(&self) -> PostproResult<()> {
        let n = self.n1 * self.n2;
        if self.n1 < 2 || self.n2 < 2 {
            return Err(PostproError::validation(format!(
                "contour grid must be at least 2x2, got {}x{}",
                self.n1, self.n2
            )));
        }
        for (name, len) in [
            ("x", self.xs.len()),
            ("y", self.ys.len()),
            ("field", self.values.len()),
        ] {
            if len != n {
                return Err(PostproError::validation(format!(
                    "{name} array has {len} values, grid {}x{} needs {n}",
                    self.n1, self.n2
                )));
            }
        }
        Ok(())
    }
}

/// Pseudocolor plot on a polar lattice, nearest-cell shading.
#[derive(Clone, Debug, PartialEq)]
pub struct PolarPanel {
    /// Radii, ascending from zero.
    pub r: Vec<f64>,
    /// Evenly spaced angles in `[0, 2π)`, counter-clockwise from east.
    pub theta: Vec<f64>,
    /// Values, row-major `[r, theta]`.
    pub values: Vec<f64>,
    /// Lower color bound.
    pub vmin: f64,
    /// Upper color bound.
    pub vmax: f64,
    /// Color map.
    pub cmap: Colormap,
    /// Whether to draw a colorbar.
    pub colorbar: bool,
    /// Title text.
    pub title: String,
    /// Font size in points.
    pub fontsize: f64,
}

/// Content of one subplot.
#[derive(Clone, Debug, PartialEq)]
pub enum Panel {
    /// Filled contour plot.
    Contour(Box<ContourPanel>),
    /// Polar pseudocolor plot.
    Polar(Box<PolarPanel>),
}

/// A figure: a pixel canvas split into a grid of subplots.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    figsize: [f64; 2],
    dpi: f64,
    nrows: usize,
    ncols: usize,
    panels: Vec<Option<Panel>>,
}

impl Figure {
    /// Empty `nrows x ncols` figure of `figsize` inches at `dpi`.
    pub fn new(figsize: [f64; 2], dpi: f64, nrows: usize, ncols: usize) -> PostproResult<Self> {
        if !(figsize[0] > 0.0 && figsize[1] > 0.0 && dpi > 0.0) {
            return Err(PostproError::validation(format!(
                "figure size {figsize:?} at dpi {dpi} must be positive"
            )));
        }
        if nrows == 0 || ncols == 0 {
            return Err(PostproError::validation("figure needs at least one row and column"));
        }
        let (w, h) = (figsize[0] * dpi, figsize[1] * dpi);
        if w.round() < 1.0 || h.round() < 1.0 || w > f64::from(MAX_DIM) || h > f64::from(MAX_DIM) {
            return Err(PostproError::validation(format!(
                "figure of {w:.0}x{h:.0} pixels is outside 1..={MAX_DIM}"
            )));
        }
        Ok(Self {
            figsize,
            dpi,
            nrows,
            ncols,
            panels: vec![None; nrows * ncols],
        })
    }

    /// Single-panel figure holding `panel`.
    pub fn single(figsize: [f64; 2], dpi: f64, panel: Panel) -> PostproResult<Self> {
        let mut fig = Self::new(figsize, dpi, 1, 1)?;
        fig.set_panel(0, panel)?;
        Ok(fig)
    }

    /// Resolution in dots per inch.
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Number of subplot slots.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// True when the figure has no slots; never the case for a constructed figure.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.figsize[0] * self.dpi).round() as u32,
            (self.figsize[1] * self.dpi).round() as u32,
        )
    }

    /// Replace the content of slot `index` (row-major).
    pub fn set_panel(&mut self, index: usize, panel: Panel) -> PostproResult<()> {
        if let Panel::Contour(c) = &panel {
            c.validate()?;
        }
        let n = self.panels.len();
        let slot = self.panels.get_mut(index).ok_or_else(|| {
            PostproError::validation(format!(
                "subplot index {index} out of range for a figure with {n} axes"
            ))
        })?;
        *slot = Some(panel);
        Ok(())
    }

    /// Slots in row-major order.
    pub fn panels(&self) -> &[Option<Panel>] {
        &self.panels
    }

    /// Pixel rectangle of slot `index`.
    pub fn cell_rect(&self, index: usize) -> Rect {
        let (w, h) = self.pixel_size();
        let cw = f64::from(w) / self.ncols as f64;
        let ch = f64::from(h) / self.nrows as f64;
        let (row, col) = (index / self.ncols, index % self.ncols);
        Rect::new(
            col as f64 * cw,
            row as f64 * ch,
            (col + 1) as f64 * cw,
            (row + 1) as f64 * ch,
        )
    }
}

/// Named figures shared by every plane of a run.
#[derive(Clone, Debug, Default)]
pub struct FigureStore {
    figures: BTreeMap<String, Figure>,
}

impl FigureStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fig` under `name`, replacing an earlier declaration.
    pub fn insert(&mut self, name: impl Into<String>, fig: Figure) {
        self.figures.insert(name.into(), fig);
    }

    /// Figure `name`.
    pub fn get(&self, name: &str) -> PostproResult<&Figure> {
        self.figures
            .get(name)
            .ok_or_else(|| PostproError::validation(format!("figure '{name}' was not declared")))
    }

    /// Mutable figure `name`.
    pub fn get_mut(&mut self, name: &str) -> PostproResult<&mut Figure> {
        self.figures
            .get_mut(name)
            .ok_or_else(|| PostproError::validation(format!("figure '{name}' was not declared")))
    }

    /// Declared figure names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.figures.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/figure.rs"]
mod tests;
