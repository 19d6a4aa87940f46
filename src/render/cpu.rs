//! CPU figure renderer: field fills go straight into the pixmap, axes chrome is composited on
//! top through `resvg`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PostproError, PostproResult};
use crate::render::figure::{Figure, Panel};
use crate::render::frame::FrameRGBA;
use crate::render::layout::{layout_contour, layout_polar};
use crate::render::overlay::{SvgDoc, contour_chrome, polar_chrome};
use crate::render::raster::{Canvas, fill_contour, fill_polar};

/// Rasterizes [`Figure`]s into premultiplied RGBA frames.
pub struct FigureRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl FigureRenderer {
    /// Renderer using the system fonts.
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Renderer using the system fonts plus every `ttf`/`otf`/`ttc` file in `dir`.
    pub fn with_font_dir(dir: &Path) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        db.load_fonts_dir(dir);
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Number of font faces available for labels.
    pub fn face_count(&self) -> usize {
        self.fontdb.faces().count()
    }

    /// Render every populated slot of `fig` onto a white canvas.
    #[tracing::instrument(skip(self, fig), fields(slots = fig.len()))]
    pub fn render(&self, fig: &Figure) -> PostproResult<FrameRGBA> {
        let (width, height) = fig.pixel_size();
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            PostproError::evaluation(format!("failed to allocate {width}x{height} pixmap"))
        })?;
        pixmap.fill(resvg::tiny_skia::Color::WHITE);

        let dpi = fig.dpi();
        let mut svg = SvgDoc::new(width, height);
        for (index, slot) in fig.panels().iter().enumerate() {
            let Some(panel) = slot else {
                continue;
            };
            let cell = fig.cell_rect(index);
            match panel {
                Panel::Contour(p) => {
                    let lay = layout_contour(cell, p, dpi)?;
                    let mut canvas = Canvas::new(pixmap.data_mut(), width, height);
                    fill_contour(&mut canvas, lay.plot, p, lay.to_px);
                    contour_chrome(&mut svg, p, &lay, dpi);
                }
                Panel::Polar(p) => {
                    let lay = layout_polar(cell, p, dpi)?;
                    let mut canvas = Canvas::new(pixmap.data_mut(), width, height);
                    fill_polar(&mut canvas, lay.center, lay.radius, p);
                    polar_chrome(&mut svg, p, &lay, dpi);
                }
            }
        }

        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg.finish(), &opts).context("parse figure overlay svg")?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        tracing::debug!(width, height, "rendered figure");

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

impl Default for FigureRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
