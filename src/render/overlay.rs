//! Axes chrome (frames, ticks, labels, colorbars, overlays) emitted as SVG and rasterized
//! with `resvg` on top of the field pixels.

use std::fmt::Write as _;

use crate::foundation::core::{Point, Rect, Rgba8};
use crate::render::colormap::Colormap;
use crate::render::figure::{ContourPanel, PolarPanel};
use crate::render::layout::{
    ColorbarLayout, ContourLayout, PolarLayout, font_px, uniform_band_position,
};

const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";
const GRID_GRAY: &str = "#b0b0b0";
const THETA_LABELS: [&str; 8] = ["90°", "45°", "0°", "315°", "270°", "225°", "180°", "135°"];

#[derive(Clone, Copy)]
pub(crate) enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

pub(crate) struct SvgDoc {
    buf: String,
    next_clip: usize,
}

impl SvgDoc {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let mut buf = String::new();
        let _ = write!(
            buf,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        Self { buf, next_clip: 0 }
    }

    pub(crate) fn finish(mut self) -> String {
        self.buf.push_str("</svg>");
        self.buf
    }

    fn line(&mut self, a: Point, b: Point, stroke: &str, width: f64, dash: Option<f64>) {
        let _ = write!(
            self.buf,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{stroke}" stroke-width="{width:.2}""#,
            a.x, a.y, b.x, b.y
        );
        if let Some(d) = dash {
            let _ = write!(self.buf, r#" stroke-dasharray="{d:.2} {d:.2}""#);
        }
        self.buf.push_str("/>");
    }

    fn rect(&mut self, r: Rect, fill: &str, stroke: Option<(&str, f64)>) {
        let _ = write!(
            self.buf,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{fill}""#,
            r.x0,
            r.y0,
            r.width(),
            r.height()
        );
        if let Some((s, w)) = stroke {
            let _ = write!(self.buf, r#" stroke="{s}" stroke-width="{w:.2}""#);
        }
        self.buf.push_str("/>");
    }

    fn polygon(&mut self, pts: &[Point], fill: &str, stroke: Option<(&str, f64)>) {
        self.buf.push_str("<polygon points=\"");
        push_points(&mut self.buf, pts);
        let _ = write!(self.buf, r#"" fill="{fill}""#);
        if let Some((s, w)) = stroke {
            let _ = write!(self.buf, r#" stroke="{s}" stroke-width="{w:.2}" stroke-linejoin="miter""#);
        }
        self.buf.push_str("/>");
    }

    fn circle(&mut self, c: Point, r: f64, stroke: &str, width: f64, dash: Option<f64>) {
        let _ = write!(
            self.buf,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{r:.2}" fill="none" stroke="{stroke}" stroke-width="{width:.2}""#,
            c.x, c.y
        );
        if let Some(d) = dash {
            let _ = write!(self.buf, r#" stroke-dasharray="{d:.2} {d:.2}""#);
        }
        self.buf.push_str("/>");
    }

    fn clip_rect(&mut self, r: Rect) -> String {
        let id = format!("clip{}", self.next_clip);
        self.next_clip += 1;
        let _ = write!(
            self.buf,
            r#"<clipPath id="{id}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height()
        );
        id
    }

    fn polyline(&mut self, pts: &[Point], color: Rgba8, width: f64, clip: Option<&str>) {
        self.buf.push_str("<polyline points=\"");
        push_points(&mut self.buf, pts);
        let _ = write!(
            self.buf,
            r#"" fill="none" stroke="{}" stroke-opacity="{:.3}" stroke-width="{width:.2}" stroke-linejoin="round""#,
            color.to_hex(),
            color.alpha_f64()
        );
        if let Some(id) = clip {
            let _ = write!(self.buf, r#" clip-path="url(#{id})""#);
        }
        self.buf.push_str("/>");
    }

    fn text(&mut self, at: Point, size: f64, anchor: Anchor, rotate: f64, content: &str) {
        if content.is_empty() {
            return;
        }
        let _ = write!(
            self.buf,
            r#"<text x="{:.2}" y="{:.2}" font-family="{FONT_FAMILY}" font-size="{size:.2}" text-anchor="{}" fill="black""#,
            at.x,
            at.y,
            anchor.as_str()
        );
        if rotate != 0.0 {
            let _ = write!(
                self.buf,
                r#" transform="rotate({rotate:.1} {:.2} {:.2})""#,
                at.x, at.y
            );
        }
        let _ = write!(self.buf, ">{}</text>", escape_xml(&display_text(content)));
    }
}

fn push_points(buf: &mut String, pts: &[Point]) {
    for (i, p) in pts.iter().enumerate() {
        if i > 0 {
            buf.push(' ');
        }
        let _ = write!(buf, "{:.2},{:.2}", p.x, p.y);
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

const TEX_SYMBOLS: &[(&str, &str)] = &[
    ("\\circ", "°"),
    ("\\alpha", "α"),
    ("\\beta", "β"),
    ("\\gamma", "γ"),
    ("\\delta", "δ"),
    ("\\Delta", "Δ"),
    ("\\epsilon", "ε"),
    ("\\theta", "θ"),
    ("\\lambda", "λ"),
    ("\\mu", "μ"),
    ("\\nu", "ν"),
    ("\\pi", "π"),
    ("\\rho", "ρ"),
    ("\\sigma", "σ"),
    ("\\tau", "τ"),
    ("\\phi", "φ"),
    ("\\omega", "ω"),
    ("\\times", "×"),
    ("\\cdot", "·"),
    ("\\pm", "±"),
];

/// Plain-text rendering of a label: `$...$` segments lose their delimiters, grouping braces
/// and sub/superscript markers, and common TeX symbols become Unicode.
pub(crate) fn display_text(s: &str) -> String {
    let mut out = String::new();
    for (k, part) in s.split('$').enumerate() {
        if k % 2 == 0 {
            out.push_str(part);
            continue;
        }
        let mut m = part.to_owned();
        for (tex, uni) in TEX_SYMBOLS {
            m = m.replace(tex, uni);
        }
        out.extend(m.chars().filter(|c| !matches!(c, '{' | '}' | '^' | '_' | '\\')));
    }
    out
}

fn stroke_px(pt: f64, dpi: f64) -> f64 {
    font_px(pt, dpi)
}

pub(crate) fn contour_chrome(svg: &mut SvgDoc, p: &ContourPanel, lay: &ContourLayout, dpi: f64) {
    let frame_w = stroke_px(0.8, dpi);
    let f = lay.font;
    let plot = lay.plot;

    if !p.overlays.is_empty() {
        let clip = svg.clip_rect(plot);
        for line in &p.overlays {
            let pts: Vec<Point> = line.points.iter().map(|q| lay.to_px * *q).collect();
            svg.polyline(&pts, line.color, stroke_px(line.width_pt, dpi), Some(&clip));
        }
    }

    svg.rect(plot, "none", Some(("black", frame_w)));

    let tick_w = stroke_px(0.8, dpi);
    for (t, label) in lay.xticks.values.iter().zip(&lay.xticks.labels) {
        let x = (lay.to_px * Point::new(*t, lay.ylim[0])).x;
        svg.line(
            Point::new(x, plot.y1),
            Point::new(x, plot.y1 + lay.tick_len),
            "black",
            tick_w,
            None,
        );
        svg.text(
            Point::new(x, plot.y1 + lay.tick_len + lay.pad * 0.5 + 0.8 * f),
            f,
            Anchor::Middle,
            0.0,
            label,
        );
    }
    let mut ylabel_room: f64 = 0.0;
    for (t, label) in lay.yticks.values.iter().zip(&lay.yticks.labels) {
        let y = (lay.to_px * Point::new(lay.xlim[0], *t)).y;
        svg.line(
            Point::new(plot.x0 - lay.tick_len, y),
            Point::new(plot.x0, y),
            "black",
            tick_w,
            None,
        );
        svg.text(
            Point::new(plot.x0 - lay.tick_len - lay.pad * 0.5, y + 0.35 * f),
            f,
            Anchor::End,
            0.0,
            label,
        );
        ylabel_room = ylabel_room.max(crate::render::layout::text_width(label, f));
    }

    if let Some(xl) = &p.xlabel {
        let y = plot.y1 + lay.tick_len + lay.pad * 0.5 + f + lay.pad + 0.9 * f;
        svg.text(Point::new(plot.center().x, y), f, Anchor::Middle, 0.0, xl);
    }
    if let Some(yl) = &p.ylabel {
        let x = plot.x0 - lay.tick_len - lay.pad * 1.5 - ylabel_room - 0.3 * f;
        svg.text(Point::new(x, plot.center().y), f, Anchor::Middle, -90.0, yl);
    }
    if !p.title.is_empty() {
        svg.text(
            Point::new(plot.center().x, plot.y0 - 0.5 * f),
            f,
            Anchor::Middle,
            0.0,
            &p.title,
        );
    }

    if let (Some(cb), Some(spec)) = (&lay.colorbar, &p.colorbar) {
        let levels = p.bands.levels();
        let r = cb.rect;
        let ext = 0.05 * r.height();
        let inner = Rect::new(r.x0, r.y0 + ext, r.x1, r.y1 - ext);
        let colors = p.bands.band_colors();
        let n = colors.len() as f64;
        for (k, c) in colors.iter().enumerate() {
            let y1 = inner.y1 - inner.height() * k as f64 / n;
            let y0 = inner.y1 - inner.height() * (k + 1) as f64 / n;
            // Overlap by a fraction of a pixel so anti-aliased band edges leave no seams.
            svg.rect(
                Rect::new(inner.x0, y0 - 0.3, inner.x1, y1),
                &c.to_hex(),
                None,
            );
        }
        let mid = r.center().x;
        svg.polygon(
            &[
                Point::new(r.x0, inner.y0),
                Point::new(r.x1, inner.y0),
                Point::new(mid, r.y0),
            ],
            &p.bands.over().to_hex(),
            None,
        );
        svg.polygon(
            &[
                Point::new(r.x0, inner.y1),
                Point::new(r.x1, inner.y1),
                Point::new(mid, r.y1),
            ],
            &p.bands.under().to_hex(),
            None,
        );
        svg.polygon(
            &[
                Point::new(r.x0, inner.y0),
                Point::new(mid, r.y0),
                Point::new(r.x1, inner.y0),
                Point::new(r.x1, inner.y1),
                Point::new(mid, r.y1),
                Point::new(r.x0, inner.y1),
            ],
            "none",
            Some(("black", frame_w)),
        );
        let label_room = ticks_on_bar(svg, cb, inner, f, lay.tick_len, lay.pad, |v| {
            uniform_band_position(levels, v)
        });
        if let Some(label) = &spec.label {
            let x = r.x1 + lay.tick_len + lay.pad + label_room + 0.9 * f;
            svg.text(Point::new(x, inner.center().y), f, Anchor::Middle, -90.0, label);
        }
    }
}

/// Ticks on the right edge of a colorbar; returns the widest label width.
fn ticks_on_bar(
    svg: &mut SvgDoc,
    cb: &ColorbarLayout,
    inner: Rect,
    font: f64,
    tick_len: f64,
    pad: f64,
    position: impl Fn(f64) -> f64,
) -> f64 {
    let mut widest: f64 = 0.0;
    for (v, label) in cb.ticks.values.iter().zip(&cb.ticks.labels) {
        let y = inner.y1 - inner.height() * position(*v);
        svg.line(
            Point::new(inner.x1, y),
            Point::new(inner.x1 + tick_len, y),
            "black",
            font / 16.0,
            None,
        );
        svg.text(
            Point::new(inner.x1 + tick_len + pad * 0.5, y + 0.35 * font),
            font,
            Anchor::Start,
            0.0,
            label,
        );
        widest = widest.max(crate::render::layout::text_width(label, font));
    }
    widest
}

pub(crate) fn polar_chrome(svg: &mut SvgDoc, p: &PolarPanel, lay: &PolarLayout, dpi: f64) {
    let c = lay.center;
    let radius = lay.radius;
    let f = lay.font;
    let grid_w = stroke_px(0.8, dpi);
    let rmax = p.r.last().copied().unwrap_or(1.0);

    for t in &lay.rticks.values {
        if *t < rmax {
            svg.circle(c, radius * t / rmax, GRID_GRAY, grid_w, None);
        }
    }
    for k in 0..8 {
        let a = (k as f64 * 45.0).to_radians();
        let dir = Point::new(a.cos(), -a.sin());
        svg.line(
            c,
            Point::new(c.x + radius * dir.x, c.y + radius * dir.y),
            GRID_GRAY,
            grid_w,
            None,
        );
        let off = radius + 1.1 * f;
        svg.text(
            Point::new(c.x + off * dir.x, c.y + off * dir.y + 0.35 * f),
            f,
            Anchor::Middle,
            0.0,
            THETA_LABELS[k],
        );
    }
    svg.circle(c, radius, "black", grid_w, None);

    let label_angle = 22.5f64.to_radians();
    for (t, label) in lay.rticks.values.iter().zip(&lay.rticks.labels) {
        let rr = radius * t / rmax;
        svg.text(
            Point::new(
                c.x + rr * label_angle.cos(),
                c.y - rr * label_angle.sin(),
            ),
            f,
            Anchor::Start,
            0.0,
            label,
        );
    }

    if !p.title.is_empty() {
        svg.text(
            Point::new(c.x, c.y - radius - 2.0 * f),
            f * 1.2,
            Anchor::Middle,
            0.0,
            &p.title,
        );
    }

    if let Some(cb) = &lay.colorbar {
        gradient_bar(svg, cb.rect, &p.cmap);
        svg.rect(cb.rect, "none", Some(("black", grid_w)));
        let span = p.vmax - p.vmin;
        ticks_on_bar(svg, cb, cb.rect, f, lay.tick_len, lay.pad, |v| {
            if span > 0.0 { (v - p.vmin) / span } else { 0.5 }
        });
    }
}

fn gradient_bar(svg: &mut SvgDoc, r: Rect, cmap: &Colormap) {
    const STEPS: usize = 64;
    for k in 0..STEPS {
        let y1 = r.y1 - r.height() * k as f64 / STEPS as f64;
        let y0 = r.y1 - r.height() * (k + 1) as f64 / STEPS as f64;
        let color = cmap.sample((k as f64 + 0.5) / STEPS as f64);
        svg.rect(Rect::new(r.x0, y0 - 0.3, r.x1, y1), &color.to_hex(), None);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
