//! Named colormaps and the discrete level bands of filled contours.

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PostproError, PostproResult};

const VIRIDIS: &[&str] = &[
    "#440154", "#482475", "#414487", "#355f8d", "#2a788e", "#21918c", "#22a884", "#44bf70",
    "#7ad151", "#bddf26", "#fde725",
];
const PLASMA: &[&str] = &[
    "#0d0887", "#41049d", "#6a00a8", "#8f0da4", "#b12a90", "#cc4778", "#e16462", "#f2844b",
    "#fca636", "#fcce25", "#f0f921",
];
const INFERNO: &[&str] = &[
    "#000004", "#160b39", "#420a68", "#6a176e", "#932667", "#bc3754", "#dd513a", "#f37819",
    "#fca50a", "#f6d746", "#fcffa4",
];
const MAGMA: &[&str] = &[
    "#000004", "#140e36", "#3b0f70", "#641a80", "#8c2981", "#b73779", "#de4968", "#f7705c",
    "#fe9f6d", "#fecf92", "#fcfdbf",
];
const COOLWARM: &[&str] = &[
    "#3b4cc0", "#6282ea", "#8db0fe", "#b8d0f9", "#dddddd", "#f5c4ad", "#f49a7b", "#de604d",
    "#b40426",
];
const BWR: &[&str] = &["#0000ff", "#ffffff", "#ff0000"];
const SEISMIC: &[&str] = &["#00004c", "#0000ff", "#ffffff", "#ff0000", "#7f0000"];
const RDBU: &[&str] = &[
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];
const JET: &[&str] = &[
    "#000080", "#0000ff", "#0080ff", "#00ffff", "#80ff80", "#ffff00", "#ff8000", "#ff0000",
    "#800000",
];
const GRAY: &[&str] = &["#000000", "#ffffff"];

const TABLES: &[(&str, &[&str])] = &[
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("inferno", INFERNO),
    ("magma", MAGMA),
    ("coolwarm", COOLWARM),
    ("bwr", BWR),
    ("seismic", SEISMIC),
    ("RdBu", RDBU),
    ("jet", JET),
    ("gray", GRAY),
    ("grey", GRAY),
];

/// Piecewise-linear colormap built from evenly spaced color stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<Rgba8>,
}

impl Colormap {
    /// Look up a named map; a `_r` suffix reverses it.
    pub fn by_name(name: &str) -> PostproResult<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(b) => (b, true),
            None => (name, false),
        };
        let Some((_, hexes)) = TABLES.iter().find(|(n, _)| *n == base) else {
            let known: Vec<&str> = TABLES.iter().map(|(n, _)| *n).collect();
            return Err(PostproError::validation(format!(
                "unknown colormap '{name}' (known: {})",
                known.join(", ")
            )));
        };
        let mut stops = hexes
            .iter()
            .map(|h| Rgba8::parse(h))
            .collect::<PostproResult<Vec<_>>>()?;
        if reversed {
            stops.reverse();
        }
        Ok(Self {
            name: name.to_owned(),
            stops,
        })
    }

    /// Map name as requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at `t` in `[0, 1]`; values outside are clamped.
    pub fn sample(&self, t: f64) -> Rgba8 {
        let n = self.stops.len();
        if n == 1 || t.is_nan() {
            return self.stops[0];
        }
        let t = t.clamp(0.0, 1.0) * (n - 1) as f64;
        let i = (t.floor() as usize).min(n - 2);
        let f = t - i as f64;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * f).round() as u8;
        Rgba8 {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
            a: 255,
        }
    }
}

/// Filled-contour level bands with both ends extended.
///
/// Band `i` spans `[levels[i], levels[i + 1])` and is colored at its midpoint; values below
/// the first level take the bottom color, values above the last level the top color.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelBands {
    levels: Vec<f64>,
    colors: Vec<Rgba8>,
    under: Rgba8,
    over: Rgba8,
}

impl LevelBands {
    /// Build from levels and a map. Levels must be finite and strictly increasing, at least two.
    pub fn new(levels: Vec<f64>, cmap: &Colormap) -> PostproResult<Self> {
        if levels.len() < 2 {
            return Err(PostproError::validation(format!(
                "contour levels need at least two values, got {}",
                levels.len()
            )));
        }
        if levels.iter().any(|l| !l.is_finite()) || levels.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PostproError::validation(
                "contour levels must be finite and strictly increasing",
            ));
        }
        let lo = levels[0];
        let span = levels[levels.len() - 1] - lo;
        let colors = levels
            .windows(2)
            .map(|w| cmap.sample(((w[0] + w[1]) * 0.5 - lo) / span))
            .collect();
        Ok(Self {
            levels,
            colors,
            under: cmap.sample(0.0),
            over: cmap.sample(1.0),
        })
    }

    /// Level boundaries.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Color of each band, bottom to top.
    pub fn band_colors(&self) -> &[Rgba8] {
        &self.colors
    }

    /// Color below the first level.
    pub fn under(&self) -> Rgba8 {
        self.under
    }

    /// Color above the last level.
    pub fn over(&self) -> Rgba8 {
        self.over
    }

    /// Color of `v`, `None` for NaN.
    pub fn color_of(&self, v: f64) -> Option<Rgba8> {
        if v.is_nan() {
            return None;
        }
        let n = self.levels.len();
        if v < self.levels[0] {
            return Some(self.under);
        }
        if v > self.levels[n - 1] {
            return Some(self.over);
        }
        let k = self.levels.partition_point(|&l| l <= v);
        Some(self.colors[k.saturating_sub(1).min(n - 2)])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/colormap.rs"]
mod tests;
