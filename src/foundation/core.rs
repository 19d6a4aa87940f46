use crate::foundation::error::{PostproError, PostproResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Position of a frame inside an encoded sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a frame rate from `num/den`.
    pub fn new(num: u32, den: u32) -> PostproResult<Self> {
        if den == 0 {
            return Err(PostproError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(PostproError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Build a frame rate from a decimal value such as `20` or `2.5` (millihertz precision).
    pub fn from_f64(fps: f64) -> PostproResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(PostproError::validation(format!(
                "fps must be a positive number, got {fps}"
            )));
        }
        if fps.fract() == 0.0 && fps <= f64::from(u32::MAX) {
            return Self::new(fps as u32, 1);
        }
        let num = (fps * 1000.0).round();
        if num < 1.0 || num > f64::from(u32::MAX) {
            return Err(PostproError::validation(format!("fps {fps} is out of range")));
        }
        Self::new(num as u32, 1000)
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse `#rrggbb`, `#rrggbbaa`, a single-letter matplotlib code (`k`, `r`, ...) or a
    /// basic color name.
    pub fn parse(s: &str) -> PostproResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex)
                .ok_or_else(|| PostproError::validation(format!("invalid hex color '{s}'")));
        }
        let c = match s.to_ascii_lowercase().as_str() {
            "k" | "black" => Self::BLACK,
            "w" | "white" => Self::WHITE,
            "r" | "red" => Self::rgb(255, 0, 0),
            "g" | "green" => Self::rgb(0, 128, 0),
            "b" | "blue" => Self::rgb(0, 0, 255),
            "c" | "cyan" => Self::rgb(0, 191, 191),
            "m" | "magenta" => Self::rgb(191, 0, 191),
            "y" | "yellow" => Self::rgb(191, 191, 0),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "orange" => Self::rgb(255, 165, 0),
            _ => {
                return Err(PostproError::validation(format!("unknown color '{s}'")));
            }
        };
        Ok(c)
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// `#rrggbb` form (alpha dropped).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a float in `[0, 1]`.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Rgba8::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba8 {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
