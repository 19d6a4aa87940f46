//! Rendered RGBA frames and their image-file IO.

use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PostproError, PostproResult};
use crate::foundation::math::mul_div255_u16;

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by the figure renderer are **premultiplied alpha**; frames decoded from
/// image files are premultiplied on load as well. The `premultiplied` flag makes this
/// explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Frame of `width x height` filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let a = u16::from(color.a);
        let px = [
            mul_div255_u16(u16::from(color.r), a) as u8,
            mul_div255_u16(u16::from(color.g), a) as u8,
            mul_div255_u16(u16::from(color.b), a) as u8,
            color.a,
        ];
        let n = width as usize * height as usize;
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// Premultiplied RGBA of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }

    /// RGB copy with the frame composited over `bg`.
    pub fn flatten_rgb(&self, bg: Rgba8) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / 4 * 3);
        let premul;
        let src = if self.premultiplied {
            &self.data
        } else {
            premul = premultiply(&self.data);
            &premul
        };
        for px in src.chunks_exact(4) {
            let inv = 255 - u16::from(px[3]);
            out.push((u16::from(px[0]) + mul_div255_u16(u16::from(bg.r), inv)).min(255) as u8);
            out.push((u16::from(px[1]) + mul_div255_u16(u16::from(bg.g), inv)).min(255) as u8);
            out.push((u16::from(px[2]) + mul_div255_u16(u16::from(bg.b), inv)).min(255) as u8);
        }
        out
    }

    /// Write as PNG, or JPEG when the extension is `.jpg`/`.jpeg`. Parent directories are
    /// created.
    pub fn save(&self, path: &Path) -> PostproResult<()> {
        crate::encode::ensure_parent_dir(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg") => {
                let rgb = self.flatten_rgb(Rgba8::WHITE);
                image::save_buffer_with_format(
                    path,
                    &rgb,
                    self.width,
                    self.height,
                    image::ColorType::Rgb8,
                    image::ImageFormat::Jpeg,
                )
                .with_context(|| format!("write jpeg '{}'", path.display()))?;
            }
            Some("png") | None => {
                image::save_buffer_with_format(
                    path,
                    &self.to_straight_rgba(),
                    self.width,
                    self.height,
                    image::ColorType::Rgba8,
                    image::ImageFormat::Png,
                )
                .with_context(|| format!("write png '{}'", path.display()))?;
            }
            Some(other) => {
                return Err(PostproError::validation(format!(
                    "unsupported image extension '.{other}' for '{}' (use .png or .jpg)",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Decode an image file into a premultiplied frame.
    pub fn load(path: &Path) -> PostproResult<Self> {
        let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();
        premultiply_in_place(&mut data);
        Ok(Self {
            width,
            height,
            data,
            premultiplied: true,
        })
    }
}

fn premultiply(rgba: &[u8]) -> Vec<u8> {
    let mut out = rgba.to_vec();
    premultiply_in_place(&mut out);
    out
}

pub(crate) fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255_u16(u16::from(*c), a) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
