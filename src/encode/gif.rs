//! Animated GIF output through the `image` crate's encoder.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::encode::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{PostproError, PostproResult};
use crate::render::frame::FrameRGBA;

/// Palette quantization speed passed to the encoder (1 = best, 30 = fastest).
const QUANT_SPEED: i32 = 10;

/// Sink writing an infinitely looping animated GIF.
pub struct GifSink {
    out_path: PathBuf,
    background: Rgba8,
    encoder: Option<GifEncoder<BufWriter<File>>>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl GifSink {
    /// Sink writing to `out_path`; transparent pixels are flattened over white.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            background: Rgba8::WHITE,
            encoder: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for GifSink {
    #[tracing::instrument(skip(self), fields(out = %self.out_path.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> PostproResult<()> {
        if cfg.width == 0 || cfg.height == 0 || cfg.width > 0xffff || cfg.height > 0xffff {
            return Err(PostproError::validation(format!(
                "gif frames must be 1..=65535 pixels per side, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        ensure_parent_dir(&self.out_path)?;
        let file = File::create(&self.out_path)
            .with_context(|| format!("create gif '{}'", self.out_path.display()))?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), QUANT_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .context("configure gif looping")?;
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PostproResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| PostproError::evaluation("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(PostproError::evaluation(
                "gif sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(PostproError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let rgb = frame.flatten_rgb(self.background);
        let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
        for px in rgb.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        let buffer = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
            .ok_or_else(|| PostproError::evaluation("gif frame buffer has the wrong length"))?;
        let delay = image::Delay::from_numer_denom_ms(1000 * cfg.fps.den, cfg.fps.num);
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| PostproError::evaluation("gif sink is already finalized"))?;
        encoder
            .encode_frame(image::Frame::from_parts(buffer, 0, 0, delay))
            .with_context(|| format!("encode gif frame {}", idx.0))?;
        tracing::debug!(frame = idx.0, "encoded gif frame");
        Ok(())
    }

    fn end(&mut self) -> PostproResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| PostproError::evaluation("gif sink not started"))?;
        // Dropping the encoder writes the trailer and flushes the file.
        drop(encoder);
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
