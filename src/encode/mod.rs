//! Frame sinks (MP4 via system `ffmpeg`, animated GIF) and image-sequence loading.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::PostproResult;

pub mod ffmpeg;
pub mod frames;
#[cfg(feature = "gif")]
pub mod gif;
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use frames::{FrameSequence, load_sequence};
#[cfg(feature = "gif")]
pub use gif::GifSink;
pub use sink::{FrameSink, SinkConfig};
#[cfg(test)]
pub(crate) use sink::InMemorySink;

/// Ensure the parent directory of `path` exists.
pub(crate) fn ensure_parent_dir(path: &Path) -> PostproResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Whether this build can write animated GIFs.
pub const fn gif_supported() -> bool {
    cfg!(feature = "gif")
}

/// Push every frame of `seq` through `sink` in order.
pub fn encode_sequence(sink: &mut dyn FrameSink, seq: &FrameSequence, fps: Fps) -> PostproResult<()> {
    let (width, height) = seq.size();
    sink.begin(SinkConfig { width, height, fps })?;
    for (i, frame) in seq.frames().iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mod.rs"]
mod tests;
