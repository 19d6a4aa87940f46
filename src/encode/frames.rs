//! Loading an image sequence back from disk for animation.

use std::path::{Path, PathBuf};

use crate::foundation::error::{PostproError, PostproResult};
use crate::render::frame::FrameRGBA;

/// Frames of equal size in playback order, with the files they came from.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Vec<FrameRGBA>,
    paths: Vec<PathBuf>,
}

impl FrameSequence {
    /// Decoded frames.
    pub fn frames(&self) -> &[FrameRGBA] {
        &self.frames
    }

    /// Source file of each frame.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of frames; never zero.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false: a sequence holds at least one frame.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Common frame size.
    pub fn size(&self) -> (u32, u32) {
        (self.frames[0].width, self.frames[0].height)
    }
}

/// Read `paths` in order. Unreadable files and frames whose size differs from the first
/// readable one are skipped with a warning; no readable frame at all is an error.
#[tracing::instrument(skip(paths), fields(requested = paths.len()))]
pub fn load_sequence<P: AsRef<Path>>(paths: &[P]) -> PostproResult<FrameSequence> {
    let mut frames: Vec<FrameRGBA> = Vec::new();
    let mut kept = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let frame = match FrameRGBA::load(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable frame");
                continue;
            }
        };
        if let Some(first) = frames.first()
            && !same_size(first, &frame)
        {
            tracing::warn!(
                path = %path.display(),
                width = frame.width,
                height = frame.height,
                expected_width = first.width,
                expected_height = first.height,
                "skipping frame with mismatched size"
            );
            continue;
        }
        tracing::debug!(path = %path.display(), "loaded frame");
        frames.push(frame);
        kept.push(path.to_path_buf());
    }
    if frames.is_empty() {
        return Err(PostproError::evaluation(format!(
            "none of the {} requested frames could be read",
            paths.len()
        )));
    }
    Ok(FrameSequence {
        frames,
        paths: kept,
    })
}

fn same_size(a: &FrameRGBA, b: &FrameRGBA) -> bool {
    a.width == b.width && a.height == b.height
}

#[cfg(test)]
#[path = "../../tests/unit/encode/frames.rs"]
mod tests;
