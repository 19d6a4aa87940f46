//! The frame sink contract shared by every output container.

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::PostproResult;
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Playback frame rate.
    pub fps: Fps,
}

/// Sink contract for consuming frames in sequence order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PostproResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PostproResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> PostproResult<()>;
}

/// Sink that keeps every frame in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

#[cfg(test)]
impl InMemorySink {
    /// Create a new in-memory sink.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub(crate) fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames.
    pub(crate) fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called after the last `begin`.
    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PostproResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PostproResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> PostproResult<()> {
        self.finished = true;
        Ok(())
    }
}
