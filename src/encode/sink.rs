use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::ReelResult;

/// Destination for rendered images.
///
/// Ordering contract: `save_frame` is called in strictly increasing `FrameIndex` order, and
/// `assemble_animation` at most once, after the last frame.
pub trait OutputSink {
    /// Present the image interactively.
    fn display(&mut self, image: &RgbImage) -> ReelResult<()>;
    /// Persist a still image to `path`.
    fn save(&mut self, image: &RgbImage, path: &Path) -> ReelResult<()>;
    /// Persist one animation frame to `path`.
    fn save_frame(&mut self, idx: FrameIndex, image: &RgbImage, path: &Path) -> ReelResult<()>;
    /// Combine every saved frame into a single animation named after `basename`.
    fn assemble_animation(&mut self, basename: &str) -> ReelResult<()>;
}

/// One call observed by a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    /// `display` was requested.
    Display,
    /// `save` was requested for `path`.
    Save(PathBuf),
    /// Frame `idx` was saved to `path`.
    Frame(FrameIndex, PathBuf),
    /// The animation was assembled.
    Assemble(String),
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
    images: Vec<RgbImage>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Images passed to `display`, `save` and `save_frame`, in call order.
    pub fn images(&self) -> &[RgbImage] {
        &self.images
    }
}

impl OutputSink for RecordingSink {
    fn display(&mut self, image: &RgbImage) -> ReelResult<()> {
        self.events.push(SinkEvent::Display);
        self.images.push(image.clone());
        Ok(())
    }

    fn save(&mut self, image: &RgbImage, path: &Path) -> ReelResult<()> {
        self.events.push(SinkEvent::Save(path.to_path_buf()));
        self.images.push(image.clone());
        Ok(())
    }

    fn save_frame(&mut self, idx: FrameIndex, image: &RgbImage, path: &Path) -> ReelResult<()> {
        self.events.push(SinkEvent::Frame(idx, path.to_path_buf()));
        self.images.push(image.clone());
        Ok(())
    }

    fn assemble_animation(&mut self, basename: &str) -> ReelResult<()> {
        self.events.push(SinkEvent::Assemble(basename.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
