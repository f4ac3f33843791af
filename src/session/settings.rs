use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{Canvas, FrameIndex, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::Shading;

/// Run-wide rendering settings. Every field has a default, so partial JSON files are accepted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Tessellation steps for spheres and tori.
    pub subdivisions: usize,
    /// Directory receiving numbered animation frames.
    pub output_dir: PathBuf,
    /// File extension (and therefore format) of animation frames.
    pub frame_extension: String,
    /// Directory receiving the assembled animation.
    pub animation_dir: PathBuf,
    /// Per-frame delay of the assembled animation, in milliseconds.
    pub frame_delay_ms: u32,
    /// Color every frame is cleared to.
    pub background: Rgb8,
    /// Color of wireframe `line` commands.
    pub line_color: Rgb8,
    /// View and lighting parameters.
    pub shading: Shading,
    /// Program used to show `display` requests.
    pub viewer: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            subdivisions: 100,
            output_dir: PathBuf::from("anim"),
            frame_extension: "png".to_string(),
            animation_dir: PathBuf::from("."),
            frame_delay_ms: 17,
            background: Rgb8::black(),
            line_color: Rgb8::white(),
            shading: Shading::default(),
            viewer: "display".to_string(),
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open settings '{}': {e}", path.display()))
        })?;
        let settings: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ReelError::serde(format!("parse settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that would make rendering impossible.
    pub fn validate(&self) -> ReelResult<()> {
        Canvas::new(self.width, self.height)?;
        if self.frame_extension.is_empty() {
            return Err(ReelError::validation("frame_extension must not be empty"));
        }
        if self.subdivisions < 3 {
            return Err(ReelError::validation("subdivisions must be at least 3"));
        }
        Ok(())
    }

    /// Canvas described by `width` x `height`.
    pub fn canvas(&self) -> ReelResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// `<output_dir>/<basename><NNN>.<ext>`, the frame index zero-padded to three digits.
    pub fn frame_path(&self, basename: &str, frame: FrameIndex) -> PathBuf {
        self.output_dir.join(format!(
            "{basename}{:03}.{}",
            frame.0, self.frame_extension
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/settings.rs"]
mod tests;
