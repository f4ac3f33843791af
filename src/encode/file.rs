use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbImage};

use crate::encode::sink::OutputSink;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};

/// Options for [`FileSink`].
#[derive(Clone, Debug)]
pub struct FileSinkOpts {
    /// External program launched with a PNG path to show `display` requests.
    pub viewer: String,
    /// Directory receiving the assembled `<basename>.gif`.
    pub animation_dir: PathBuf,
    /// Per-frame delay of the assembled animation, in milliseconds.
    pub frame_delay_ms: u32,
}

impl Default for FileSinkOpts {
    fn default() -> Self {
        Self {
            viewer: "display".to_string(),
            animation_dir: PathBuf::from("."),
            frame_delay_ms: 17,
        }
    }
}

/// Sink that writes images to disk and assembles animations into a looping GIF.
pub struct FileSink {
    opts: FileSinkOpts,
    frames: Vec<PathBuf>,
    last_idx: Option<FrameIndex>,
}

impl FileSink {
    /// Create a sink with the given options.
    pub fn new(opts: FileSinkOpts) -> Self {
        Self {
            opts,
            frames: Vec::new(),
            last_idx: None,
        }
    }

    /// Frame files written so far, in order.
    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    /// Path of the animation assembled for `basename`.
    pub fn animation_path(&self, basename: &str) -> PathBuf {
        self.opts.animation_dir.join(format!("{basename}.gif"))
    }
}

impl OutputSink for FileSink {
    fn display(&mut self, image: &RgbImage) -> ReelResult<()> {
        let path = std::env::temp_dir().join(format!(
            "mdlreel_display_{}_{}.png",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        let _guard = TempFileGuard(path.clone());
        write_image(image, &path)?;

        tracing::debug!(viewer = %self.opts.viewer, path = %path.display(), "launching viewer");
        let status = Command::new(&self.opts.viewer)
            .arg(&path)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| {
                ReelError::evaluation(format!(
                    "failed to launch viewer '{}' (is it installed and on PATH?): {e}",
                    self.opts.viewer
                ))
            })?;
        if !status.success() {
            return Err(ReelError::evaluation(format!(
                "viewer '{}' exited with {status}",
                self.opts.viewer
            )));
        }
        Ok(())
    }

    fn save(&mut self, image: &RgbImage, path: &Path) -> ReelResult<()> {
        write_image(image, path)
    }

    fn save_frame(&mut self, idx: FrameIndex, image: &RgbImage, path: &Path) -> ReelResult<()> {
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(ReelError::evaluation(format!(
                "frame {} saved after frame {} (frames must arrive in increasing order)",
                idx.0, last.0
            )));
        }
        write_image(image, path)?;
        self.frames.push(path.to_path_buf());
        self.last_idx = Some(idx);
        Ok(())
    }

    fn assemble_animation(&mut self, basename: &str) -> ReelResult<()> {
        if self.frames.is_empty() {
            return Err(ReelError::evaluation(
                "cannot assemble an animation without saved frames",
            ));
        }

        let out = self.animation_path(basename);
        ensure_parent_dir(&out)?;
        let file = File::create(&out)
            .with_context(|| format!("create animation '{}'", out.display()))?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .with_context(|| format!("configure animation '{}'", out.display()))?;

        let delay = Delay::from_numer_denom_ms(self.opts.frame_delay_ms, 1);
        for path in &self.frames {
            let rgba = image::open(path)
                .with_context(|| format!("read frame '{}'", path.display()))?
                .to_rgba8();
            encoder
                .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                .with_context(|| format!("encode frame '{}'", path.display()))?;
        }

        tracing::info!(path = %out.display(), frames = self.frames.len(), "assembled animation");
        Ok(())
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_image(image: &RgbImage, path: &Path) -> ReelResult<()> {
    ensure_parent_dir(path)?;
    image
        .save(path)
        .with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

struct TempFileGuard(PathBuf);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/file.rs"]
mod tests;
