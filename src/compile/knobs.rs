use std::collections::BTreeMap;

use crate::compile::notice::Notice;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::{Command, Op};

/// Per-frame knob values, built once before rendering and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct KnobTable {
    frames: Vec<BTreeMap<String, f64>>,
}

impl KnobTable {
    /// Table with `num_frames` empty frames.
    pub fn empty(num_frames: usize) -> ReelResult<Self> {
        let mut frames = Vec::new();
        frames.try_reserve_exact(num_frames).map_err(|e| {
            ReelError::animation(format!(
                "cannot allocate knob table for {num_frames} frames: {e}"
            ))
        })?;
        frames.resize_with(num_frames, BTreeMap::new);
        Ok(Self { frames })
    }

    /// Number of frames covered by the table.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Knob values active on `frame`.
    pub fn frame(&self, frame: FrameIndex) -> Option<&BTreeMap<String, f64>> {
        self.frames.get(frame.0)
    }

    /// Value of `knob` on `frame`, if any `vary` covers it.
    pub fn value(&self, frame: FrameIndex, knob: &str) -> Option<f64> {
        self.frame(frame).and_then(|m| m.get(knob).copied())
    }

    /// Borrow every frame in order.
    pub fn frames(&self) -> &[BTreeMap<String, f64>] {
        &self.frames
    }
}

/// Resolve every `vary` command into per-frame knob values.
///
/// Each `vary` writes its knob on every frame of its closed interval; later commands overwrite
/// earlier ones. Values are accumulated by repeated addition of the per-frame step, so long spans
/// carry the same rounding as a running sum rather than the closed form.
#[tracing::instrument(skip(commands, notices), fields(commands = commands.len()))]
pub fn build_knob_table(
    commands: &[Command],
    num_frames: usize,
    notices: &mut Vec<Notice>,
) -> ReelResult<KnobTable> {
    let mut table = KnobTable::empty(num_frames)?;

    for cmd in commands {
        let Op::Vary {
            start_frame,
            end_frame,
            start_value,
            end_value,
        } = cmd.op
        else {
            continue;
        };
        let knob = cmd
            .knob
            .as_deref()
            .ok_or_else(|| ReelError::validation("vary command requires a knob"))?;

        let (start, end) = if start_frame > end_frame {
            let notice = Notice::SwappedVaryRange {
                knob: knob.to_owned(),
                start: FrameIndex(end_frame),
                end: FrameIndex(start_frame),
            };
            tracing::warn!("{notice}");
            notices.push(notice);
            (end_frame, start_frame)
        } else {
            (start_frame, end_frame)
        };

        // Frames are 0-based, so the last valid frame is `num_frames - 1`.
        if end >= num_frames {
            return Err(ReelError::animation(format!(
                "vary '{knob}' ends at frame {end} but only {num_frames} frame(s) are declared"
            )));
        }

        if start == end {
            table.frames[start].insert(knob.to_owned(), start_value);
            continue;
        }

        let step = (end_value - start_value) / (end - start) as f64;
        let mut value = start_value;
        for frame in &mut table.frames[start..=end] {
            frame.insert(knob.to_owned(), value);
            value += step;
        }
    }

    Ok(table)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/knobs.rs"]
mod tests;
