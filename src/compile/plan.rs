use crate::compile::notice::Notice;
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::{Command, Op};

/// Base name substituted when an animated script declares none.
pub const DEFAULT_BASENAME: &str = "default";

/// Result of the animation pre-pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnimationPlan {
    /// Base name for numbered frame files. Empty for static runs without `basename`.
    pub basename: String,
    /// Number of frames to render; `1` means a static single image.
    pub num_frames: usize,
    /// Corrections applied while planning.
    pub notices: Vec<Notice>,
}

impl AnimationPlan {
    /// Return `true` when the script renders more than one frame.
    pub fn is_animated(&self) -> bool {
        self.num_frames > 1
    }
}

/// Scan the command list once for `basename`, `frames` and `vary`.
///
/// The last `basename` and the last `frames` win. A `vary` without a frame count above one is a
/// fatal configuration error.
#[tracing::instrument(skip(commands), fields(commands = commands.len()))]
pub fn plan_animation(commands: &[Command]) -> ReelResult<AnimationPlan> {
    let mut basename: Option<String> = None;
    let mut num_frames = 1usize;
    let mut has_vary = false;

    for cmd in commands {
        match &cmd.op {
            Op::Basename { name } => basename = Some(name.clone()),
            Op::Frames { count } => num_frames = *count,
            Op::Vary { .. } => has_vary = true,
            _ => {}
        }
    }

    if has_vary && num_frames <= 1 {
        return Err(ReelError::animation(
            "vary found but no frames command sets more than one frame",
        ));
    }

    let mut notices = Vec::new();
    let basename = match basename {
        Some(name) => name,
        None if num_frames > 1 => {
            let notice = Notice::DefaultBasename {
                name: DEFAULT_BASENAME.to_owned(),
            };
            tracing::warn!("{notice}");
            notices.push(notice);
            DEFAULT_BASENAME.to_owned()
        }
        None => String::new(),
    };

    Ok(AnimationPlan {
        basename,
        num_frames,
        notices,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
