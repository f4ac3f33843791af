use std::path::PathBuf;

use crate::compile::{AnimationPlan, KnobTable, Notice, build_knob_table, plan_animation};
use crate::encode::OutputSink;
use crate::eval::FrameInterpreter;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ReelResult;
use crate::render::Rasterizer;
use crate::script::Script;
use crate::session::settings::RenderSettings;

/// Outcome of a complete run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Base name used for frame files (empty for static runs without `basename`).
    pub basename: String,
    /// Number of frames rendered.
    pub num_frames: usize,
    /// Numbered frame files, in order (animated runs only).
    pub frames: Vec<PathBuf>,
    /// Non-fatal corrections applied while compiling the script.
    pub notices: Vec<Notice>,
}

/// Both pre-passes over a script: the animation plan and the per-frame knob table.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CompiledScript {
    /// Frame count and base name.
    pub plan: AnimationPlan,
    /// Knob values per frame.
    pub knobs: KnobTable,
}

/// Run both pre-passes. Fatal configuration errors surface here, before any rendering.
pub fn compile_script(script: &Script) -> ReelResult<CompiledScript> {
    let mut plan = plan_animation(&script.commands)?;
    let knobs = build_knob_table(&script.commands, plan.num_frames, &mut plan.notices)?;
    Ok(CompiledScript { plan, knobs })
}

/// Render every frame of `script` in increasing order, then assemble the animation if the run
/// has more than one frame.
///
/// Knob values are written into `script.symbols` as frames are rendered.
#[tracing::instrument(skip_all, fields(commands = script.commands.len()))]
pub fn run_script(
    script: &mut Script,
    settings: &RenderSettings,
    rasterizer: &mut dyn Rasterizer,
    sink: &mut dyn OutputSink,
) -> ReelResult<RunSummary> {
    settings.validate()?;
    let CompiledScript { plan, knobs } = compile_script(script)?;
    tracing::info!(
        frames = plan.num_frames,
        basename = %plan.basename,
        "compiled script"
    );

    let interp = FrameInterpreter::new(&script.commands, settings, &plan, &knobs);
    let mut frames = Vec::new();
    for f in 0..plan.num_frames {
        let out = interp.render_frame(FrameIndex(f), &mut script.symbols, rasterizer, sink)?;
        frames.extend(out.saved_to);
    }

    if plan.is_animated() {
        sink.assemble_animation(&plan.basename)?;
    }

    Ok(RunSummary {
        basename: plan.basename.clone(),
        num_frames: plan.num_frames,
        frames,
        notices: plan.notices.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/run.rs"]
mod tests;
