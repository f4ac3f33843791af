use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::compile::{AnimationPlan, KnobTable};
use crate::encode::OutputSink;
use crate::eval::transform_stack::TransformStack;
use crate::foundation::core::{Canvas, DVec3, FrameIndex, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math;
use crate::render::{FrameTarget, GeometryBuffer, Rasterizer};
use crate::script::{Command, DEFAULT_MATERIAL, Op, SymbolTable};
use crate::session::settings::RenderSettings;

/// State carried through one frame's command walk. Rebuilt from scratch for every frame.
#[derive(Clone, Debug)]
pub struct RenderContext {
    /// Nested coordinate frames.
    pub stack: TransformStack,
    /// Geometry of the shape command currently being emitted.
    pub scratch: GeometryBuffer,
    /// Image and depth buffers.
    pub target: FrameTarget,
}

impl RenderContext {
    /// Fresh context: identity transform, empty scratch, cleared buffers.
    pub fn new(canvas: Canvas, background: Rgb8) -> Self {
        Self {
            stack: TransformStack::new(),
            scratch: GeometryBuffer::new(),
            target: FrameTarget::new(canvas, background),
        }
    }
}

/// What a rendered frame produced.
#[derive(Clone, Debug)]
pub struct FrameOutput {
    /// Final color buffer.
    pub image: RgbImage,
    /// Numbered file the frame was persisted to (animated runs only).
    pub saved_to: Option<PathBuf>,
}

/// Walks the command list once per frame, turning commands into stack updates and draw calls.
pub struct FrameInterpreter<'a> {
    commands: &'a [Command],
    settings: &'a RenderSettings,
    plan: &'a AnimationPlan,
    knobs: &'a KnobTable,
}

impl<'a> FrameInterpreter<'a> {
    /// Interpreter for a planned script.
    pub fn new(
        commands: &'a [Command],
        settings: &'a RenderSettings,
        plan: &'a AnimationPlan,
        knobs: &'a KnobTable,
    ) -> Self {
        Self {
            commands,
            settings,
            plan,
            knobs,
        }
    }

    /// Render one frame.
    ///
    /// Animated runs first bind the frame's knob values, ignore `display`/`save`, and persist the
    /// result to the numbered frame path. Static runs honor `display`/`save` where they occur.
    #[tracing::instrument(skip_all, fields(frame = frame.0))]
    pub fn render_frame(
        &self,
        frame: FrameIndex,
        symbols: &mut SymbolTable,
        rasterizer: &mut dyn Rasterizer,
        sink: &mut dyn OutputSink,
    ) -> ReelResult<FrameOutput> {
        let animated = self.plan.is_animated();
        if animated {
            self.bind_knobs(frame, symbols)?;
        }

        let mut ctx = RenderContext::new(self.settings.canvas()?, self.settings.background);
        for cmd in self.commands {
            self.execute(cmd, &mut ctx, symbols, rasterizer, sink)?;
        }
        if ctx.stack.depth() > 1 {
            tracing::debug!(depth = ctx.stack.depth(), "frame ended with unpopped transforms");
        }

        let image = ctx.target.into_image();
        let saved_to = if animated {
            let path = self.settings.frame_path(&self.plan.basename, frame);
            tracing::info!(path = %path.display(), "saving frame {}", frame.0);
            sink.save_frame(frame, &image, &path)?;
            Some(path)
        } else {
            None
        };

        Ok(FrameOutput { image, saved_to })
    }

    /// Overwrite every knob that has a value on `frame`.
    pub fn bind_knobs(&self, frame: FrameIndex, symbols: &mut SymbolTable) -> ReelResult<()> {
        let values = self.knobs.frame(frame).ok_or_else(|| {
            ReelError::evaluation(format!(
                "frame {} is outside the knob table ({} frames)",
                frame.0,
                self.knobs.num_frames()
            ))
        })?;
        for (name, value) in values {
            symbols.set_knob(name, *value)?;
        }
        Ok(())
    }

    /// Dispatch a single command against the frame's context.
    pub fn execute(
        &self,
        cmd: &Command,
        ctx: &mut RenderContext,
        symbols: &SymbolTable,
        rasterizer: &mut dyn Rasterizer,
        sink: &mut dyn OutputSink,
    ) -> ReelResult<()> {
        let steps = self.settings.subdivisions;
        match &cmd.op {
            Op::Box {
                x,
                y,
                z,
                width,
                height,
                depth,
            } => {
                let material = material_name(cmd);
                ctx.scratch.add_box(*x, *y, *z, *width, *height, *depth);
                self.fill(ctx, symbols, material, rasterizer)?;
            }
            Op::Sphere { x, y, z, radius } => {
                let material = material_name(cmd);
                ctx.scratch.add_sphere(*x, *y, *z, *radius, steps);
                self.fill(ctx, symbols, material, rasterizer)?;
            }
            Op::Torus {
                x,
                y,
                z,
                tube_radius,
                ring_radius,
            } => {
                let material = material_name(cmd);
                ctx.scratch
                    .add_torus(*x, *y, *z, *tube_radius, *ring_radius, steps);
                self.fill(ctx, symbols, material, rasterizer)?;
            }
            Op::Line { from, to } => {
                ctx.scratch
                    .add_edge(DVec3::from_array(*from), DVec3::from_array(*to));
                ctx.scratch.transform(ctx.stack.top());
                let drawn =
                    rasterizer.draw_lines(&ctx.scratch, &mut ctx.target, self.settings.line_color);
                ctx.scratch.clear();
                drawn?;
            }
            Op::Move { x, y, z } => {
                let k = knob_factor(cmd, symbols)?;
                ctx.stack.replace_top(&math::translate(x * k, y * k, z * k));
            }
            Op::Scale { x, y, z } => {
                let k = knob_factor(cmd, symbols)?;
                ctx.stack.replace_top(&math::scale(x * k, y * k, z * k));
            }
            Op::Rotate { axis, degrees } => {
                let k = knob_factor(cmd, symbols)?;
                ctx.stack
                    .replace_top(&math::rotate(*axis, degrees.to_radians() * k));
            }
            Op::Push => ctx.stack.push(),
            Op::Pop => {
                ctx.stack.pop()?;
            }
            Op::Display => {
                if self.plan.is_animated() {
                    tracing::debug!("display ignored in animated run");
                } else {
                    sink.display(ctx.target.image())?;
                }
            }
            Op::Save { path } => {
                if self.plan.is_animated() {
                    tracing::debug!(path = %path, "save ignored in animated run");
                } else {
                    sink.save(ctx.target.image(), Path::new(path))?;
                }
            }
            // Consumed by the planning passes.
            Op::Basename { .. } | Op::Frames { .. } | Op::Vary { .. } => {}
        }
        Ok(())
    }

    fn fill(
        &self,
        ctx: &mut RenderContext,
        symbols: &SymbolTable,
        material: &str,
        rasterizer: &mut dyn Rasterizer,
    ) -> ReelResult<()> {
        let drawn = symbols.constants(material).and_then(|constants| {
            ctx.scratch.transform(ctx.stack.top());
            rasterizer.draw_polygons(
                &ctx.scratch,
                &mut ctx.target,
                &self.settings.shading,
                constants,
            )
        });
        ctx.scratch.clear();
        drawn
    }
}

fn material_name(cmd: &Command) -> &str {
    cmd.constants.as_deref().unwrap_or(DEFAULT_MATERIAL)
}

/// Multiplier applied to a transform's magnitude: the knob's value, or 1.0 without a knob.
fn knob_factor(cmd: &Command, symbols: &SymbolTable) -> ReelResult<f64> {
    match cmd.knob.as_deref() {
        Some(name) => symbols.knob(name),
        None => Ok(1.0),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/interpreter.rs"]
mod tests;
