//! mdlreel interprets declarative scene scripts and renders them to images.
//!
//! A run goes through three stages:
//!
//! - Compile: plan the animation (frame count, base name) and interpolate `vary` knobs into a
//!   per-frame table ([`compile_script`])
//! - Interpret: walk the command list once per frame, maintaining a [`TransformStack`] and
//!   emitting shapes through a [`Rasterizer`] ([`FrameInterpreter`])
//! - Output: hand stills and numbered frames to an [`OutputSink`], which assembles animations
//!
//! [`run_script`] drives all three.
#![forbid(unsafe_code)]

mod foundation;

/// Animation planning and knob interpolation.
pub mod compile;
/// Output sinks.
pub mod encode;
/// Per-frame interpretation.
pub mod eval;
/// Geometry and rasterization.
pub mod render;
/// Script model and loading.
pub mod script;
/// End-to-end driver and settings.
pub mod session;

pub use crate::foundation::core::{Axis, Canvas, DMat4, DVec3, FrameIndex, Rgb8};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::foundation::math;

pub use crate::compile::{AnimationPlan, KnobTable, Notice};
pub use crate::encode::{FileSink, FileSinkOpts, OutputSink, RecordingSink, SinkEvent};
pub use crate::eval::{FrameInterpreter, TransformStack};
pub use crate::render::{Rasterizer, ScanlineRasterizer, Shading};
pub use crate::script::{Command, Constants, Op, Script, Symbol, SymbolTable};
pub use crate::session::{RenderSettings, RunSummary, compile_script, run_script};
