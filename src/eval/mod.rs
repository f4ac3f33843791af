//! Per-frame command interpretation.

pub(crate) mod interpreter;
pub(crate) mod transform_stack;

pub use interpreter::{FrameInterpreter, FrameOutput, RenderContext};
pub use transform_stack::TransformStack;
