//! Pre-passes over the command list: animation planning and knob interpolation.

pub(crate) mod knobs;
pub(crate) mod notice;
pub(crate) mod plan;

pub use knobs::{KnobTable, build_knob_table};
pub use notice::Notice;
pub use plan::{AnimationPlan, DEFAULT_BASENAME, plan_animation};
