use crate::foundation::core::Axis;
use crate::foundation::error::{ReelError, ReelResult};

/// Largest frame number or frame count a script may name.
pub const MAX_FRAMES: usize = 100_000;

/// One positional command argument as it appears in script JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Arg {
    /// Numeric literal.
    Number(f64),
    /// Bare word or path.
    Text(String),
}

/// Command record in the loader's wire shape: op name plus positional arguments.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCommand {
    /// Operation name, e.g. `box` or `vary`.
    pub op: String,
    /// Positional arguments; count and meaning depend on `op`.
    #[serde(default)]
    pub args: Vec<Arg>,
    /// Knob this command is parameterized by.
    #[serde(default)]
    pub knob: Option<String>,
    /// Material (constants symbol) used by shape commands.
    #[serde(default)]
    pub constants: Option<String>,
}

/// Closed vocabulary of script operations with typed arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// Axis-aligned box with its top-left-front corner at `(x, y, z)`.
    Box {
        x: f64,
        y: f64,
        z: f64,
        width: f64,
        height: f64,
        depth: f64,
    },
    /// Sphere centered at `(x, y, z)`.
    Sphere { x: f64, y: f64, z: f64, radius: f64 },
    /// Torus centered at `(x, y, z)`, ring around the y axis.
    Torus {
        x: f64,
        y: f64,
        z: f64,
        tube_radius: f64,
        ring_radius: f64,
    },
    /// Single line segment.
    Line { from: [f64; 3], to: [f64; 3] },
    /// Translation.
    Move { x: f64, y: f64, z: f64 },
    /// Non-uniform scale.
    Scale { x: f64, y: f64, z: f64 },
    /// Rotation about a fixed axis, angle in degrees.
    Rotate { axis: Axis, degrees: f64 },
    /// Duplicate the top of the transform stack.
    Push,
    /// Discard the top of the transform stack.
    Pop,
    /// Show the image buffer interactively.
    Display,
    /// Persist the image buffer to a path.
    Save { path: String },
    /// Base name for animation frame files.
    Basename { name: String },
    /// Total number of animation frames.
    Frames { count: usize },
    /// Linear knob interpolation over an inclusive frame interval.
    Vary {
        start_frame: usize,
        end_frame: usize,
        start_value: f64,
        end_value: f64,
    },
}

impl Op {
    /// The script-level name of this operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Torus { .. } => "torus",
            Self::Line { .. } => "line",
            Self::Move { .. } => "move",
            Self::Scale { .. } => "scale",
            Self::Rotate { .. } => "rotate",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Display => "display",
            Self::Save { .. } => "save",
            Self::Basename { .. } => "basename",
            Self::Frames { .. } => "frames",
            Self::Vary { .. } => "vary",
        }
    }
}

/// Immutable, validated command.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    /// Operation with typed arguments.
    pub op: Op,
    /// Knob whose per-frame value scales this command (or is the `vary` target).
    pub knob: Option<String>,
    /// Named material for shape commands.
    pub constants: Option<String>,
}

impl Command {
    /// Command without knob or material references.
    pub fn new(op: Op) -> Self {
        Self {
            op,
            knob: None,
            constants: None,
        }
    }

    /// Attach a knob reference.
    pub fn with_knob(mut self, knob: impl Into<String>) -> Self {
        self.knob = Some(knob.into());
        self
    }

    /// Attach a material reference.
    pub fn with_constants(mut self, constants: impl Into<String>) -> Self {
        self.constants = Some(constants.into());
        self
    }
}

impl TryFrom<RawCommand> for Command {
    type Error = ReelError;

    fn try_from(raw: RawCommand) -> ReelResult<Self> {
        let args = Args {
            op: &raw.op,
            items: &raw.args,
        };
        let op = match raw.op.as_str() {
            "box" => {
                args.expect_len(6)?;
                Op::Box {
                    x: args.number(0)?,
                    y: args.number(1)?,
                    z: args.number(2)?,
                    width: args.number(3)?,
                    height: args.number(4)?,
                    depth: args.number(5)?,
                }
            }
            "sphere" => {
                args.expect_len(4)?;
                Op::Sphere {
                    x: args.number(0)?,
                    y: args.number(1)?,
                    z: args.number(2)?,
                    radius: args.number(3)?,
                }
            }
            "torus" => {
                args.expect_len(5)?;
                Op::Torus {
                    x: args.number(0)?,
                    y: args.number(1)?,
                    z: args.number(2)?,
                    tube_radius: args.number(3)?,
                    ring_radius: args.number(4)?,
                }
            }
            "line" => {
                args.expect_len(6)?;
                Op::Line {
                    from: [args.number(0)?, args.number(1)?, args.number(2)?],
                    to: [args.number(3)?, args.number(4)?, args.number(5)?],
                }
            }
            "move" => {
                args.expect_len(3)?;
                Op::Move {
                    x: args.number(0)?,
                    y: args.number(1)?,
                    z: args.number(2)?,
                }
            }
            "scale" => {
                args.expect_len(3)?;
                Op::Scale {
                    x: args.number(0)?,
                    y: args.number(1)?,
                    z: args.number(2)?,
                }
            }
            "rotate" => {
                args.expect_len(2)?;
                Op::Rotate {
                    axis: Axis::parse(args.text(0)?)?,
                    degrees: args.number(1)?,
                }
            }
            "push" => {
                args.expect_len(0)?;
                Op::Push
            }
            "pop" => {
                args.expect_len(0)?;
                Op::Pop
            }
            "display" => {
                args.expect_len(0)?;
                Op::Display
            }
            "save" => {
                args.expect_len(1)?;
                Op::Save {
                    path: args.text(0)?.to_owned(),
                }
            }
            "basename" => {
                args.expect_len(1)?;
                Op::Basename {
                    name: args.text(0)?.to_owned(),
                }
            }
            "frames" => {
                args.expect_len(1)?;
                let count = args.frame_number(0)?;
                if count == 0 {
                    return Err(ReelError::validation("frames count must be at least 1"));
                }
                Op::Frames { count }
            }
            "vary" => {
                args.expect_len(4)?;
                if raw.knob.is_none() {
                    return Err(ReelError::validation("vary command requires a knob"));
                }
                Op::Vary {
                    start_frame: args.frame_number(0)?,
                    end_frame: args.frame_number(1)?,
                    start_value: args.number(2)?,
                    end_value: args.number(3)?,
                }
            }
            other => {
                return Err(ReelError::validation(format!("unknown op '{other}'")));
            }
        };

        Ok(Self {
            op,
            knob: raw.knob,
            constants: raw.constants,
        })
    }
}

struct Args<'a> {
    op: &'a str,
    items: &'a [Arg],
}

impl Args<'_> {
    fn expect_len(&self, n: usize) -> ReelResult<()> {
        if self.items.len() != n {
            return Err(ReelError::validation(format!(
                "'{}' expects {n} argument(s), got {}",
                self.op,
                self.items.len()
            )));
        }
        Ok(())
    }

    fn number(&self, i: usize) -> ReelResult<f64> {
        match self.items.get(i) {
            Some(Arg::Number(v)) if v.is_finite() => Ok(*v),
            Some(Arg::Number(_)) => Err(ReelError::validation(format!(
                "'{}' argument {i} must be finite",
                self.op
            ))),
            _ => Err(ReelError::validation(format!(
                "'{}' argument {i} must be a number",
                self.op
            ))),
        }
    }

    fn text(&self, i: usize) -> ReelResult<&str> {
        match self.items.get(i) {
            Some(Arg::Text(s)) => Ok(s.as_str()),
            _ => Err(ReelError::validation(format!(
                "'{}' argument {i} must be a string",
                self.op
            ))),
        }
    }

    // Fractional frame numbers truncate toward zero, so -0.5 is frame 0.
    fn frame_number(&self, i: usize) -> ReelResult<usize> {
        let v = self.number(i)?.trunc();
        if !v.is_finite() || v < 0.0 {
            return Err(ReelError::validation(format!(
                "'{}' argument {i} must be a non-negative frame number",
                self.op
            )));
        }
        if v > MAX_FRAMES as f64 {
            return Err(ReelError::validation(format!(
                "'{}' argument {i} exceeds the frame limit of {MAX_FRAMES}",
                self.op
            )));
        }
        Ok(v as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
