pub type ReelResult<T> = Result<T, ReelError>;

/// Why a script could not be loaded, planned or rendered.
///
/// Load and planning failures (`Validation`, `Serde`, `Animation`) surface before any frame is
/// written. `Evaluation` and `Other` can stop a run partway through an animation.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// A command or setting the loader refuses: unknown op, wrong arity or argument type,
    /// an out-of-range frame number, or a reference to an undeclared material or knob.
    #[error("invalid script: {0}")]
    Validation(String),

    /// `vary` in a run with a single frame, or a vary range reaching past the last frame.
    #[error("animation setup: {0}")]
    Animation(String),

    /// Popping the base transform, frames saved out of order, or a viewer that fails.
    #[error("frame evaluation: {0}")]
    Evaluation(String),

    /// Script or settings text that is not the expected JSON shape.
    #[error("malformed JSON: {0}")]
    Serde(String),

    /// Image encoding and filesystem failures, with their context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
