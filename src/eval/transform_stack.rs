use crate::foundation::core::DMat4;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math;

/// Nested coordinate frames; the top is the transform applied to emitted geometry.
///
/// The stack is never empty: it starts as `[identity]` and refuses to pop its last entry.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformStack {
    stack: Vec<DMat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Stack holding a single identity transform.
    pub fn new() -> Self {
        Self {
            stack: vec![math::identity()],
        }
    }

    /// Current coordinate frame.
    pub fn top(&self) -> &DMat4 {
        // Invariant: `stack` is non-empty.
        &self.stack[self.stack.len() - 1]
    }

    /// Number of nested frames.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Duplicate the top.
    pub fn push(&mut self) {
        let top = *self.top();
        self.stack.push(top);
    }

    /// Discard the top, returning it.
    pub fn pop(&mut self) -> ReelResult<DMat4> {
        if self.stack.len() <= 1 {
            return Err(ReelError::evaluation(
                "pop would empty the transform stack",
            ));
        }
        self.stack
            .pop()
            .ok_or_else(|| ReelError::evaluation("transform stack is empty"))
    }

    /// Compose `m` into the top: `top = top · m`.
    ///
    /// Matrices are values, so earlier pushed copies are unaffected.
    pub fn replace_top(&mut self, m: &DMat4) {
        let idx = self.stack.len() - 1;
        self.stack[idx] = math::compose(&self.stack[idx], m);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/transform_stack.rs"]
mod tests;
