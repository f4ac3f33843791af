use crate::foundation::core::FrameIndex;

/// Non-fatal condition that was corrected automatically while compiling a script.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A multi-frame run had no `basename`; the default was substituted.
    DefaultBasename {
        /// Base name used instead.
        name: String,
    },
    /// A `vary` interval was given backwards and has been swapped.
    SwappedVaryRange {
        /// Knob targeted by the command.
        knob: String,
        /// Corrected (smaller) start frame.
        start: FrameIndex,
        /// Corrected (larger) end frame.
        end: FrameIndex,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefaultBasename { name } => write!(f, "no basename given, using '{name}'"),
            Self::SwappedVaryRange { knob, start, end } => write!(
                f,
                "vary '{knob}': start frame after end frame, swapped to {}..={}",
                start.0, end.0
            ),
        }
    }
}
