//! End-to-end driver and run-wide settings.

pub(crate) mod run;
pub(crate) mod settings;

pub use run::{CompiledScript, RunSummary, compile_script, run_script};
pub use settings::RenderSettings;
