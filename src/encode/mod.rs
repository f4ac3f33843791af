//! Output sinks for stills, animation frames and assembled animations.

/// File-backed sink.
pub mod file;
/// Sink trait and in-memory sink.
pub mod sink;

pub use file::{FileSink, FileSinkOpts};
pub use sink::{OutputSink, RecordingSink, SinkEvent};
