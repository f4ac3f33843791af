pub(crate) mod core;
pub(crate) mod error;
/// Matrix constructors and composition.
pub mod math;
