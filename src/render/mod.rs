//! Geometry generation and CPU rasterization.

pub(crate) mod geometry;
pub(crate) mod raster;
pub(crate) mod target;

pub use geometry::GeometryBuffer;
pub use raster::{PointLight, Rasterizer, ScanlineRasterizer, Shading};
pub use target::FrameTarget;
